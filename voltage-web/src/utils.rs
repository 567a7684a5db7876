//! Utility functions for WASM

use serde::Serialize;
use voltage_lib::VoltageError;
use wasm_bindgen::prelude::*;

/// Route panic messages to the browser console in test builds
pub fn set_panic_hook() {
    #[cfg(test)]
    console_error_panic_hook::set_once();
}

/// Log a message to the browser console
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    pub fn log(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    pub fn warn(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    pub fn error(s: &str);
}

/// Convert a [`VoltageError`] into a JS `Error`.
///
/// The error's `name` is the error kind (`TargetNotFoundError`, ...) and
/// `code` carries the numeric [`voltage_lib::VoltageErrorCode`].
pub fn voltage_error_to_js(err: VoltageError) -> JsValue {
    let js_err = js_sys::Error::new(&err.to_string());
    js_err.set_name(err.kind_name());
    set_property(&js_err, &JsValue::from_str("code"), &JsValue::from(err.code() as i32));
    js_err.into()
}

/// `target[key] = value`, warning on the console when the write is refused.
///
/// Returns whether the property was set.
pub fn set_property(target: &JsValue, key: &JsValue, value: &JsValue) -> bool {
    match js_sys::Reflect::set(target, key, value) {
        Ok(true) => true,
        Ok(false) => {
            warn(&format!("cannot set property {}", describe_js(key)));
            false
        }
        Err(err) => {
            warn(&format!(
                "setting property {} threw: {}",
                describe_js(key),
                describe_js(&err)
            ));
            false
        }
    }
}

/// Best-effort text of a thrown JS value.
pub fn describe_js(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Serialize to a plain JS value (objects, not `Map`s).
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, VoltageError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| VoltageError::Serialization(e.to_string()))
}

/// Read a JS value into JSON.
///
/// `undefined` and `null` become `Value::Null`.
pub fn from_js(value: JsValue) -> Result<serde_json::Value, VoltageError> {
    if value.is_undefined() || value.is_null() {
        return Ok(serde_json::Value::Null);
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| VoltageError::Serialization(e.to_string()))
}
