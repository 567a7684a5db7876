//! `VoltagePayments` and `PaymentComponent` as seen from JavaScript.

use std::rc::Rc;

use js_sys::{Function, Object, Reflect};
use serde::Serialize;
use voltage_lib::{
    Host, MountTarget, PaymentCallbacks, PaymentComponent, PaymentOptionsPatch, PaymentVariant,
    PaymentWidget, VoltageError, VoltagePayments,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::js_surface::{ComponentSource, WebLoader};
use crate::utils::{self, describe_js, from_js, to_js, voltage_error_to_js};
use crate::web_dom::WebDom;

type WebHost = Host<WebDom, WebLoader>;
type WebWidget = PaymentWidget<WebDom, WebLoader>;

thread_local! {
    static HOST: WebHost = Host::new(WebDom::new(), WebLoader::new());
}

fn host() -> WebHost {
    HOST.with(Clone::clone)
}

/// Copy the data fields of a JS options object.
///
/// Functions are callbacks, and `null` / `undefined` mean "not set".
fn data_fields(options: &JsValue) -> Result<serde_json::Value, VoltageError> {
    if !options.is_object() {
        return Err(VoltageError::invalid_config("options", "expected an object"));
    }
    let data = Object::new();
    for entry in Object::entries(options.unchecked_ref()).iter() {
        let key = Reflect::get_u32(&entry, 0).unwrap_or(JsValue::UNDEFINED);
        let value = Reflect::get_u32(&entry, 1).unwrap_or(JsValue::UNDEFINED);
        if value.is_function() || value.is_null() || value.is_undefined() {
            continue;
        }
        utils::set_property(&data, &key, &value);
    }
    from_js(data.into())
}

fn callback(options: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(options, &JsValue::from_str(name))
        .ok()
        .and_then(|value| value.dyn_into::<Function>().ok())
}

fn invoke(name: &str, f: &Function, args: &[JsValue]) {
    let result = match args {
        [] => f.call0(&JsValue::NULL),
        [a] => f.call1(&JsValue::NULL, a),
        [a, b] => f.call2(&JsValue::NULL, a, b),
        _ => f.apply(&JsValue::NULL, &args.iter().collect()),
    };
    if let Err(err) = result {
        utils::error(&format!("{name} callback threw: {}", describe_js(&err)));
    }
}

fn arg<T: Serialize>(name: &str, value: &T) -> JsValue {
    to_js(value).unwrap_or_else(|err| {
        utils::warn(&format!("{name}: {err}"));
        JsValue::UNDEFINED
    })
}

/// Wrap the `on*` functions of a JS options object as callbacks.
fn js_callbacks(options: &JsValue) -> PaymentCallbacks {
    let mut callbacks = PaymentCallbacks::default();

    if let Some(f) = callback(options, "onReady") {
        callbacks = callbacks.on_ready(move |p| invoke("onReady", &f, &[arg("onReady", p)]));
    }
    if let Some(f) = callback(options, "onQRGenerated") {
        callbacks = callbacks.on_qr_generated(move |qr, request| {
            invoke(
                "onQRGenerated",
                &f,
                &[JsValue::from_str(qr), JsValue::from_str(request)],
            )
        });
    }
    if let Some(f) = callback(options, "onStatusChange") {
        callbacks = callbacks.on_status_change(move |status, p| {
            invoke(
                "onStatusChange",
                &f,
                &[JsValue::from_str(status.as_str()), arg("onStatusChange", p)],
            )
        });
    }
    if let Some(f) = callback(options, "onSuccess") {
        callbacks = callbacks.on_success(move |p| invoke("onSuccess", &f, &[arg("onSuccess", p)]));
    }
    if let Some(f) = callback(options, "onError") {
        callbacks = callbacks.on_error(move |e| invoke("onError", &f, &[arg("onError", e)]));
    }
    if let Some(f) = callback(options, "onExpired") {
        callbacks = callbacks.on_expired(move |p| invoke("onExpired", &f, &[arg("onExpired", p)]));
    }
    if let Some(f) = callback(options, "onModalOpen") {
        callbacks = callbacks.on_modal_open(move || invoke("onModalOpen", &f, &[]));
    }
    if let Some(f) = callback(options, "onModalClose") {
        callbacks = callbacks.on_modal_close(move || invoke("onModalClose", &f, &[]));
    }
    if let Some(f) = callback(options, "onButtonActivated") {
        callbacks = callbacks.on_button_activated(move || invoke("onButtonActivated", &f, &[]));
    }
    if let Some(f) = callback(options, "onButtonDeactivated") {
        callbacks =
            callbacks.on_button_deactivated(move || invoke("onButtonDeactivated", &f, &[]));
    }
    callbacks
}

fn mount_target(target: JsValue) -> Result<MountTarget<web_sys::Element>, VoltageError> {
    if let Some(selector) = target.as_string() {
        return Ok(MountTarget::Selector(selector));
    }
    target
        .dyn_into::<web_sys::Element>()
        .map(MountTarget::Element)
        .map_err(|_| VoltageError::InvalidTarget("target must be a selector or an element".into()))
}

/// Widget factory.
#[wasm_bindgen(js_name = VoltagePayments)]
pub struct JsVoltagePayments;

#[wasm_bindgen(js_class = VoltagePayments)]
impl JsVoltagePayments {
    /// Create a widget from an options object. Nothing is rendered until `mount`.
    pub fn create(options: JsValue) -> Result<JsPaymentComponent, JsValue> {
        let data = data_fields(&options).map_err(voltage_error_to_js)?;
        let widget =
            VoltagePayments::create_from_json(data, &host()).map_err(voltage_error_to_js)?;
        widget
            .update_options(PaymentOptionsPatch::new().callbacks(js_callbacks(&options)))
            .map_err(voltage_error_to_js)?;
        Ok(JsPaymentComponent {
            widget: Rc::new(widget),
        })
    }

    /// Use `component` (a class) for `variant`.
    #[wasm_bindgen(js_name = registerComponent)]
    pub fn register_component(variant: &str, component: Function) -> Result<(), JsValue> {
        let variant: PaymentVariant = variant.parse().map_err(voltage_error_to_js)?;
        HOST.with(|host| {
            host.loader
                .register(variant, ComponentSource::Constructor(component))
        });
        Ok(())
    }

    /// Load `variant`'s component from the default export of the module at `url`.
    #[wasm_bindgen(js_name = registerModule)]
    pub fn register_module(variant: &str, url: String) -> Result<(), JsValue> {
        let variant: PaymentVariant = variant.parse().map_err(voltage_error_to_js)?;
        HOST.with(|host| host.loader.register(variant, ComponentSource::Module(url)));
        Ok(())
    }

    pub fn version() -> String {
        VoltagePayments::version().to_string()
    }
}

/// A payment widget instance.
#[wasm_bindgen(js_name = PaymentComponent)]
pub struct JsPaymentComponent {
    widget: Rc<WebWidget>,
}

#[wasm_bindgen(js_class = PaymentComponent)]
impl JsPaymentComponent {
    /// Mount into a selector or an element. Resolves once the widget is live.
    pub fn mount(&self, target: JsValue) -> js_sys::Promise {
        let widget = self.widget.clone();
        future_to_promise(async move {
            let target = mount_target(target).map_err(voltage_error_to_js)?;
            widget.mount(target).await.map_err(voltage_error_to_js)?;
            Ok(JsValue::UNDEFINED)
        })
    }

    pub fn unmount(&self) {
        self.widget.unmount();
    }

    pub fn destroy(&self) {
        self.widget.destroy();
    }

    /// Merge a partial options object; `on*` functions replace callbacks.
    #[wasm_bindgen(js_name = updateOptions)]
    pub fn update_options(&self, patch: JsValue) -> Result<(), JsValue> {
        let data = data_fields(&patch).map_err(voltage_error_to_js)?;
        let mut parsed: PaymentOptionsPatch = serde_json::from_value(data)
            .map_err(|e| voltage_error_to_js(VoltageError::from(e)))?;
        parsed.callbacks = js_callbacks(&patch);
        self.widget
            .update_options(parsed)
            .map_err(voltage_error_to_js)
    }

    #[wasm_bindgen(js_name = getStatus)]
    pub fn get_status(&self) -> String {
        self.widget.status().as_str().to_string()
    }

    /// Latest payment snapshot, or `null`.
    #[wasm_bindgen(js_name = getPaymentData)]
    pub fn get_payment_data(&self) -> Result<JsValue, JsValue> {
        match self.widget.payment_data() {
            Some(payment) => to_js(&payment).map_err(voltage_error_to_js),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn variant(&self) -> String {
        self.widget.variant().as_str().to_string()
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.widget.is_mounted()
    }

    /// Modal only.
    pub fn open(&self) {
        if let Some(modal) = self.widget.as_modal() {
            modal.open();
        }
    }

    /// Modal only.
    pub fn close(&self) {
        if let Some(modal) = self.widget.as_modal() {
            modal.close();
        }
    }

    #[wasm_bindgen(js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        self.widget.as_modal().is_some_and(|modal| modal.is_open())
    }

    /// Button only.
    #[wasm_bindgen(js_name = togglePayment)]
    pub fn toggle_payment(&self) {
        if let Some(button) = self.widget.as_button() {
            button.toggle_payment();
        }
    }

    #[wasm_bindgen(js_name = isPaymentVisible)]
    pub fn is_payment_visible(&self) -> bool {
        self.widget
            .as_button()
            .is_some_and(|button| button.is_payment_visible())
    }
}
