//! JavaScript payment components behind the [`PaymentSurface`] trait.
//!
//! A component is a class constructed as `new Component({ target, props })`
//! exposing `$set(props)`, `$on(name, handler)` and `$destroy()`. Modal
//! components add `open()` / `close()`, button components
//! `togglePayment()`. Events are `CustomEvent`s whose `detail` carries the
//! payload.

use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;
use js_sys::{Array, Function, Object, Promise, Reflect};
use voltage_lib::surface::{PaymentSurface, SurfaceEvent, SurfaceEventKind, SurfaceListener, SurfaceLoader};
use voltage_lib::{PaymentVariant, SurfaceProps, VoltageError};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::Element;

use crate::utils::{self, describe_js, from_js, to_js};

type Result<T> = std::result::Result<T, VoltageError>;

#[wasm_bindgen]
extern "C" {
    /// Instance of a visual payment component.
    #[derive(Debug, Clone)]
    pub type JsComponent;

    /// `component.$set(props)`
    #[wasm_bindgen(method, catch, js_name = "$set")]
    fn set(this: &JsComponent, props: &JsValue) -> std::result::Result<(), JsValue>;

    /// `component.$on(name, handler)` → unsubscribe function
    #[wasm_bindgen(method, catch, js_name = "$on")]
    fn on(this: &JsComponent, name: &str, handler: &Function)
        -> std::result::Result<JsValue, JsValue>;

    /// `component.$destroy()`
    #[wasm_bindgen(method, catch, js_name = "$destroy")]
    fn destroy(this: &JsComponent) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn open(this: &JsComponent) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn close(this: &JsComponent) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = togglePayment)]
    fn toggle_payment(this: &JsComponent) -> std::result::Result<(), JsValue>;
}

type EventHandler = Closure<dyn FnMut(JsValue)>;

/// A constructed JS component.
pub struct JsSurface {
    component: JsComponent,
    handlers: RefCell<Vec<EventHandler>>,
}

impl JsSurface {
    pub fn new(component: JsComponent) -> Self {
        Self {
            component,
            handlers: RefCell::new(Vec::new()),
        }
    }

    /// The underlying component instance.
    pub fn component(&self) -> &JsComponent {
        &self.component
    }

    fn call(&self, what: &str, result: std::result::Result<(), JsValue>) {
        if let Err(err) = result {
            utils::warn(&format!("payment component {what} failed: {}", describe_js(&err)));
        }
    }
}

/// Decode a `CustomEvent` raised by a component.
fn decode_event(kind: SurfaceEventKind, event: &JsValue) -> Result<SurfaceEvent> {
    let detail = Reflect::get(event, &JsValue::from_str("detail")).unwrap_or(JsValue::UNDEFINED);
    SurfaceEvent::from_detail(kind, from_js(detail)?)
}

impl PaymentSurface for JsSurface {
    fn set_props(&self, props: &SurfaceProps) -> Result<()> {
        self.component
            .set(&to_js(props)?)
            .map_err(|e| VoltageError::Dom(format!("$set failed: {}", describe_js(&e))))
    }

    fn on(&self, kind: SurfaceEventKind, listener: SurfaceListener) {
        let handler = Closure::wrap(Box::new(move |event: JsValue| {
            match decode_event(kind, &event) {
                Ok(event) => listener(event),
                Err(err) => utils::warn(&format!("dropped malformed {kind} event: {err}")),
            }
        }) as Box<dyn FnMut(JsValue)>);

        match self
            .component
            .on(kind.name(), handler.as_ref().unchecked_ref())
        {
            Ok(_) => self.handlers.borrow_mut().push(handler),
            Err(err) => utils::warn(&format!(
                "cannot subscribe to {kind}: {}",
                describe_js(&err)
            )),
        }
    }

    fn destroy(&self) {
        self.call("$destroy", self.component.destroy());
        // Destroy can run from inside one of these handlers; release them
        // once the current call stack has unwound.
        let handlers = std::mem::take(&mut *self.handlers.borrow_mut());
        if !handlers.is_empty() {
            wasm_bindgen_futures::spawn_local(async move {
                drop(handlers);
            });
        }
    }

    fn open(&self) {
        self.call("open", self.component.open());
    }

    fn close(&self) {
        self.call("close", self.component.close());
    }

    fn toggle_payment(&self) {
        self.call("togglePayment", self.component.toggle_payment());
    }
}

/// Where a variant's component class comes from.
#[derive(Clone, Debug)]
pub enum ComponentSource {
    /// A class already loaded by the page.
    Constructor(Function),
    /// URL of an ES module whose default export is the class.
    Module(String),
}

/// Loads and constructs the registered component for each variant.
#[derive(Default)]
pub struct WebLoader {
    sources: RefCell<HashMap<PaymentVariant, ComponentSource>>,
}

impl WebLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the component used for `variant`, replacing any previous one.
    pub fn register(&self, variant: PaymentVariant, source: ComponentSource) {
        self.sources.borrow_mut().insert(variant, source);
    }

    pub fn is_registered(&self, variant: PaymentVariant) -> bool {
        self.sources.borrow().contains_key(&variant)
    }

    async fn constructor(&self, variant: PaymentVariant) -> Result<Function> {
        let source = self.sources.borrow().get(&variant).cloned();
        match source {
            Some(ComponentSource::Constructor(class)) => Ok(class),
            Some(ComponentSource::Module(url)) => import_default(&url).await,
            None => Err(VoltageError::SurfaceLoad(format!(
                "no component registered for the {variant} variant"
            ))),
        }
    }
}

/// `import(url)` and take the module's default export.
async fn import_default(url: &str) -> Result<Function> {
    let load_error = |e: JsValue| VoltageError::SurfaceLoad(format!("{url}: {}", describe_js(&e)));

    let import = Function::new_with_args("url", "return import(url)");
    let promise: Promise = import
        .call1(&JsValue::NULL, &JsValue::from_str(url))
        .map_err(load_error)?
        .dyn_into()
        .map_err(load_error)?;
    let module = JsFuture::from(promise).await.map_err(load_error)?;
    Reflect::get(&module, &JsValue::from_str("default"))
        .map_err(load_error)?
        .dyn_into::<Function>()
        .map_err(|_| VoltageError::SurfaceLoad(format!("{url}: default export is not a class")))
}

#[async_trait(?Send)]
impl SurfaceLoader<Element> for WebLoader {
    type Surface = JsSurface;

    async fn load(
        &self,
        variant: PaymentVariant,
        target: &Element,
        props: &SurfaceProps,
    ) -> Result<JsSurface> {
        let class = self.constructor(variant).await?;

        let init = Object::new();
        let set = |key: &str, value: &JsValue| {
            Reflect::set(&init, &JsValue::from_str(key), value)
                .map(|_| ())
                .map_err(|e| VoltageError::SurfaceLoad(describe_js(&e)))
        };
        set("target", target.as_ref())?;
        set("props", &to_js(props)?)?;

        let instance = Reflect::construct(&class, &Array::of1(&init)).map_err(|e| {
            VoltageError::SurfaceLoad(format!(
                "constructing the {variant} component failed: {}",
                describe_js(&e)
            ))
        })?;
        Ok(JsSurface::new(instance.unchecked_into()))
    }
}
