#![cfg(target_arch = "wasm32")]
//! Voltage payment widgets for the browser
//!
//! JavaScript bindings over `voltage-lib`: a `web-sys` document, a loader
//! for the visual payment components, and the `VoltagePayments` factory.
//!
//! ```js
//! import init, { VoltagePayments } from "voltage-web";
//! import PaymentModal from "./PaymentModal.js";
//!
//! await init();
//! VoltagePayments.registerComponent("modal", PaymentModal);
//!
//! const widget = VoltagePayments.create({
//!   apiKey: "vk_...",
//!   walletId: "wallet-id",
//!   variant: "modal",
//!   onSuccess: (payment) => console.log("paid", payment.id),
//! });
//! await widget.mount("#checkout");
//! ```

use wasm_bindgen::prelude::*;

mod bindings;
mod js_surface;
mod utils;
mod web_dom;

pub use bindings::{JsPaymentComponent, JsVoltagePayments};
pub use js_surface::{ComponentSource, JsSurface, WebLoader};
pub use utils::voltage_error_to_js;
pub use web_dom::WebDom;

/// Initialize the WASM module
///
/// Runs once when the module is instantiated.
#[wasm_bindgen(start)]
pub fn init() {
    utils::set_panic_hook();
    utils::log(&format!(
        "Voltage payments {} initialized",
        env!("CARGO_PKG_VERSION")
    ));
}

/// Get the version of the Voltage payments module
#[wasm_bindgen]
pub fn version() -> String {
    voltage_lib::VoltagePayments::version().to_string()
}
