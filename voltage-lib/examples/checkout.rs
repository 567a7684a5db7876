//! Headless Checkout Example
//!
//! Walks a modal widget through a full payment against the in-memory
//! document and a scripted surface:
//! - credentials from `VOLTAGE_*` environment variables
//! - trigger click opening the overlay
//! - surface events relayed to callbacks
//!
//! # Usage
//!
//! ```bash
//! VOLTAGE_API_KEY=vk_test VOLTAGE_WALLET_ID=wallet cargo run --example checkout
//! ```

use voltage_lib::prelude::*;
use voltage_lib::test_utils::{payment, test_host};

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let env = ApiEnvironment::from_env()?;

    let callbacks = PaymentCallbacks::default()
        .on_modal_open(|| println!("overlay opened"))
        .on_qr_generated(|_qr, request| println!("invoice: {request}"))
        .on_status_change(|status, payment| println!("{}: {status}", payment.id))
        .on_success(|payment| println!("paid {} msats", payment.amount.unwrap_or_default()))
        .on_modal_close(|| println!("overlay closed"));

    let options = PaymentOptions::new("", "")
        .with_amount(150_000)
        .with_description("Coffee")
        .with_variant(PaymentVariant::Modal)
        .with_callbacks(callbacks)
        .with_environment(&env);

    let host = test_host();
    let widget = VoltagePayments::create(options, &host);
    if let Err(err) = widget.mount("#container".into()).await {
        println!("mount failed ({:?}): {err}", err.code());
        println!("set VOLTAGE_API_KEY and VOLTAGE_WALLET_ID to run the checkout");
        return Ok(());
    }

    let modal = widget.as_modal().ok_or("not a modal widget")?;
    let trigger = modal.trigger().ok_or("trigger missing")?;
    host.dom.click(trigger);

    let surface = host.loader.last_surface().ok_or("surface missing")?;
    surface.emit(SurfaceEvent::Ready(payment("inv-1", PaymentStatus::Ready)));
    surface.emit(SurfaceEvent::QrGenerated {
        qr_data: "lightning:lnbc1500n1inv-1".into(),
        payment_request: "lnbc1500n1inv-1".into(),
    });
    surface.emit(SurfaceEvent::StatusChange {
        status: PaymentStatus::Processing,
        payment: payment("inv-1", PaymentStatus::Processing),
    });
    surface.emit(SurfaceEvent::Success(payment("inv-1", PaymentStatus::Completed)));
    surface.emit(SurfaceEvent::ModalClosed);

    println!("final status: {}", widget.status());
    widget.destroy();
    Ok(())
}
