//! Modal widget: trigger synthesis, overlay control, shared stylesheet.

use std::cell::Cell;
use std::rc::Rc;

use voltage_lib::adapters::{DEFAULT_TRIGGER_LABEL, TRIGGER_CLASS, TRIGGER_TEXT_SELECTOR};
use voltage_lib::styles::TRIGGER_STYLESHEET_ID;
use voltage_lib::test_utils::{payment, test_host, TestHost};
use voltage_lib::{
    AppearanceConfig, Dom, PaymentCallbacks, PaymentComponent, PaymentOptions,
    PaymentOptionsPatch, PaymentStatus, PaymentVariant, SurfaceEvent, SurfaceEventKind,
    VoltagePayments,
};

fn modal_options() -> PaymentOptions {
    PaymentOptions::new("k", "w").with_variant(PaymentVariant::Modal)
}

fn label_of(host: &TestHost, trigger: voltage_lib::test_utils::NodeId) -> String {
    let text = host
        .dom
        .query_within(&trigger, TRIGGER_TEXT_SELECTOR)
        .unwrap();
    host.dom.text(text)
}

fn counter() -> (Rc<Cell<u32>>, impl Fn() + 'static) {
    let count = Rc::new(Cell::new(0));
    let c = count.clone();
    (count, move || c.set(c.get() + 1))
}

#[tokio::test]
async fn test_mount_builds_trigger_and_overlay() {
    let host = test_host();
    let container = host.dom.query_selector("#container").unwrap();
    let widget = VoltagePayments::create(modal_options(), &host);
    widget.mount("#container".into()).await.unwrap();

    let surface = host.loader.last_surface().unwrap();
    assert_eq!(surface.target(), host.dom.body());
    assert_eq!(surface.props().auto_close, Some(true));
    assert_eq!(surface.listener_count(SurfaceEventKind::ModalClosed), 1);

    let modal = widget.as_modal().unwrap();
    let trigger = modal.trigger().unwrap();
    assert_eq!(host.dom.parent(trigger), Some(container));
    assert_eq!(host.dom.tag(trigger), "button");
    assert_eq!(host.dom.find_by_class(TRIGGER_CLASS), vec![trigger]);
    assert_eq!(label_of(&host, trigger), DEFAULT_TRIGGER_LABEL);
    assert_eq!(host.dom.count_id(TRIGGER_STYLESHEET_ID), 1);
}

#[tokio::test]
async fn test_trigger_label_is_text_not_markup() {
    let host = test_host();
    let widget = VoltagePayments::create(
        modal_options().with_description("<img src=x onerror=alert(1)>"),
        &host,
    );
    widget.mount("#container".into()).await.unwrap();

    let trigger = widget.as_modal().unwrap().trigger().unwrap();
    assert_eq!(label_of(&host, trigger), "<img src=x onerror=alert(1)>");
    assert!(host.dom.query_within(&trigger, "img").is_none());
}

#[tokio::test]
async fn test_two_modals_share_one_stylesheet() {
    let host = test_host();
    host.dom.append_div(host.dom.body(), "second");

    let first = VoltagePayments::create(modal_options(), &host);
    let second = VoltagePayments::create(
        modal_options().with_appearance(AppearanceConfig::default().with_primary_color("#123456")),
        &host,
    );
    first.mount("#container".into()).await.unwrap();
    second.mount("#second".into()).await.unwrap();

    assert_eq!(host.dom.count_id(TRIGGER_STYLESHEET_ID), 1);
    assert_eq!(host.dom.find_by_class(TRIGGER_CLASS).len(), 2);
}

#[tokio::test]
async fn test_trigger_click_opens_overlay() {
    let host = test_host();
    let (opened, on_open) = counter();
    let widget = VoltagePayments::create(
        modal_options().with_callbacks(PaymentCallbacks::default().on_modal_open(on_open)),
        &host,
    );
    widget.mount("#container".into()).await.unwrap();
    let modal = widget.as_modal().unwrap();
    let surface = host.loader.last_surface().unwrap();

    host.dom.click(modal.trigger().unwrap());

    assert_eq!(surface.open_calls(), 1);
    assert_eq!(opened.get(), 1);
    assert!(modal.is_open());
}

#[tokio::test]
async fn test_close_hides_overlay() {
    let host = test_host();
    let (closed, on_close) = counter();
    let widget = VoltagePayments::create(
        modal_options().with_callbacks(PaymentCallbacks::default().on_modal_close(on_close)),
        &host,
    );
    widget.mount("#container".into()).await.unwrap();
    let modal = widget.as_modal().unwrap();
    let surface = host.loader.last_surface().unwrap();

    modal.open();
    modal.close();

    assert_eq!(surface.close_calls(), 1);
    assert_eq!(closed.get(), 1);
    assert!(!modal.is_open());
}

#[tokio::test]
async fn test_surface_close_event_fires_callback_once() {
    let host = test_host();
    let (closed, on_close) = counter();
    let widget = VoltagePayments::create(
        modal_options().with_callbacks(PaymentCallbacks::default().on_modal_close(on_close)),
        &host,
    );
    widget.mount("#container".into()).await.unwrap();
    let modal = widget.as_modal().unwrap();
    let surface = host.loader.last_surface().unwrap();

    modal.open();
    surface.emit(SurfaceEvent::ModalClosed);

    assert_eq!(closed.get(), 1);
    assert!(!modal.is_open());
    assert_eq!(widget.status(), PaymentStatus::Generating);
}

#[tokio::test]
async fn test_open_before_mount_is_noop() {
    let host = test_host();
    let (opened, on_open) = counter();
    let widget = VoltagePayments::create(
        modal_options().with_callbacks(PaymentCallbacks::default().on_modal_open(on_open)),
        &host,
    );
    let modal = widget.as_modal().unwrap();
    modal.open();
    modal.close();
    assert_eq!(opened.get(), 0);
    assert!(!modal.is_open());
}

#[tokio::test]
async fn test_description_update_relabels_trigger() {
    let host = test_host();
    let widget = VoltagePayments::create(modal_options().with_amount(21_000), &host);
    widget.mount("#container".into()).await.unwrap();
    let trigger = widget.as_modal().unwrap().trigger().unwrap();
    let surface = host.loader.last_surface().unwrap();

    widget
        .update_options(PaymentOptionsPatch::new().description("X"))
        .unwrap();

    assert_eq!(label_of(&host, trigger), "X");
    let props = surface.props();
    assert_eq!(props.description, "X");
    assert_eq!(props.amount, Some(21_000));
    assert_eq!(props.auto_close, Some(true));
}

#[tokio::test]
async fn test_blank_description_update_keeps_label() {
    let host = test_host();
    let widget = VoltagePayments::create(modal_options().with_description("Coffee"), &host);
    widget.mount("#container".into()).await.unwrap();
    let trigger = widget.as_modal().unwrap().trigger().unwrap();
    let surface = host.loader.last_surface().unwrap();

    widget
        .update_options(PaymentOptionsPatch::new().description(""))
        .unwrap();

    assert_eq!(label_of(&host, trigger), "Coffee");
    assert_eq!(surface.props().description, "");
}

#[tokio::test]
async fn test_unmount_removes_trigger() {
    let host = test_host();
    let container = host.dom.query_selector("#container").unwrap();
    let widget = VoltagePayments::create(modal_options(), &host);
    widget.mount("#container".into()).await.unwrap();
    let modal = widget.as_modal().unwrap();
    let trigger = modal.trigger().unwrap();
    let surface = host.loader.last_surface().unwrap();

    widget.unmount();

    assert!(host.dom.children(container).is_empty());
    assert!(modal.trigger().is_none());
    assert!(surface.is_destroyed());

    // A stale click on the detached button does nothing.
    host.dom.click(trigger);
    assert_eq!(surface.open_calls(), 0);

    widget.unmount();
}

#[tokio::test]
async fn test_modal_payment_flow() {
    let host = test_host();
    let (succeeded, on_success) = {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, move |_: &voltage_lib::PaymentData| c.set(c.get() + 1))
    };
    let widget = VoltagePayments::create(
        modal_options().with_callbacks(PaymentCallbacks::default().on_success(on_success)),
        &host,
    );
    widget.mount("#container".into()).await.unwrap();
    let surface = host.loader.last_surface().unwrap();

    host.dom.click(widget.as_modal().unwrap().trigger().unwrap());
    surface.emit(SurfaceEvent::Ready(payment("p1", PaymentStatus::Ready)));
    surface.emit(SurfaceEvent::Success(payment("p1", PaymentStatus::Completed)));

    assert_eq!(succeeded.get(), 1);
    assert_eq!(widget.status(), PaymentStatus::Completed);
    assert_eq!(
        widget.payment_data().unwrap().payment_request.as_deref(),
        Some("lnbc1500n1p1")
    );
}
