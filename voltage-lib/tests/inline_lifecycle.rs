//! Inline widget lifecycle: mount validation, event relay, updates, teardown.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use voltage_lib::test_utils::{payment, test_host, MemoryDom, MockLoader, MockSurface, TestHost};
use voltage_lib::{
    Dom, MountTarget, PaymentCallbacks, PaymentComponent, PaymentError, PaymentKind, PaymentOptions,
    PaymentOptionsPatch, PaymentStatus, PaymentWidget, SurfaceEvent, SurfaceEventKind,
    VoltageError, VoltagePayments,
};

type Log = Rc<RefCell<Vec<String>>>;
type Widget = PaymentWidget<MemoryDom, MockLoader>;

fn recording_callbacks(log: &Log) -> PaymentCallbacks {
    let l = log.clone();
    let callbacks = PaymentCallbacks::default().on_ready(move |p| l.borrow_mut().push(format!("ready:{}", p.id)));
    let l = log.clone();
    let callbacks = callbacks.on_qr_generated(move |qr, request| {
        l.borrow_mut().push(format!("qr:{qr}|{request}"))
    });
    let l = log.clone();
    let callbacks = callbacks.on_status_change(move |status, p| {
        l.borrow_mut().push(format!("status:{status}:{}", p.id))
    });
    let l = log.clone();
    let callbacks = callbacks.on_success(move |p| l.borrow_mut().push(format!("success:{}", p.id)));
    let l = log.clone();
    let callbacks = callbacks.on_error(move |e| l.borrow_mut().push(format!("error:{}", e.message)));
    let l = log.clone();
    callbacks.on_expired(move |p| l.borrow_mut().push(format!("expired:{}", p.id)))
}

async fn mounted_inline(host: &TestHost, log: &Log) -> (Widget, MockSurface) {
    let options = PaymentOptions::new("k", "w")
        .with_amount(150_000)
        .with_callbacks(recording_callbacks(log));
    let widget = VoltagePayments::create(options, host);
    widget.mount("#container".into()).await.unwrap();
    let surface = host.loader.last_surface().unwrap();
    (widget, surface)
}

#[tokio::test]
async fn test_mount_missing_selector_fails() {
    let host = test_host();
    let widget = VoltagePayments::create(PaymentOptions::new("k", "w"), &host);

    let err = widget.mount("#nope".into()).await.unwrap_err();
    assert!(matches!(err, VoltageError::TargetNotFound(ref s) if s == "#nope"));
    assert_eq!(host.loader.load_count(), 0);

    // A failed mount leaves the instance usable.
    widget.mount("#container".into()).await.unwrap();
    assert!(widget.is_mounted());
}

#[tokio::test]
async fn test_mount_non_container_fails() {
    let host = test_host();
    let text = host.dom.append_text(host.dom.body(), "not an element");
    let widget = VoltagePayments::create(PaymentOptions::new("k", "w"), &host);

    let err = widget.mount(MountTarget::Element(text)).await.unwrap_err();
    assert!(matches!(err, VoltageError::InvalidTarget(_)));
    assert_eq!(host.loader.load_count(), 0);
}

#[tokio::test]
async fn test_mount_selector_on_non_container_fails() {
    let host = test_host();
    host.dom.append_element(host.dom.body(), "svg", "badge");
    let widget = VoltagePayments::create(PaymentOptions::new("k", "w"), &host);

    let err = widget.mount("#badge".into()).await.unwrap_err();
    assert!(matches!(err, VoltageError::InvalidTarget(ref s) if s == "#badge"));
    assert_eq!(host.loader.load_count(), 0);
    assert!(!widget.is_mounted());
}

#[tokio::test]
async fn test_mount_requires_credentials() {
    let host = test_host();
    let widget = VoltagePayments::create(PaymentOptions::new("k", ""), &host);
    let err = widget.mount("#container".into()).await.unwrap_err();
    assert!(matches!(err, VoltageError::MissingField("walletId")));
    assert_eq!(host.loader.load_count(), 0);
}

#[tokio::test]
async fn test_mount_attaches_one_surface_with_defaults() {
    let host = test_host();
    let container = host.dom.query_selector("#container").unwrap();
    let log = Log::default();
    let (widget, surface) = mounted_inline(&host, &log).await;

    assert!(widget.is_mounted());
    assert_eq!(host.loader.load_count(), 1);
    assert_eq!(surface.target(), container);

    let props = surface.props();
    assert_eq!(props.payment_kind, PaymentKind::Bip21);
    assert_eq!(props.description, "");
    assert_eq!(props.amount, Some(150_000));
    assert!(props.show_qr_code && props.show_copy_button);
    assert_eq!(props.auto_close, None);

    for kind in SurfaceEventKind::CORE {
        assert_eq!(surface.listener_count(kind), 1, "{kind}");
    }
    assert_eq!(surface.listener_count(SurfaceEventKind::ModalClosed), 0);
}

#[tokio::test]
async fn test_mount_by_element_handle() {
    let host = test_host();
    let target = host.dom.append_div(host.dom.body(), "other");
    let widget = VoltagePayments::create(PaymentOptions::new("k", "w"), &host);
    widget.mount(MountTarget::Element(target)).await.unwrap();
    assert_eq!(host.loader.last_surface().unwrap().target(), target);
}

#[tokio::test]
async fn test_second_mount_is_rejected() {
    let host = test_host();
    let log = Log::default();
    let (widget, _surface) = mounted_inline(&host, &log).await;

    let err = widget.mount("#container".into()).await.unwrap_err();
    assert!(matches!(err, VoltageError::AlreadyMounted));
    assert_eq!(host.loader.load_count(), 1);
}

#[tokio::test]
async fn test_core_events_reach_callbacks_once() {
    let host = test_host();
    let log = Log::default();
    let (_widget, surface) = mounted_inline(&host, &log).await;

    surface.emit(SurfaceEvent::Ready(payment("p1", PaymentStatus::Ready)));
    surface.emit(SurfaceEvent::QrGenerated {
        qr_data: "QR".into(),
        payment_request: "lnbc1".into(),
    });
    surface.emit(SurfaceEvent::StatusChange {
        status: PaymentStatus::Processing,
        payment: payment("p1", PaymentStatus::Processing),
    });
    surface.emit(SurfaceEvent::Success(payment("p1", PaymentStatus::Completed)));
    surface.emit(SurfaceEvent::Error(PaymentError::new("boom")));
    surface.emit(SurfaceEvent::Expired(payment("p2", PaymentStatus::Expired)));

    assert_eq!(
        *log.borrow(),
        vec![
            "ready:p1",
            "qr:QR|lnbc1",
            "status:processing:p1",
            "success:p1",
            "error:boom",
            "expired:p2",
        ]
    );
}

#[tokio::test]
async fn test_status_reflects_surface_events() {
    let host = test_host();
    let log = Log::default();
    let (widget, surface) = mounted_inline(&host, &log).await;

    assert_eq!(widget.status(), PaymentStatus::Generating);
    assert!(widget.payment_data().is_none());

    surface.emit(SurfaceEvent::Ready(payment("p1", PaymentStatus::Ready)));
    assert_eq!(widget.status(), PaymentStatus::Ready);
    assert_eq!(widget.payment_data().unwrap().id, "p1");

    surface.emit(SurfaceEvent::Success(payment("p1", PaymentStatus::Completed)));
    assert_eq!(widget.status(), PaymentStatus::Completed);

    // Stale update for the settled payment is ignored, but still relayed.
    surface.emit(SurfaceEvent::StatusChange {
        status: PaymentStatus::Processing,
        payment: payment("p1", PaymentStatus::Processing),
    });
    assert_eq!(widget.status(), PaymentStatus::Completed);
    assert_eq!(log.borrow().last().unwrap(), "status:processing:p1");
}

#[tokio::test]
async fn test_late_terminal_status_does_not_override_settled_payment() {
    let host = test_host();
    let log = Log::default();
    let (widget, surface) = mounted_inline(&host, &log).await;

    surface.emit(SurfaceEvent::Success(payment("p1", PaymentStatus::Completed)));
    surface.emit(SurfaceEvent::Expired(payment("p1", PaymentStatus::Expired)));

    assert_eq!(widget.status(), PaymentStatus::Completed);
    assert_eq!(widget.payment_data().unwrap().status, PaymentStatus::Completed);
    // Still relayed to the page.
    assert_eq!(*log.borrow(), vec!["success:p1", "expired:p1"]);
}

#[tokio::test]
async fn test_update_options_merges_and_pushes() {
    let host = test_host();
    let log = Log::default();
    let (widget, surface) = mounted_inline(&host, &log).await;

    widget
        .update_options(PaymentOptionsPatch::new().description("X"))
        .unwrap();

    assert_eq!(surface.props_updates(), 2);
    let props = surface.props();
    assert_eq!(props.description, "X");
    assert_eq!(props.amount, Some(150_000));
    assert_eq!(props.api_key, "k");
    assert_eq!(props.wallet_id, "w");
}

#[tokio::test]
async fn test_update_before_mount_is_used_at_mount() {
    let host = test_host();
    let widget = VoltagePayments::create(PaymentOptions::new("k", "w"), &host);
    widget
        .update_options(PaymentOptionsPatch::new().description("Later"))
        .unwrap();
    assert_eq!(host.loader.load_count(), 0);

    widget.mount("#container".into()).await.unwrap();
    let surface = host.loader.last_surface().unwrap();
    assert_eq!(surface.props().description, "Later");
    assert_eq!(surface.props_updates(), 1);
}

#[tokio::test]
async fn test_replaced_callback_takes_effect() {
    let host = test_host();
    let log = Log::default();
    let (widget, surface) = mounted_inline(&host, &log).await;

    let l = log.clone();
    widget
        .update_options(PaymentOptionsPatch::new().callbacks(
            PaymentCallbacks::default().on_ready(move |_| l.borrow_mut().push("new-ready".into())),
        ))
        .unwrap();

    surface.emit(SurfaceEvent::Ready(payment("p1", PaymentStatus::Ready)));
    assert_eq!(*log.borrow(), vec!["new-ready"]);
}

#[tokio::test]
async fn test_unmount_is_idempotent() {
    let host = test_host();
    let log = Log::default();
    let (widget, surface) = mounted_inline(&host, &log).await;

    widget.unmount();
    assert!(surface.is_destroyed());
    assert!(!widget.is_mounted());
    assert_eq!(widget.status(), PaymentStatus::Generating);

    widget.unmount();
    widget.destroy();
    assert!(!widget.is_mounted());

    // Events from a destroyed surface are not relayed.
    surface.emit(SurfaceEvent::Ready(payment("p1", PaymentStatus::Ready)));
    assert!(log.borrow().is_empty());
}

#[tokio::test]
async fn test_released_instance_cannot_remount() {
    let host = test_host();
    let log = Log::default();
    let (widget, _surface) = mounted_inline(&host, &log).await;
    widget.destroy();

    let err = widget.mount("#container".into()).await.unwrap_err();
    assert!(matches!(err, VoltageError::Released));
}

#[tokio::test]
async fn test_unmount_before_mount_is_noop() {
    let host = test_host();
    let widget = VoltagePayments::create(PaymentOptions::new("k", "w"), &host);
    widget.unmount();
    widget.mount("#container".into()).await.unwrap();
    assert!(widget.is_mounted());
}

#[tokio::test]
async fn test_load_failure_is_reported() {
    let host = test_host();
    host.loader.fail_next("chunk failed");
    let widget = VoltagePayments::create(PaymentOptions::new("k", "w"), &host);

    let err = widget.mount("#container".into()).await.unwrap_err();
    assert!(matches!(err, VoltageError::SurfaceLoad(ref r) if r == "chunk failed"));
    assert!(!widget.is_mounted());

    widget.mount("#container".into()).await.unwrap();
    assert_eq!(host.loader.load_count(), 1);
}

#[tokio::test]
async fn test_callback_may_destroy_widget() {
    let host = test_host();
    let slot: Rc<RefCell<Weak<Widget>>> = Rc::new(RefCell::new(Weak::new()));

    let s = slot.clone();
    let options = PaymentOptions::new("k", "w").with_callbacks(PaymentCallbacks::default().on_success(
        move |_| {
            if let Some(widget) = s.borrow().upgrade() {
                widget.destroy();
            }
        },
    ));
    let widget = Rc::new(VoltagePayments::create(options, &host));
    *slot.borrow_mut() = Rc::downgrade(&widget);

    widget.mount("#container".into()).await.unwrap();
    let surface = host.loader.last_surface().unwrap();
    surface.emit(SurfaceEvent::Success(payment("p1", PaymentStatus::Completed)));

    assert!(surface.is_destroyed());
    assert!(!widget.is_mounted());
}
