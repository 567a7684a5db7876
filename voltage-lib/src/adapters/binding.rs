//! State and lifecycle shared by every adapter variant.
//!
//! A `Binding` owns the caller's options, the live state, the surface handle
//! and the mount target. Surface listeners hold only a `Weak` reference to
//! it, so dropping the adapter frees the whole graph.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::dom::{Dom, MountTarget};
use crate::errors::VoltageError;
use crate::options::{NotifyCallback, PaymentCallbacks, PaymentOptions, PaymentOptionsPatch, SurfaceProps};
use crate::state::LiveState;
use crate::surface::{PaymentSurface, SurfaceEvent, SurfaceEventKind, SurfaceLoader};
use crate::types::{PaymentData, PaymentStatus, PaymentVariant};
use crate::Result;

/// Lifecycle phase of an adapter instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Created, never mounted.
    Idle,
    /// Waiting for the surface implementation to load.
    Mounting,
    /// Surface attached and listeners registered.
    Mounted,
    /// Unmounted; the instance must not be reused.
    Released,
}

/// Where the surface itself is attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SurfaceRoot {
    /// Inside the caller's target.
    Target,
    /// On the document's overlay root.
    Overlay,
}

pub(crate) struct Binding<D: Dom, S> {
    variant: PaymentVariant,
    dom: Rc<D>,
    options: RefCell<PaymentOptions>,
    live: RefCell<LiveState>,
    surface: RefCell<Option<Rc<S>>>,
    target: RefCell<Option<D::Node>>,
    phase: Cell<Phase>,
}

impl<D, S> Binding<D, S>
where
    D: Dom + 'static,
    S: PaymentSurface + 'static,
{
    pub(crate) fn new(variant: PaymentVariant, dom: Rc<D>, options: PaymentOptions) -> Rc<Self> {
        Rc::new(Self {
            variant,
            dom,
            options: RefCell::new(options),
            live: RefCell::new(LiveState::default()),
            surface: RefCell::new(None),
            target: RefCell::new(None),
            phase: Cell::new(Phase::Idle),
        })
    }

    pub(crate) fn dom(&self) -> &D {
        &self.dom
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase.get()
    }

    pub(crate) fn options(&self) -> PaymentOptions {
        self.options.borrow().clone()
    }

    pub(crate) fn surface(&self) -> Option<Rc<S>> {
        self.surface.borrow().clone()
    }

    pub(crate) fn status(&self) -> PaymentStatus {
        self.live.borrow().status
    }

    pub(crate) fn payment_data(&self) -> Option<PaymentData> {
        self.live.borrow().payment.clone()
    }

    pub(crate) fn live(&self) -> LiveState {
        self.live.borrow().clone()
    }

    pub(crate) fn update_live(&self, f: impl FnOnce(&mut LiveState)) {
        f(&mut self.live.borrow_mut());
    }

    fn props(&self) -> SurfaceProps {
        SurfaceProps::derive(&self.options.borrow(), self.variant)
    }

    /// Resolve the target, load the surface and register listeners.
    ///
    /// Returns the resolved caller container. On failure the instance goes
    /// back to idle and can be mounted again.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(variant = %self.variant)))]
    pub(crate) async fn mount<L>(
        self: &Rc<Self>,
        loader: &L,
        target: MountTarget<D::Node>,
        root: SurfaceRoot,
    ) -> Result<D::Node>
    where
        L: SurfaceLoader<D::Node, Surface = S>,
    {
        match self.phase.get() {
            Phase::Idle => {}
            Phase::Mounting | Phase::Mounted => return Err(VoltageError::AlreadyMounted),
            Phase::Released => return Err(VoltageError::Released),
        }
        self.phase.set(Phase::Mounting);

        match self.attach(loader, target, root).await {
            Ok(container) => {
                self.phase.set(Phase::Mounted);
                #[cfg(feature = "tracing")]
                tracing::debug!("payment surface mounted");
                Ok(container)
            }
            Err(err) => {
                self.phase.set(Phase::Idle);
                #[cfg(feature = "tracing")]
                tracing::warn!("mount failed: {err}");
                Err(err)
            }
        }
    }

    async fn attach<L>(
        self: &Rc<Self>,
        loader: &L,
        target: MountTarget<D::Node>,
        root: SurfaceRoot,
    ) -> Result<D::Node>
    where
        L: SurfaceLoader<D::Node, Surface = S>,
    {
        self.options.borrow().validate()?;
        let container = target.resolve(self.dom.as_ref())?;
        let surface_root = match root {
            SurfaceRoot::Target => container.clone(),
            SurfaceRoot::Overlay => self.dom.overlay_root()?,
        };

        let props = self.props();
        let surface = Rc::new(loader.load(self.variant, &surface_root, &props).await?);

        for kind in SurfaceEventKind::relayed_by(self.variant) {
            surface.on(kind, self.listener());
        }

        *self.surface.borrow_mut() = Some(surface);
        *self.target.borrow_mut() = Some(container.clone());
        Ok(container)
    }

    fn listener(self: &Rc<Self>) -> Rc<dyn Fn(SurfaceEvent)> {
        let weak = Rc::downgrade(self);
        Rc::new(move |event| {
            if let Some(binding) = weak.upgrade() {
                binding.dispatch(event);
            }
        })
    }

    /// Record the event, then hand it to the matching callback.
    ///
    /// No borrow is held while the callback runs, so callbacks may call
    /// back into the adapter.
    pub(crate) fn dispatch(&self, event: SurfaceEvent) {
        if self.phase.get() != Phase::Mounted {
            return;
        }

        let applied = self.live.borrow_mut().apply(&event);
        if !applied {
            #[cfg(feature = "tracing")]
            tracing::debug!(event = %event.kind(), "stale status update ignored");
        }

        let callbacks = self.options.borrow().callbacks.clone();
        match event {
            SurfaceEvent::Ready(payment) => {
                if let Some(cb) = callbacks.on_ready {
                    cb(&payment);
                }
            }
            SurfaceEvent::QrGenerated {
                qr_data,
                payment_request,
            } => {
                if let Some(cb) = callbacks.on_qr_generated {
                    cb(&qr_data, &payment_request);
                }
            }
            SurfaceEvent::StatusChange { status, payment } => {
                if let Some(cb) = callbacks.on_status_change {
                    cb(status, &payment);
                }
            }
            SurfaceEvent::Success(payment) => {
                if let Some(cb) = callbacks.on_success {
                    cb(&payment);
                }
            }
            SurfaceEvent::Error(error) => {
                if let Some(cb) = callbacks.on_error {
                    cb(&error);
                }
            }
            SurfaceEvent::Expired(payment) => {
                if let Some(cb) = callbacks.on_expired {
                    cb(&payment);
                }
            }
            SurfaceEvent::ButtonActivated => fire(callbacks.on_button_activated),
            SurfaceEvent::ButtonDeactivated => fire(callbacks.on_button_deactivated),
            SurfaceEvent::ModalClosed => fire(callbacks.on_modal_close),
        }
    }

    /// Fire a payload-less callback chosen from the current options.
    pub(crate) fn notify(&self, pick: impl FnOnce(&PaymentCallbacks) -> Option<NotifyCallback>) {
        let callback = pick(&self.options.borrow().callbacks);
        fire(callback);
    }

    /// Merge `patch` and push the re-derived props to a mounted surface.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(variant = %self.variant)))]
    pub(crate) fn update_options(&self, patch: PaymentOptionsPatch) -> Result<()> {
        self.options.borrow_mut().merge(patch);
        if let Some(surface) = self.surface() {
            let props = self.props();
            surface.set_props(&props)?;
        }
        Ok(())
    }

    /// Destroy the surface and release the instance.
    ///
    /// Returns the caller container when something was released; a no-op
    /// on instances that are idle, still mounting or already released.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(variant = %self.variant)))]
    pub(crate) fn unmount(&self) -> Option<D::Node> {
        if self.phase.get() != Phase::Mounted {
            return None;
        }
        self.phase.set(Phase::Released);

        let surface = self.surface.borrow_mut().take();
        if let Some(surface) = surface {
            surface.destroy();
        }
        *self.live.borrow_mut() = LiveState::default();
        self.target.borrow_mut().take()
    }
}

fn fire(callback: Option<NotifyCallback>) {
    if let Some(cb) = callback {
        cb();
    }
}
