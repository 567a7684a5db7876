//! Modal widget: a trigger button in the caller's element opens a payment
//! overlay attached to the document body.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;

use super::binding::{Binding, Phase, SurfaceRoot};
use crate::component::PaymentComponent;
use crate::dom::{Dom, MountTarget};
use crate::options::{PaymentOptions, PaymentOptionsPatch};
use crate::state::LiveState;
use crate::styles::ensure_trigger_styles;
use crate::surface::{PaymentSurface, SurfaceLoader};
use crate::types::{PaymentData, PaymentStatus, PaymentVariant};
use crate::Result;

/// Class of the synthesized trigger button.
pub const TRIGGER_CLASS: &str = "voltage-modal-trigger";
/// Selector of the trigger's label span.
pub const TRIGGER_TEXT_SELECTOR: &str = ".voltage-modal-trigger-text";
/// Label used when no description is set.
pub const DEFAULT_TRIGGER_LABEL: &str = "Pay with Bitcoin";

// The label is filled in as text content after creation.
const TRIGGER_MARKUP: &str = r#"<svg class="voltage-modal-trigger-icon" width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><path d="M12 2L2 7v10c0 5.55 3.84 10 9 11 5.16-1 9-5.45 9-11V7z"/><path d="M9 12l2 2 4-4"/></svg><span class="voltage-modal-trigger-text"></span>"#;

/// Trigger label for a description.
pub fn trigger_label(description: Option<&str>) -> &str {
    match description {
        Some(text) if !text.trim().is_empty() => text,
        _ => DEFAULT_TRIGGER_LABEL,
    }
}

/// Adapter for the modal variant.
pub struct ModalAdapter<D, L>
where
    D: Dom + 'static,
    L: SurfaceLoader<D::Node>,
{
    loader: Rc<L>,
    binding: Rc<Binding<D, L::Surface>>,
    trigger: RefCell<Option<D::Node>>,
}

impl<D, L> ModalAdapter<D, L>
where
    D: Dom + 'static,
    L: SurfaceLoader<D::Node>,
{
    pub fn new(options: PaymentOptions, dom: Rc<D>, loader: Rc<L>) -> Self {
        Self {
            loader,
            binding: Binding::new(PaymentVariant::Modal, dom, options),
            trigger: RefCell::new(None),
        }
    }

    /// Show the overlay and fire `on_modal_open`. No-op when not mounted.
    pub fn open(&self) {
        open_modal(&self.binding);
    }

    /// Hide the overlay and fire `on_modal_close`. No-op when not mounted.
    pub fn close(&self) {
        let Some(surface) = self.binding.surface() else {
            return;
        };
        surface.close();
        self.binding.update_live(|live| live.modal_open = false);
        self.binding.notify(|cb| cb.on_modal_close.clone());
    }

    /// Whether the overlay is currently shown.
    pub fn is_open(&self) -> bool {
        self.binding.live().modal_open
    }

    /// The synthesized trigger button, while mounted.
    pub fn trigger(&self) -> Option<D::Node> {
        self.trigger.borrow().clone()
    }

    pub fn options(&self) -> PaymentOptions {
        self.binding.options()
    }

    pub fn live_state(&self) -> LiveState {
        self.binding.live()
    }

    fn build_trigger(&self, container: &D::Node) -> Result<D::Node> {
        let dom = self.binding.dom();
        let options = self.binding.options();

        let trigger = dom.create_element("button", TRIGGER_CLASS, TRIGGER_MARKUP)?;
        if let Some(text) = dom.query_within(&trigger, TRIGGER_TEXT_SELECTOR) {
            dom.set_text(&text, trigger_label(options.description.as_deref()));
        }

        let weak = Rc::downgrade(&self.binding);
        dom.on_click(
            &trigger,
            Rc::new(move || {
                if let Some(binding) = weak.upgrade() {
                    open_modal(&binding);
                }
            }),
        )?;

        ensure_trigger_styles(dom, &options.appearance.unwrap_or_default())?;
        dom.append_child(container, &trigger)?;
        Ok(trigger)
    }

    fn set_trigger_label(&self, description: &str) {
        let trigger = self.trigger.borrow();
        let Some(trigger) = trigger.as_ref() else {
            return;
        };
        let dom = self.binding.dom();
        if let Some(text) = dom.query_within(trigger, TRIGGER_TEXT_SELECTOR) {
            dom.set_text(&text, trigger_label(Some(description)));
        }
    }
}

fn open_modal<D, S>(binding: &Binding<D, S>)
where
    D: Dom + 'static,
    S: PaymentSurface + 'static,
{
    let Some(surface) = binding.surface() else {
        return;
    };
    surface.open();
    binding.update_live(|live| live.modal_open = true);
    binding.notify(|cb| cb.on_modal_open.clone());
}

#[async_trait(?Send)]
impl<D, L> PaymentComponent for ModalAdapter<D, L>
where
    D: Dom + 'static,
    L: SurfaceLoader<D::Node>,
{
    type Node = D::Node;

    async fn mount(&self, target: MountTarget<D::Node>) -> Result<()> {
        let container = self
            .binding
            .mount(self.loader.as_ref(), target, SurfaceRoot::Overlay)
            .await?;

        match self.build_trigger(&container) {
            Ok(trigger) => {
                *self.trigger.borrow_mut() = Some(trigger);
                Ok(())
            }
            Err(err) => {
                // The surface is already attached; release it with the instance.
                self.binding.unmount();
                Err(err)
            }
        }
    }

    fn unmount(&self) {
        let Some(container) = self.binding.unmount() else {
            return;
        };
        let trigger = self.trigger.borrow_mut().take();
        if let Some(trigger) = trigger {
            if let Err(_err) = self.binding.dom().remove_child(&container, &trigger) {
                #[cfg(feature = "tracing")]
                tracing::warn!("failed to remove modal trigger: {_err}");
            }
        }
    }

    fn update_options(&self, patch: PaymentOptionsPatch) -> Result<()> {
        // A blank description keeps the current label.
        let description = patch
            .description
            .clone()
            .filter(|text| !text.trim().is_empty());
        let pushed = self.binding.update_options(patch);
        if let Some(description) = description {
            self.set_trigger_label(&description);
        }
        pushed
    }

    fn status(&self) -> PaymentStatus {
        self.binding.status()
    }

    fn payment_data(&self) -> Option<PaymentData> {
        self.binding.payment_data()
    }

    fn variant(&self) -> PaymentVariant {
        PaymentVariant::Modal
    }

    fn is_mounted(&self) -> bool {
        self.binding.phase() == Phase::Mounted
    }
}
