//! Button widget: a button in the caller's element that expands into the
//! payment view.

use std::rc::Rc;

use async_trait::async_trait;

use super::binding::{Binding, Phase, SurfaceRoot};
use crate::component::PaymentComponent;
use crate::dom::{Dom, MountTarget};
use crate::options::{PaymentOptions, PaymentOptionsPatch};
use crate::state::LiveState;
use crate::surface::{PaymentSurface, SurfaceLoader};
use crate::types::{PaymentData, PaymentStatus, PaymentVariant};
use crate::Result;

/// Adapter for the button variant.
pub struct ButtonAdapter<D, L>
where
    D: Dom + 'static,
    L: SurfaceLoader<D::Node>,
{
    loader: Rc<L>,
    binding: Rc<Binding<D, L::Surface>>,
}

impl<D, L> ButtonAdapter<D, L>
where
    D: Dom + 'static,
    L: SurfaceLoader<D::Node>,
{
    pub fn new(options: PaymentOptions, dom: Rc<D>, loader: Rc<L>) -> Self {
        Self {
            loader,
            binding: Binding::new(PaymentVariant::Button, dom, options),
        }
    }

    /// Ask the surface to show or hide the payment view.
    ///
    /// Visibility changes once the surface reports `buttonActivated` or
    /// `buttonDeactivated`.
    pub fn toggle_payment(&self) {
        if let Some(surface) = self.binding.surface() {
            surface.toggle_payment();
        }
    }

    /// Whether the payment view is expanded.
    pub fn is_payment_visible(&self) -> bool {
        self.binding.live().payment_visible
    }

    pub fn options(&self) -> PaymentOptions {
        self.binding.options()
    }

    pub fn live_state(&self) -> LiveState {
        self.binding.live()
    }
}

#[async_trait(?Send)]
impl<D, L> PaymentComponent for ButtonAdapter<D, L>
where
    D: Dom + 'static,
    L: SurfaceLoader<D::Node>,
{
    type Node = D::Node;

    async fn mount(&self, target: MountTarget<D::Node>) -> Result<()> {
        self.binding
            .mount(self.loader.as_ref(), target, SurfaceRoot::Target)
            .await?;
        Ok(())
    }

    fn unmount(&self) {
        self.binding.unmount();
    }

    fn update_options(&self, patch: PaymentOptionsPatch) -> Result<()> {
        self.binding.update_options(patch)
    }

    fn status(&self) -> PaymentStatus {
        self.binding.status()
    }

    fn payment_data(&self) -> Option<PaymentData> {
        self.binding.payment_data()
    }

    fn variant(&self) -> PaymentVariant {
        PaymentVariant::Button
    }

    fn is_mounted(&self) -> bool {
        self.binding.phase() == Phase::Mounted
    }
}
