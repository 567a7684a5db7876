//! The capability set shared by every payment widget.

use async_trait::async_trait;

use crate::dom::MountTarget;
use crate::options::PaymentOptionsPatch;
use crate::types::{PaymentData, PaymentStatus, PaymentVariant};
use crate::Result;

/// Imperative lifecycle of a payment widget.
#[async_trait(?Send)]
pub trait PaymentComponent {
    /// Element handle type of the underlying document.
    type Node;

    /// Attach the widget to `target`.
    ///
    /// Fails with `TargetNotFound` or `InvalidTarget` for bad targets,
    /// `MissingField` when a required option is empty, and
    /// `AlreadyMounted` when called twice.
    async fn mount(&self, target: MountTarget<Self::Node>) -> Result<()>;

    /// Release the surface and any adapter-created DOM. Idempotent.
    fn unmount(&self);

    /// Alias for [`unmount`](Self::unmount).
    fn destroy(&self) {
        self.unmount();
    }

    /// Merge `patch` into the stored options and push the result to the
    /// surface when mounted.
    fn update_options(&self, patch: PaymentOptionsPatch) -> Result<()>;

    /// Latest status reported by the surface.
    fn status(&self) -> PaymentStatus;

    /// Latest payment snapshot reported by the surface.
    fn payment_data(&self) -> Option<PaymentData>;

    fn variant(&self) -> PaymentVariant;

    /// Whether a surface is currently attached.
    fn is_mounted(&self) -> bool;
}
