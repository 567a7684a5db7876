//! Live widget state observed from surface events.

use crate::surface::SurfaceEvent;
use crate::types::{PaymentData, PaymentError, PaymentStatus};

/// What the adapter has learned from the surface so far.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LiveState {
    pub status: PaymentStatus,
    pub payment: Option<PaymentData>,
    pub last_error: Option<PaymentError>,
    /// Latest `(qr_data, payment_request)`.
    pub qr: Option<(String, String)>,
    /// Button variant: payment view expanded.
    pub payment_visible: bool,
    /// Modal variant: overlay shown.
    pub modal_open: bool,
}

impl LiveState {
    /// Fold a surface event into the state.
    ///
    /// Returns false when the event was a stale status update and was
    /// dropped. Callbacks still fire for dropped events.
    pub fn apply(&mut self, event: &SurfaceEvent) -> bool {
        match event {
            SurfaceEvent::Ready(payment) => self.record(PaymentStatus::Ready, payment),
            SurfaceEvent::QrGenerated {
                qr_data,
                payment_request,
            } => {
                self.qr = Some((qr_data.clone(), payment_request.clone()));
                true
            }
            SurfaceEvent::StatusChange { status, payment } => self.record(*status, payment),
            SurfaceEvent::Success(payment) => self.record(PaymentStatus::Completed, payment),
            SurfaceEvent::Expired(payment) => self.record(PaymentStatus::Expired, payment),
            SurfaceEvent::Error(error) => {
                self.last_error = Some(error.clone());
                true
            }
            SurfaceEvent::ButtonActivated => {
                self.payment_visible = true;
                true
            }
            SurfaceEvent::ButtonDeactivated => {
                self.payment_visible = false;
                true
            }
            SurfaceEvent::ModalClosed => {
                self.modal_open = false;
                true
            }
        }
    }

    /// Once a payment settles, any later status for it is stale, terminal
    /// or not. A different payment id starts a new lifecycle.
    fn record(&mut self, status: PaymentStatus, payment: &PaymentData) -> bool {
        let same_payment = self.payment.as_ref().is_some_and(|p| p.id == payment.id);
        if same_payment && self.status.is_terminal() {
            return false;
        }
        self.status = status;
        self.payment = Some(payment.clone());
        true
    }
}
