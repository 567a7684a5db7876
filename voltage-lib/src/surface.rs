//! Contract of the payment UI surface.
//!
//! The surface renders the payment request, polls the payments API and raises
//! lifecycle events. Adapters only see it through [`PaymentSurface`] and
//! [`SurfaceLoader`], so the rendering technology can change without touching
//! adapter logic.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::VoltageError;
use crate::options::SurfaceProps;
use crate::types::{PaymentData, PaymentError, PaymentStatus, PaymentVariant};
use crate::Result;

/// Named events raised by a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceEventKind {
    Ready,
    QrGenerated,
    StatusChange,
    Success,
    Error,
    Expired,
    ButtonActivated,
    ButtonDeactivated,
    ModalClosed,
}

impl SurfaceEventKind {
    /// Events every variant relays.
    pub const CORE: [SurfaceEventKind; 6] = [
        Self::Ready,
        Self::QrGenerated,
        Self::StatusChange,
        Self::Success,
        Self::Error,
        Self::Expired,
    ];

    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::QrGenerated => "qrGenerated",
            Self::StatusChange => "statusChange",
            Self::Success => "success",
            Self::Error => "error",
            Self::Expired => "expired",
            Self::ButtonActivated => "buttonActivated",
            Self::ButtonDeactivated => "buttonDeactivated",
            Self::ModalClosed => "modalClosed",
        }
    }

    /// Events relayed by `variant`, core events first.
    pub fn relayed_by(variant: PaymentVariant) -> Vec<SurfaceEventKind> {
        let mut kinds = Self::CORE.to_vec();
        match variant {
            PaymentVariant::Inline => {}
            PaymentVariant::Modal => kinds.push(Self::ModalClosed),
            PaymentVariant::Button => {
                kinds.push(Self::ButtonActivated);
                kinds.push(Self::ButtonDeactivated);
            }
        }
        kinds
    }
}

impl FromStr for SurfaceEventKind {
    type Err = VoltageError;

    fn from_str(s: &str) -> Result<Self> {
        let kind = match s {
            "ready" => Self::Ready,
            "qrGenerated" => Self::QrGenerated,
            "statusChange" => Self::StatusChange,
            "success" => Self::Success,
            "error" => Self::Error,
            "expired" => Self::Expired,
            "buttonActivated" => Self::ButtonActivated,
            "buttonDeactivated" => Self::ButtonDeactivated,
            "modalClosed" => Self::ModalClosed,
            other => {
                return Err(VoltageError::Serialization(format!(
                    "unknown surface event: {other}"
                )))
            }
        };
        Ok(kind)
    }
}

impl fmt::Display for SurfaceEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An event raised by the surface, with its payload.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceEvent {
    Ready(PaymentData),
    QrGenerated {
        qr_data: String,
        payment_request: String,
    },
    StatusChange {
        status: PaymentStatus,
        payment: PaymentData,
    },
    Success(PaymentData),
    Error(PaymentError),
    Expired(PaymentData),
    ButtonActivated,
    ButtonDeactivated,
    ModalClosed,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QrDetail {
    qr_data: String,
    payment_request: String,
}

#[derive(Deserialize)]
struct StatusDetail {
    status: PaymentStatus,
    payment: PaymentData,
}

impl SurfaceEvent {
    pub fn kind(&self) -> SurfaceEventKind {
        match self {
            Self::Ready(_) => SurfaceEventKind::Ready,
            Self::QrGenerated { .. } => SurfaceEventKind::QrGenerated,
            Self::StatusChange { .. } => SurfaceEventKind::StatusChange,
            Self::Success(_) => SurfaceEventKind::Success,
            Self::Error(_) => SurfaceEventKind::Error,
            Self::Expired(_) => SurfaceEventKind::Expired,
            Self::ButtonActivated => SurfaceEventKind::ButtonActivated,
            Self::ButtonDeactivated => SurfaceEventKind::ButtonDeactivated,
            Self::ModalClosed => SurfaceEventKind::ModalClosed,
        }
    }

    /// Decode an event from its name and its `detail` payload.
    pub fn from_detail(kind: SurfaceEventKind, detail: serde_json::Value) -> Result<Self> {
        let event = match kind {
            SurfaceEventKind::Ready => Self::Ready(serde_json::from_value(detail)?),
            SurfaceEventKind::QrGenerated => {
                let QrDetail {
                    qr_data,
                    payment_request,
                } = serde_json::from_value(detail)?;
                Self::QrGenerated {
                    qr_data,
                    payment_request,
                }
            }
            SurfaceEventKind::StatusChange => {
                let StatusDetail { status, payment } = serde_json::from_value(detail)?;
                Self::StatusChange { status, payment }
            }
            SurfaceEventKind::Success => Self::Success(serde_json::from_value(detail)?),
            SurfaceEventKind::Error => Self::Error(serde_json::from_value(detail)?),
            SurfaceEventKind::Expired => Self::Expired(serde_json::from_value(detail)?),
            SurfaceEventKind::ButtonActivated => Self::ButtonActivated,
            SurfaceEventKind::ButtonDeactivated => Self::ButtonDeactivated,
            SurfaceEventKind::ModalClosed => Self::ModalClosed,
        };
        Ok(event)
    }
}

/// Listener registered on a surface event.
pub type SurfaceListener = Rc<dyn Fn(SurfaceEvent)>;

/// Handle to a constructed payment surface.
///
/// Methods take `&self`: surfaces are handles to externally owned UI state
/// and may raise events synchronously from any call.
pub trait PaymentSurface {
    /// Replace the surface's props.
    fn set_props(&self, props: &SurfaceProps) -> Result<()>;

    /// Subscribe to a named event.
    fn on(&self, kind: SurfaceEventKind, listener: SurfaceListener);

    /// Tear down the surface and its DOM.
    fn destroy(&self);

    /// Show the overlay (modal surfaces).
    fn open(&self) {}

    /// Hide the overlay (modal surfaces).
    fn close(&self) {}

    /// Show or hide the payment view (button surfaces).
    fn toggle_payment(&self) {}
}

/// Loads the surface implementation and constructs it at a DOM node.
///
/// Loading is the only suspend point of a mount.
#[async_trait(?Send)]
pub trait SurfaceLoader<N> {
    type Surface: PaymentSurface + 'static;

    async fn load(
        &self,
        variant: PaymentVariant,
        target: &N,
        props: &SurfaceProps,
    ) -> Result<Self::Surface>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_names_round_trip() {
        for kind in SurfaceEventKind::relayed_by(PaymentVariant::Button)
            .into_iter()
            .chain([SurfaceEventKind::ModalClosed])
        {
            assert_eq!(kind.name().parse::<SurfaceEventKind>().unwrap(), kind);
        }
        assert!("clicked".parse::<SurfaceEventKind>().is_err());
    }

    #[test]
    fn test_relayed_events_per_variant() {
        assert_eq!(SurfaceEventKind::relayed_by(PaymentVariant::Inline).len(), 6);
        assert!(SurfaceEventKind::relayed_by(PaymentVariant::Modal)
            .contains(&SurfaceEventKind::ModalClosed));
        let button = SurfaceEventKind::relayed_by(PaymentVariant::Button);
        assert!(button.contains(&SurfaceEventKind::ButtonActivated));
        assert!(!button.contains(&SurfaceEventKind::ModalClosed));
    }

    #[test]
    fn test_decode_qr_detail() {
        let event = SurfaceEvent::from_detail(
            SurfaceEventKind::QrGenerated,
            json!({ "qrData": "bitcoin:bc1q...", "paymentRequest": "lnbc1..." }),
        )
        .unwrap();
        assert_eq!(
            event,
            SurfaceEvent::QrGenerated {
                qr_data: "bitcoin:bc1q...".into(),
                payment_request: "lnbc1...".into(),
            }
        );
    }

    #[test]
    fn test_decode_status_detail() {
        let event = SurfaceEvent::from_detail(
            SurfaceEventKind::StatusChange,
            json!({
                "status": "processing",
                "payment": {
                    "id": "pay_1",
                    "status": "processing",
                    "createdAt": "2025-01-01T00:00:00Z",
                    "updatedAt": "2025-01-01T00:00:00Z"
                }
            }),
        )
        .unwrap();
        assert_eq!(event.kind(), SurfaceEventKind::StatusChange);
        match event {
            SurfaceEvent::StatusChange { status, payment } => {
                assert_eq!(status, PaymentStatus::Processing);
                assert_eq!(payment.id, "pay_1");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_malformed_detail() {
        let err = SurfaceEvent::from_detail(SurfaceEventKind::Error, json!({ "code": 1 }));
        assert!(err.is_err());

        let event = SurfaceEvent::from_detail(SurfaceEventKind::ModalClosed, json!(null)).unwrap();
        assert_eq!(event, SurfaceEvent::ModalClosed);
    }
}
