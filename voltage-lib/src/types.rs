//! Payment domain types shared by the adapters and the surface contract.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::VoltageError;

/// Settlement rail or format requested from the payments API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    /// Lightning invoice.
    Bolt11,
    /// On-chain address.
    Onchain,
    /// BIP-21 URI combining on-chain and lightning.
    #[default]
    Bip21,
}

impl PaymentKind {
    /// Wire name of the payment kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bolt11 => "bolt11",
            Self::Onchain => "onchain",
            Self::Bip21 => "bip21",
        }
    }
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation mode of a payment widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum PaymentVariant {
    /// Rendered directly inside the target element.
    #[default]
    Inline,
    /// Overlay opened from a synthesized trigger button.
    Modal,
    /// Button that expands into the payment view.
    Button,
}

impl PaymentVariant {
    /// All supported variants.
    pub const ALL: [PaymentVariant; 3] = [Self::Inline, Self::Modal, Self::Button];

    /// Wire name of the variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Modal => "modal",
            Self::Button => "button",
        }
    }
}

impl FromStr for PaymentVariant {
    type Err = VoltageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inline" => Ok(Self::Inline),
            "modal" => Ok(Self::Modal),
            "button" => Ok(Self::Button),
            other => Err(VoltageError::UnsupportedVariant(other.to_string())),
        }
    }
}

impl TryFrom<String> for PaymentVariant {
    type Error = VoltageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for PaymentVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color scheme of the widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentTheme {
    /// Light scheme.
    Light,
    /// Dark scheme.
    Dark,
    /// Follow `prefers-color-scheme`.
    #[default]
    Auto,
}

/// Currency of the payment amount. Only bitcoin is supported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    /// Bitcoin, amounts in millisatoshis.
    #[default]
    Btc,
}

/// Lifecycle status of a payment.
///
/// The lifecycle is linear: `generating → ready → processing`, ending in one
/// of the terminal states `completed`, `failed` or `expired`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Payment request is being created.
    #[default]
    Generating,
    /// Payment request is displayed and awaiting payment.
    Ready,
    /// Payment detected, awaiting settlement.
    Processing,
    /// Payment settled.
    Completed,
    /// Payment failed.
    Failed,
    /// Payment request expired before settlement.
    Expired,
}

impl PaymentStatus {
    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generating => "generating",
            Self::Ready => "ready",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Expired => "expired",
        }
    }

    /// Position in the lifecycle. Terminal states share the last stage.
    pub fn stage(&self) -> u8 {
        match self {
            Self::Generating => 0,
            Self::Ready => 1,
            Self::Processing => 2,
            Self::Completed | Self::Failed | Self::Expired => 3,
        }
    }

    /// Returns true for completed, failed and expired.
    pub fn is_terminal(&self) -> bool {
        self.stage() == 3
    }
}

impl FromStr for PaymentStatus {
    type Err = VoltageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generating" => Ok(Self::Generating),
            "ready" => Ok(Self::Ready),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "expired" => Ok(Self::Expired),
            other => Err(VoltageError::Serialization(format!(
                "unknown payment status: {other}"
            ))),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual overrides. Unset fields fall back to the surface's defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_text_color: Option<String>,
}

impl AppearanceConfig {
    /// Set the primary (accent) color.
    pub fn with_primary_color(mut self, color: impl Into<String>) -> Self {
        self.primary_color = Some(color.into());
        self
    }

    /// Set the border radius.
    pub fn with_border_radius(mut self, radius: impl Into<String>) -> Self {
        self.border_radius = Some(radius.into());
        self
    }

    /// Set the font family.
    pub fn with_font_family(mut self, font: impl Into<String>) -> Self {
        self.font_family = Some(font.into());
        self
    }
}

/// Status polling parameters consumed by the surface.
///
/// Empty fields leave the surface's own defaults in place.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

/// Snapshot of a payment as reported by the payments API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentData {
    pub id: String,
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_request: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Amount in millisatoshis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentData {
    /// Create a payment snapshot stamped with the current time.
    pub fn new(id: impl Into<String>, status: PaymentStatus) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            status,
            payment_request: None,
            address: None,
            amount: None,
            description: None,
            expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach the payment request string.
    pub fn with_payment_request(mut self, request: impl Into<String>) -> Self {
        self.payment_request = Some(request.into());
        self
    }

    /// Attach the amount in millisatoshis.
    pub fn with_amount(mut self, msats: u64) -> Self {
        self.amount = Some(msats);
        self
    }

    /// Returns true once `expires_at` lies in the past.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Payment-domain error delivered to `on_error`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl PaymentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            details: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl fmt::Display for PaymentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({})", self.message, code),
            None => f.write_str(&self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_parsing() {
        assert_eq!("modal".parse::<PaymentVariant>().unwrap(), PaymentVariant::Modal);
        let err = "carousel".parse::<PaymentVariant>().unwrap_err();
        assert!(matches!(err, VoltageError::UnsupportedVariant(v) if v == "carousel"));
    }

    #[test]
    fn test_variant_deserialize_rejects_unknown() {
        let ok: PaymentVariant = serde_json::from_str("\"button\"").unwrap();
        assert_eq!(ok, PaymentVariant::Button);
        assert!(serde_json::from_str::<PaymentVariant>("\"popover\"").is_err());
        assert_eq!(serde_json::to_string(&PaymentVariant::Inline).unwrap(), "\"inline\"");
    }

    #[test]
    fn test_status_lifecycle_order() {
        assert!(PaymentStatus::Generating.stage() < PaymentStatus::Ready.stage());
        assert!(PaymentStatus::Ready.stage() < PaymentStatus::Processing.stage());
        assert!(!PaymentStatus::Processing.is_terminal());
        for status in [
            PaymentStatus::Completed,
            PaymentStatus::Failed,
            PaymentStatus::Expired,
        ] {
            assert!(status.is_terminal());
            assert_eq!(status.as_str().parse::<PaymentStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_payment_data_wire_format() {
        let json = r#"{
            "id": "pay_1",
            "status": "ready",
            "paymentRequest": "lnbc1...",
            "amount": 150000,
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:05Z",
            "expiresAt": "2025-01-01T00:10:00Z"
        }"#;
        let data: PaymentData = serde_json::from_str(json).unwrap();
        assert_eq!(data.status, PaymentStatus::Ready);
        assert_eq!(data.payment_request.as_deref(), Some("lnbc1..."));
        assert!(data.address.is_none());

        let before = "2025-01-01T00:05:00Z".parse().unwrap();
        let after = "2025-01-01T00:10:00Z".parse().unwrap();
        assert!(!data.is_expired_at(before));
        assert!(data.is_expired_at(after));
    }

    #[test]
    fn test_payment_error_display() {
        let err = PaymentError::new("wallet unreachable").with_code("503");
        assert_eq!(err.to_string(), "wallet unreachable (503)");
    }
}
