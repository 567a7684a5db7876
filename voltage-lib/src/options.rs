//! Widget configuration: caller options, partial updates, and the normalized
//! property bag pushed to the payment surface.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::errors::VoltageError;
use crate::types::{
    AppearanceConfig, Currency, PaymentData, PaymentError, PaymentKind, PaymentStatus,
    PaymentTheme, PaymentVariant, PollingConfig,
};
use crate::Result;

/// Callback receiving a payment snapshot.
pub type PaymentCallback = Rc<dyn Fn(&PaymentData)>;
/// Callback receiving `(qr_data, payment_request)`.
pub type QrCallback = Rc<dyn Fn(&str, &str)>;
/// Callback receiving `(status, payment)`.
pub type StatusCallback = Rc<dyn Fn(PaymentStatus, &PaymentData)>;
/// Callback receiving a payment-domain error.
pub type ErrorCallback = Rc<dyn Fn(&PaymentError)>;
/// Callback without payload.
pub type NotifyCallback = Rc<dyn Fn()>;

/// Named lifecycle callbacks.
///
/// Callbacks are read at dispatch time, so replacing one through
/// `update_options` takes effect for the next event.
#[derive(Clone, Default)]
pub struct PaymentCallbacks {
    pub on_ready: Option<PaymentCallback>,
    pub on_qr_generated: Option<QrCallback>,
    pub on_status_change: Option<StatusCallback>,
    pub on_success: Option<PaymentCallback>,
    pub on_error: Option<ErrorCallback>,
    pub on_expired: Option<PaymentCallback>,
    /// Modal variant only.
    pub on_modal_open: Option<NotifyCallback>,
    /// Modal variant only.
    pub on_modal_close: Option<NotifyCallback>,
    /// Button variant only.
    pub on_button_activated: Option<NotifyCallback>,
    /// Button variant only.
    pub on_button_deactivated: Option<NotifyCallback>,
}

impl PaymentCallbacks {
    pub fn on_ready(mut self, f: impl Fn(&PaymentData) + 'static) -> Self {
        self.on_ready = Some(Rc::new(f));
        self
    }

    pub fn on_qr_generated(mut self, f: impl Fn(&str, &str) + 'static) -> Self {
        self.on_qr_generated = Some(Rc::new(f));
        self
    }

    pub fn on_status_change(mut self, f: impl Fn(PaymentStatus, &PaymentData) + 'static) -> Self {
        self.on_status_change = Some(Rc::new(f));
        self
    }

    pub fn on_success(mut self, f: impl Fn(&PaymentData) + 'static) -> Self {
        self.on_success = Some(Rc::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&PaymentError) + 'static) -> Self {
        self.on_error = Some(Rc::new(f));
        self
    }

    pub fn on_expired(mut self, f: impl Fn(&PaymentData) + 'static) -> Self {
        self.on_expired = Some(Rc::new(f));
        self
    }

    pub fn on_modal_open(mut self, f: impl Fn() + 'static) -> Self {
        self.on_modal_open = Some(Rc::new(f));
        self
    }

    pub fn on_modal_close(mut self, f: impl Fn() + 'static) -> Self {
        self.on_modal_close = Some(Rc::new(f));
        self
    }

    pub fn on_button_activated(mut self, f: impl Fn() + 'static) -> Self {
        self.on_button_activated = Some(Rc::new(f));
        self
    }

    pub fn on_button_deactivated(mut self, f: impl Fn() + 'static) -> Self {
        self.on_button_deactivated = Some(Rc::new(f));
        self
    }

    /// Replace every callback that `other` sets; keep the rest.
    pub fn merge(&mut self, other: PaymentCallbacks) {
        fn take<T>(slot: &mut Option<T>, new: Option<T>) {
            if new.is_some() {
                *slot = new;
            }
        }
        take(&mut self.on_ready, other.on_ready);
        take(&mut self.on_qr_generated, other.on_qr_generated);
        take(&mut self.on_status_change, other.on_status_change);
        take(&mut self.on_success, other.on_success);
        take(&mut self.on_error, other.on_error);
        take(&mut self.on_expired, other.on_expired);
        take(&mut self.on_modal_open, other.on_modal_open);
        take(&mut self.on_modal_close, other.on_modal_close);
        take(&mut self.on_button_activated, other.on_button_activated);
        take(&mut self.on_button_deactivated, other.on_button_deactivated);
    }

    fn registered(&self) -> Vec<&'static str> {
        let slots = [
            ("onReady", self.on_ready.is_some()),
            ("onQRGenerated", self.on_qr_generated.is_some()),
            ("onStatusChange", self.on_status_change.is_some()),
            ("onSuccess", self.on_success.is_some()),
            ("onError", self.on_error.is_some()),
            ("onExpired", self.on_expired.is_some()),
            ("onModalOpen", self.on_modal_open.is_some()),
            ("onModalClose", self.on_modal_close.is_some()),
            ("onButtonActivated", self.on_button_activated.is_some()),
            ("onButtonDeactivated", self.on_button_deactivated.is_some()),
        ];
        slots
            .into_iter()
            .filter_map(|(name, set)| set.then_some(name))
            .collect()
    }
}

impl fmt::Debug for PaymentCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PaymentCallbacks")
            .field(&self.registered())
            .finish()
    }
}

/// Configuration for one payment widget.
///
/// `api_key` and `wallet_id` are required before mount; every other field
/// falls back to a default when the surface props are derived.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOptions {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub wallet_id: String,

    /// Amount in millisatoshis; `0` or `None` requests any amount.
    #[serde(default)]
    pub amount: Option<u64>,
    #[serde(default)]
    pub payment_kind: Option<PaymentKind>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub currency: Option<Currency>,

    #[serde(default)]
    pub variant: Option<PaymentVariant>,
    #[serde(default)]
    pub theme: Option<PaymentTheme>,
    #[serde(default)]
    pub appearance: Option<AppearanceConfig>,

    #[serde(default)]
    pub auto_close: Option<bool>,
    #[serde(default, rename = "showQRCode")]
    pub show_qr_code: Option<bool>,
    #[serde(default)]
    pub show_copy_button: Option<bool>,

    #[serde(default)]
    pub polling_config: Option<PollingConfig>,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub environment_id: Option<String>,
    /// Payments API base URL override.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Per-request timeout for Payments API calls. Independent of
    /// `polling_config.timeout_ms`.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,

    #[serde(skip)]
    pub callbacks: PaymentCallbacks,
}

impl PaymentOptions {
    /// Create options with the two required fields.
    pub fn new(api_key: impl Into<String>, wallet_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            wallet_id: wallet_id.into(),
            ..Self::default()
        }
    }

    pub fn with_amount(mut self, msats: u64) -> Self {
        self.amount = Some(msats);
        self
    }

    pub fn with_payment_kind(mut self, kind: PaymentKind) -> Self {
        self.payment_kind = Some(kind);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_variant(mut self, variant: PaymentVariant) -> Self {
        self.variant = Some(variant);
        self
    }

    pub fn with_theme(mut self, theme: PaymentTheme) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn with_appearance(mut self, appearance: AppearanceConfig) -> Self {
        self.appearance = Some(appearance);
        self
    }

    pub fn with_auto_close(mut self, auto_close: bool) -> Self {
        self.auto_close = Some(auto_close);
        self
    }

    pub fn with_polling_config(mut self, polling: PollingConfig) -> Self {
        self.polling_config = Some(polling);
        self
    }

    pub fn with_callbacks(mut self, callbacks: PaymentCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Variant to construct, defaulting to inline.
    pub fn resolved_variant(&self) -> PaymentVariant {
        self.variant.unwrap_or_default()
    }

    /// Check the required fields.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(VoltageError::MissingField("apiKey"));
        }
        if self.wallet_id.trim().is_empty() {
            return Err(VoltageError::MissingField("walletId"));
        }
        Ok(())
    }

    /// Shallow-merge a partial update: fields present in `patch` win.
    pub fn merge(&mut self, patch: PaymentOptionsPatch) {
        fn take<T>(slot: &mut T, new: Option<T>) {
            if let Some(value) = new {
                *slot = value;
            }
        }
        fn take_opt<T>(slot: &mut Option<T>, new: Option<T>) {
            if new.is_some() {
                *slot = new;
            }
        }

        take(&mut self.api_key, patch.api_key);
        take(&mut self.wallet_id, patch.wallet_id);
        take_opt(&mut self.amount, patch.amount);
        take_opt(&mut self.payment_kind, patch.payment_kind);
        take_opt(&mut self.description, patch.description);
        take_opt(&mut self.currency, patch.currency);
        take_opt(&mut self.variant, patch.variant);
        take_opt(&mut self.theme, patch.theme);
        take_opt(&mut self.appearance, patch.appearance);
        take_opt(&mut self.auto_close, patch.auto_close);
        take_opt(&mut self.show_qr_code, patch.show_qr_code);
        take_opt(&mut self.show_copy_button, patch.show_copy_button);
        take_opt(&mut self.polling_config, patch.polling_config);
        take_opt(&mut self.organization_id, patch.organization_id);
        take_opt(&mut self.environment_id, patch.environment_id);
        take_opt(&mut self.base_url, patch.base_url);
        take_opt(&mut self.request_timeout_ms, patch.request_timeout_ms);
        self.callbacks.merge(patch.callbacks);
    }
}

/// Partial update for [`PaymentOptions`]. Absent fields keep their value.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOptionsPatch {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub wallet_id: Option<String>,
    #[serde(default)]
    pub amount: Option<u64>,
    #[serde(default)]
    pub payment_kind: Option<PaymentKind>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub variant: Option<PaymentVariant>,
    #[serde(default)]
    pub theme: Option<PaymentTheme>,
    #[serde(default)]
    pub appearance: Option<AppearanceConfig>,
    #[serde(default)]
    pub auto_close: Option<bool>,
    #[serde(default, rename = "showQRCode")]
    pub show_qr_code: Option<bool>,
    #[serde(default)]
    pub show_copy_button: Option<bool>,
    #[serde(default)]
    pub polling_config: Option<PollingConfig>,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub environment_id: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
    #[serde(skip)]
    pub callbacks: PaymentCallbacks,
}

impl PaymentOptionsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn amount(mut self, msats: u64) -> Self {
        self.amount = Some(msats);
        self
    }

    pub fn theme(mut self, theme: PaymentTheme) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn auto_close(mut self, auto_close: bool) -> Self {
        self.auto_close = Some(auto_close);
        self
    }

    pub fn show_qr_code(mut self, show: bool) -> Self {
        self.show_qr_code = Some(show);
        self
    }

    pub fn callbacks(mut self, callbacks: PaymentCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }
}

/// Fully defaulted property bag handed to the payment surface.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceProps {
    pub api_key: String,
    pub wallet_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    pub payment_kind: PaymentKind,
    pub description: String,
    pub currency: Currency,
    pub variant: PaymentVariant,
    pub theme: PaymentTheme,
    pub appearance: AppearanceConfig,
    #[serde(rename = "showQRCode")]
    pub show_qr_code: bool,
    pub show_copy_button: bool,
    pub polling_config: PollingConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,
    /// Modal variant only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_close: Option<bool>,
}

impl SurfaceProps {
    /// Derive the surface props for `variant` from the caller's options.
    pub fn derive(options: &PaymentOptions, variant: PaymentVariant) -> Self {
        Self {
            api_key: options.api_key.clone(),
            wallet_id: options.wallet_id.clone(),
            amount: options.amount.filter(|msats| *msats > 0),
            payment_kind: options.payment_kind.unwrap_or_default(),
            description: options.description.clone().unwrap_or_default(),
            currency: options.currency.unwrap_or_default(),
            variant,
            theme: options.theme.unwrap_or_default(),
            appearance: options.appearance.clone().unwrap_or_default(),
            show_qr_code: options.show_qr_code.unwrap_or(true),
            show_copy_button: options.show_copy_button.unwrap_or(true),
            polling_config: options.polling_config.clone().unwrap_or_default(),
            organization_id: options.organization_id.clone(),
            environment_id: options.environment_id.clone(),
            base_url: options.base_url.clone(),
            request_timeout_ms: options.request_timeout_ms,
            auto_close: (variant == PaymentVariant::Modal)
                .then(|| options.auto_close.unwrap_or(true)),
        }
    }

    /// Props as a JSON value, for surfaces that take untyped objects.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
