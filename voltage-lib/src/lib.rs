//! Voltage payment widgets.
//!
//! Imperative adapters around a declarative payment UI surface: build a widget
//! from [`PaymentOptions`], mount it into the document, receive lifecycle
//! callbacks, update or destroy it.
//!
//! The crate is platform neutral. The document is reached through the
//! [`Dom`] trait and the visual component through [`PaymentSurface`] /
//! [`SurfaceLoader`]; the `voltage-web` crate implements both for browsers.
//!
//! # Example
//!
//! ```ignore
//! use voltage_lib::prelude::*;
//!
//! let options = PaymentOptions::new("api-key", "wallet-id")
//!     .with_amount(150_000)
//!     .with_variant(PaymentVariant::Modal)
//!     .with_callbacks(PaymentCallbacks::default().on_success(|payment| {
//!         println!("paid: {}", payment.id);
//!     }));
//!
//! let widget = VoltagePayments::create(options, &host);
//! widget.mount("#checkout".into()).await?;
//! ```

pub mod adapters;
pub mod component;
pub mod config;
pub mod dom;
pub mod errors;
pub mod factory;
pub mod options;
pub mod prelude;
pub mod state;
pub mod styles;
pub mod surface;
pub mod types;

/// In-memory document and surface doubles.
///
/// This module is only available with the `test-utils` feature or in test builds.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapters::{ButtonAdapter, InlineAdapter, ModalAdapter, Phase};
pub use component::PaymentComponent;
pub use config::ApiEnvironment;
pub use dom::{Dom, MountTarget};
pub use errors::{VoltageError, VoltageErrorCode};
pub use factory::{Host, PaymentWidget, VoltagePayments};
pub use options::{PaymentCallbacks, PaymentOptions, PaymentOptionsPatch, SurfaceProps};
pub use state::LiveState;
pub use surface::{PaymentSurface, SurfaceEvent, SurfaceEventKind, SurfaceListener, SurfaceLoader};
pub use types::{
    AppearanceConfig, Currency, PaymentData, PaymentError, PaymentKind, PaymentStatus,
    PaymentTheme, PaymentVariant, PollingConfig,
};

/// Common result alias for widget operations.
pub type Result<T> = std::result::Result<T, VoltageError>;
