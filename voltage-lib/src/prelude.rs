//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use voltage_lib::prelude::*;
//! ```

// Factory and widgets
pub use crate::factory::{Host, PaymentWidget, VoltagePayments};
pub use crate::component::PaymentComponent;
pub use crate::adapters::{ButtonAdapter, InlineAdapter, ModalAdapter};

// Configuration
pub use crate::config::ApiEnvironment;
pub use crate::options::{PaymentCallbacks, PaymentOptions, PaymentOptionsPatch};
pub use crate::types::{
    AppearanceConfig, PaymentData, PaymentError, PaymentKind, PaymentStatus, PaymentTheme,
    PaymentVariant, PollingConfig,
};

// Error handling
pub use crate::errors::{VoltageError, VoltageErrorCode};
pub use crate::Result;

// Platform boundary
pub use crate::dom::{Dom, MountTarget};
pub use crate::surface::{PaymentSurface, SurfaceEvent, SurfaceEventKind, SurfaceLoader};
