//! Error types for widget construction and mounting.
//!
//! Every error here is a synchronous validation or mount failure returned to
//! the caller. Payment-domain failures (API errors, expired invoices) never
//! surface as `VoltageError`; they reach the caller as data through the
//! `on_error` and `on_expired` callbacks.

use thiserror::Error;

/// Error codes for JavaScript consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum VoltageErrorCode {
    /// Unknown `variant` value
    UnsupportedVariant = 1000,
    /// Selector matched nothing
    TargetNotFound = 2000,
    /// Resolved target cannot host a widget
    InvalidTarget = 2001,
    /// Instance is already mounted or mounting
    AlreadyMounted = 3000,
    /// Instance was released and cannot be reused
    Released = 3001,
    /// Required option missing
    MissingField = 4000,
    /// Invalid environment configuration
    InvalidConfig = 4001,
    /// Surface implementation failed to load or construct
    SurfaceLoad = 5000,
    /// DOM operation failed
    Dom = 6000,
    /// Serialization error
    Serialization = 7000,
}

/// Error type for widget operations.
#[derive(Debug, Error)]
pub enum VoltageError {
    /// The `variant` discriminator is not one of inline, modal or button.
    #[error("unknown payment variant: {0}")]
    UnsupportedVariant(String),

    /// A selector did not match any element.
    #[error("cannot find element: {0}")]
    TargetNotFound(String),

    /// The resolved target is not an element that can host a widget.
    #[error("target must be an HTMLElement: {0}")]
    InvalidTarget(String),

    /// `mount` was called on an instance that is mounting or mounted.
    #[error("payment component is already mounted")]
    AlreadyMounted,

    /// `mount` was called after the instance was released.
    #[error("payment component was destroyed and cannot be mounted again")]
    Released,

    /// A required option is missing or empty.
    #[error("missing required option: {0}")]
    MissingField(&'static str),

    /// Environment configuration could not be parsed.
    #[error("invalid {field}: {reason}")]
    InvalidConfig {
        /// Setting name
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// The surface implementation could not be loaded or constructed.
    #[error("failed to load payment surface: {0}")]
    SurfaceLoad(String),

    /// A DOM call failed.
    #[error("DOM error: {0}")]
    Dom(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl VoltageError {
    /// Get the numeric error code.
    pub fn code(&self) -> VoltageErrorCode {
        match self {
            Self::UnsupportedVariant(_) => VoltageErrorCode::UnsupportedVariant,
            Self::TargetNotFound(_) => VoltageErrorCode::TargetNotFound,
            Self::InvalidTarget(_) => VoltageErrorCode::InvalidTarget,
            Self::AlreadyMounted => VoltageErrorCode::AlreadyMounted,
            Self::Released => VoltageErrorCode::Released,
            Self::MissingField(_) => VoltageErrorCode::MissingField,
            Self::InvalidConfig { .. } => VoltageErrorCode::InvalidConfig,
            Self::SurfaceLoad(_) => VoltageErrorCode::SurfaceLoad,
            Self::Dom(_) => VoltageErrorCode::Dom,
            Self::Serialization(_) => VoltageErrorCode::Serialization,
        }
    }

    /// Name of the error kind as exposed to JavaScript (`error.name`).
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::UnsupportedVariant(_) => "UnsupportedVariantError",
            Self::TargetNotFound(_) => "TargetNotFoundError",
            Self::InvalidTarget(_) => "InvalidTargetError",
            Self::AlreadyMounted => "AlreadyMountedError",
            Self::Released => "ReleasedError",
            Self::MissingField(_) => "MissingFieldError",
            Self::InvalidConfig { .. } => "InvalidConfigError",
            Self::SurfaceLoad(_) => "SurfaceLoadError",
            Self::Dom(_) => "DomError",
            Self::Serialization(_) => "SerializationError",
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for VoltageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
