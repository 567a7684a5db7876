//! Payments API environment configuration.
//!
//! The adapters never talk to the payments API themselves; these settings are
//! forwarded to the surface, which owns requests and polling.

use serde::{Deserialize, Serialize};

use crate::errors::VoltageError;
use crate::options::PaymentOptions;
use crate::Result;

/// Default payments API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://voltageapi.com/v1";

/// Environment variable names read by [`ApiEnvironment::from_env`].
pub mod env_vars {
    pub const BASE_URL: &str = "VOLTAGE_BASE_URL";
    pub const API_KEY: &str = "VOLTAGE_API_KEY";
    pub const ORGANIZATION_ID: &str = "VOLTAGE_ORGANIZATION_ID";
    pub const ENVIRONMENT_ID: &str = "VOLTAGE_ENVIRONMENT_ID";
    pub const WALLET_ID: &str = "VOLTAGE_WALLET_ID";
    pub const TIMEOUT: &str = "VOLTAGE_TIMEOUT";
}

/// Connection settings for the payments API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvironment {
    /// API endpoint URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub organization_id: Option<String>,

    #[serde(default)]
    pub environment_id: Option<String>,

    #[serde(default)]
    pub wallet_id: Option<String>,

    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for ApiEnvironment {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            organization_id: None,
            environment_id: None,
            wallet_id: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ApiEnvironment {
    /// Create a configuration pointing at the default endpoint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API endpoint.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the API credential.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the organization and environment identifiers.
    pub fn with_ids(
        mut self,
        organization_id: impl Into<String>,
        environment_id: impl Into<String>,
    ) -> Self {
        self.organization_id = Some(organization_id.into());
        self.environment_id = Some(environment_id.into());
        self
    }

    /// Set the default wallet.
    pub fn with_wallet_id(mut self, wallet_id: impl Into<String>) -> Self {
        self.wallet_id = Some(wallet_id.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Load overrides from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load overrides through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mut env = Self::default();
        if let Some(url) = get(env_vars::BASE_URL) {
            env.base_url = url;
        }
        env.api_key = get(env_vars::API_KEY);
        env.organization_id = get(env_vars::ORGANIZATION_ID);
        env.environment_id = get(env_vars::ENVIRONMENT_ID);
        env.wallet_id = get(env_vars::WALLET_ID);
        if let Some(raw) = get(env_vars::TIMEOUT) {
            env.timeout_ms = raw.trim().parse().map_err(|_| {
                VoltageError::invalid_config(env_vars::TIMEOUT, format!("not a number: {raw}"))
            })?;
        }
        Ok(env)
    }

    /// Fill the fields `options` leaves unset. Caller values always win.
    pub fn apply_to(&self, options: &mut PaymentOptions) {
        if options.api_key.is_empty() {
            if let Some(key) = &self.api_key {
                options.api_key = key.clone();
            }
        }
        if options.wallet_id.is_empty() {
            if let Some(wallet) = &self.wallet_id {
                options.wallet_id = wallet.clone();
            }
        }
        if options.organization_id.is_none() {
            options.organization_id = self.organization_id.clone();
        }
        if options.environment_id.is_none() {
            options.environment_id = self.environment_id.clone();
        }
        if options.base_url.is_none() && self.base_url != DEFAULT_BASE_URL {
            options.base_url = Some(self.base_url.clone());
        }
        if options.request_timeout_ms.is_none() && self.timeout_ms != default_timeout_ms() {
            options.request_timeout_ms = Some(self.timeout_ms);
        }
    }
}

impl PaymentOptions {
    /// Fill unset fields from an [`ApiEnvironment`].
    pub fn with_environment(mut self, env: &ApiEnvironment) -> Self {
        env.apply_to(&mut self);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SurfaceProps;
    use crate::types::{PaymentVariant, PollingConfig};
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let env = ApiEnvironment::from_lookup(lookup(&[])).unwrap();
        assert_eq!(env.base_url, DEFAULT_BASE_URL);
        assert_eq!(env.timeout_ms, 30_000);
        assert!(env.api_key.is_none());
    }

    #[test]
    fn test_reads_variables() {
        let env = ApiEnvironment::from_lookup(lookup(&[
            ("VOLTAGE_BASE_URL", "https://staging.example/v1"),
            ("VOLTAGE_API_KEY", "vk_test"),
            ("VOLTAGE_WALLET_ID", "wallet-1"),
            ("VOLTAGE_ORGANIZATION_ID", ""),
            ("VOLTAGE_TIMEOUT", "5000"),
        ]))
        .unwrap();
        assert_eq!(env.base_url, "https://staging.example/v1");
        assert_eq!(env.api_key.as_deref(), Some("vk_test"));
        assert_eq!(env.wallet_id.as_deref(), Some("wallet-1"));
        assert!(env.organization_id.is_none());
        assert_eq!(env.timeout_ms, 5000);
    }

    #[test]
    fn test_invalid_timeout() {
        let err = ApiEnvironment::from_lookup(lookup(&[("VOLTAGE_TIMEOUT", "soon")])).unwrap_err();
        assert!(matches!(err, VoltageError::InvalidConfig { ref field, .. } if field == "VOLTAGE_TIMEOUT"));
    }

    #[test]
    fn test_apply_fills_only_unset_fields() {
        let env = ApiEnvironment::new()
            .with_api_key("env-key")
            .with_wallet_id("env-wallet")
            .with_ids("org", "env")
            .with_base_url("https://staging.example/v1")
            .with_timeout_ms(10_000);

        let options = PaymentOptions::new("caller-key", "").with_environment(&env);
        assert_eq!(options.api_key, "caller-key");
        assert_eq!(options.wallet_id, "env-wallet");
        assert_eq!(options.organization_id.as_deref(), Some("org"));
        assert_eq!(options.base_url.as_deref(), Some("https://staging.example/v1"));
        assert_eq!(options.request_timeout_ms, Some(10_000));
        assert!(options.polling_config.is_none());
    }

    #[test]
    fn test_request_timeout_leaves_polling_alone() {
        let polling = PollingConfig {
            timeout_ms: Some(600_000),
            ..PollingConfig::default()
        };
        let options = PaymentOptions::new("k", "w")
            .with_polling_config(polling)
            .with_environment(&ApiEnvironment::new().with_timeout_ms(10_000));

        let props = SurfaceProps::derive(&options, PaymentVariant::Inline);
        assert_eq!(props.polling_config.timeout_ms, Some(600_000));
        assert_eq!(props.request_timeout_ms, Some(10_000));
        assert_eq!(props.to_json().unwrap()["requestTimeoutMs"], 10_000);
    }

    #[test]
    fn test_default_environment_leaves_base_url_unset() {
        let options = PaymentOptions::new("k", "w").with_environment(&ApiEnvironment::new());
        assert!(options.base_url.is_none());
        assert!(options.polling_config.is_none());
        assert!(options.request_timeout_ms.is_none());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let env: ApiEnvironment = serde_json::from_str(r#"{"apiKey":"k"}"#).unwrap();
        assert_eq!(env.base_url, DEFAULT_BASE_URL);
        assert_eq!(env.timeout_ms, 30_000);
    }
}
