//! Configuration types for the intake workflow
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};

use crate::model::DEFAULT_COUNTRY;

/// Base URL of the customer API when none is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Main intake configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Record store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// CRM integration configuration
    #[serde(default)]
    pub integration: IntegrationConfig,

    /// Country assumed when a draft does not name one
    #[serde(default = "default_country")]
    pub default_country: String,

    /// Capacity of the notification/event channel
    ///
    /// When full, new events are dropped (with a warning log) rather than
    /// blocking a submission or push.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl IntakeConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            store: StoreConfig::default(),
            integration: IntegrationConfig::default(),
            default_country: default_country(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.default_country.trim().is_empty() {
            return Err(crate::Error::config("Default country cannot be empty"));
        }

        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("Event channel capacity must be > 0"));
        }

        self.store.validate()?;
        self.integration.validate()?;

        Ok(())
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Record store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// Remote customer API
    Http {
        /// Base URL, e.g. "http://localhost:8000"
        base_url: String,
        /// Per-request timeout in seconds
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },

    /// In-process store (not persistent)
    Memory,

    /// Custom store
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl StoreConfig {
    /// Validate the store configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            StoreConfig::Http {
                base_url,
                timeout_secs,
            } => validate_http("Record store", base_url, *timeout_secs),
            StoreConfig::Custom { factory, config } => {
                validate_custom("Custom record store", factory, config)
            }
            StoreConfig::Memory => Ok(()),
        }
    }

    /// Get the store type name
    pub fn type_name(&self) -> &str {
        match self {
            StoreConfig::Http { .. } => "http",
            StoreConfig::Memory => "memory",
            StoreConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Http {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// CRM integration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IntegrationConfig {
    /// CRM bridge exposed over HTTP
    Http {
        /// Base URL of the bridge
        base_url: String,
        /// Per-request timeout in seconds
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },

    /// No integration: every push fails with an integration error
    Disabled,

    /// Custom integration
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl IntegrationConfig {
    /// Validate the integration configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            IntegrationConfig::Http {
                base_url,
                timeout_secs,
            } => validate_http("CRM integration", base_url, *timeout_secs),
            IntegrationConfig::Custom { factory, config } => {
                validate_custom("Custom CRM integration", factory, config)
            }
            IntegrationConfig::Disabled => Ok(()),
        }
    }

    /// Get the integration type name
    pub fn type_name(&self) -> &str {
        match self {
            IntegrationConfig::Http { .. } => "http",
            IntegrationConfig::Disabled => "disabled",
            IntegrationConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        IntegrationConfig::Http {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn validate_http(what: &str, base_url: &str, timeout_secs: u64) -> Result<(), crate::Error> {
    if base_url.is_empty() {
        return Err(crate::Error::config(format!("{} base URL cannot be empty", what)));
    }
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(crate::Error::config(format!(
            "{} base URL must use HTTP or HTTPS scheme. Got: {}",
            what, base_url
        )));
    }
    if timeout_secs == 0 {
        return Err(crate::Error::config(format!("{} timeout must be > 0", what)));
    }
    Ok(())
}

fn validate_custom(
    what: &str,
    factory: &str,
    config: &serde_json::Value,
) -> Result<(), crate::Error> {
    if factory.is_empty() {
        return Err(crate::Error::config(format!("{} factory cannot be empty", what)));
    }
    if config.is_null() {
        return Err(crate::Error::config(format!("{} config cannot be null", what)));
    }
    Ok(())
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

fn default_event_channel_capacity() -> usize {
    100
}

fn default_timeout_secs() -> u64 {
    30
}
