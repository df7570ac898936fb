//! Digital Order API configuration
//!
//! Loaded from a TOML file (missing file means defaults) and then overridden
//! from `DORDER_*` environment variables. Credentials have no defaults and
//! must come from one of the two.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};
use crate::tables::FRONTEND_BASE_URL;

/// Top-level API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API gateway origin
    pub base_url: String,

    /// Value for the `Ocp-Apim-Subscription-Key` header
    pub subscription_key: String,

    /// Per-request timeout
    pub timeout_secs: u64,

    /// Ordering frontend origin used for table URLs
    pub frontend_base_url: String,

    /// Session credentials
    pub credentials: Credentials,

    /// Venue the checks are opened against
    pub venue: VenueConfig,

    /// Dummy tender used to pay checks off on close
    pub tender: TenderConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://digitalmwqa.azure-api.net".to_string(),
            subscription_key: String::new(),
            timeout_secs: 30,
            frontend_base_url: FRONTEND_BASE_URL.to_string(),
            credentials: Credentials::default(),
            venue: VenueConfig::default(),
            tender: TenderConfig::default(),
        }
    }
}

/// Credentials posted to the session endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub client_id: String,
    pub username: String,
    pub passkey: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            client_id: "3289FE1A-A4CA-49DC-9CDF-C2831781E850".to_string(),
            username: "internal".to_string(),
            passkey: String::new(),
        }
    }
}

/// Property and revenue center scope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VenueConfig {
    pub property_id: String,
    pub revenue_center_id: String,
    pub employee_number: u32,
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self {
            property_id: "33".to_string(),
            revenue_center_id: "810".to_string(),
            employee_number: 90004,
        }
    }
}

/// Test tender details sent in the close request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TenderConfig {
    pub card_number: String,
    pub tender_type: String,
    pub auth_code: String,
    pub payment_token: String,
}

impl Default for TenderConfig {
    fn default() -> Self {
        Self {
            card_number: "33333".to_string(),
            tender_type: "2001001".to_string(),
            auth_code: "67890".to_string(),
            payment_token: "testTransaction".to_string(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Load from file, apply environment overrides and validate
    pub fn resolve(path: &Path) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `DORDER_*` overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let strings: [(&str, &mut String); 8] = [
            ("DORDER_BASE_URL", &mut self.base_url),
            ("DORDER_SUBSCRIPTION_KEY", &mut self.subscription_key),
            ("DORDER_FRONTEND_URL", &mut self.frontend_base_url),
            ("DORDER_CLIENT_ID", &mut self.credentials.client_id),
            ("DORDER_USERNAME", &mut self.credentials.username),
            ("DORDER_PASSKEY", &mut self.credentials.passkey),
            ("DORDER_PROPERTY_ID", &mut self.venue.property_id),
            ("DORDER_REVENUE_CENTER_ID", &mut self.venue.revenue_center_id),
        ];
        for (key, slot) in strings {
            if let Some(value) = lookup(key) {
                *slot = value;
            }
        }

        if let Some(value) = lookup("DORDER_EMPLOYEE_NUMBER") {
            self.venue.employee_number = parse_var("DORDER_EMPLOYEE_NUMBER", &value)?;
        }
        if let Some(value) = lookup("DORDER_TIMEOUT_SECS") {
            self.timeout_secs = parse_var("DORDER_TIMEOUT_SECS", &value)?;
        }

        Ok(())
    }

    /// Reject configurations that cannot possibly authenticate
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("base_url", &self.base_url),
            ("subscription_key", &self.subscription_key),
            ("credentials.client_id", &self.credentials.client_id),
            ("credentials.username", &self.credentials.username),
            ("credentials.passkey", &self.credentials.passkey),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(Error::InvalidConfig(format!("{} must not be empty", name)));
            }
        }
        if self.timeout_secs == 0 {
            return Err(Error::InvalidConfig("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("{} is not a valid number: {:?}", key, value)))
}
