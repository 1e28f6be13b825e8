//! Transport configuration for the constraint store
//!
//! # Hierarchy
//!
//! Configuration is assembled in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Explicit values (`Config::new`, builder methods) or a TOML document
//! 3. Environment variables: `FIELDGUARD_*`
//!
//! # Example Config
//!
//! ```toml
//! constraints_url = "https://example.com/api/constraints"
//! needs_authentication = true
//! authorization = "Bearer abc123"
//! timeout_ms = 5000
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const ENV_CONSTRAINTS_URL: &str = "FIELDGUARD_CONSTRAINTS_URL";
pub const ENV_NEEDS_AUTHENTICATION: &str = "FIELDGUARD_NEEDS_AUTHENTICATION";
pub const ENV_TIMEOUT_MS: &str = "FIELDGUARD_TIMEOUT_MS";

// ═══════════════════════════════════════════════════════════════════════════
// CONFIGURATION STRUCTURE
// ═══════════════════════════════════════════════════════════════════════════

/// Where and how the constraints document is fetched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Absolute URL answering a GET with the constraints document
    pub constraints_url: String,
    /// Send credentials (cookies and the `authorization` header) with the request
    #[serde(default)]
    pub needs_authentication: bool,
    /// Value of the `Authorization` header, only sent when authentication is needed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<String>,
    /// Request timeout in milliseconds, unbounded when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Config {
    #[must_use]
    pub fn new(constraints_url: impl Into<String>) -> Self {
        Self {
            constraints_url: constraints_url.into(),
            needs_authentication: false,
            authorization: None,
            timeout_ms: None,
        }
    }

    #[must_use]
    pub const fn with_authentication(mut self, needs_authentication: bool) -> Self {
        self.needs_authentication = needs_authentication;
        self
    }

    #[must_use]
    pub fn with_authorization(mut self, authorization: impl Into<String>) -> Self {
        self.authorization = Some(authorization.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Request timeout, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Parse a TOML document into a validated config.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `FIELDGUARD_*` environment variables on top of this config.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`, using the `FIELDGUARD_*` names.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_CONSTRAINTS_URL) {
            self.constraints_url = url;
        }

        if let Some(flag) = lookup(ENV_NEEDS_AUTHENTICATION) {
            self.needs_authentication = parse_bool(&flag)?;
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT_MS) {
            let millis = timeout.trim().parse::<u64>().map_err(|_| {
                Error::InvalidConfig(format!(
                    "Invalid {ENV_TIMEOUT_MS} value: '{timeout}'. Must be a number of milliseconds"
                ))
            })?;
            self.timeout_ms = Some(millis);
        }

        self.validate()?;
        Ok(self)
    }

    /// Check that the URL can be requested.
    pub fn validate(&self) -> Result<()> {
        let url = self.constraints_url.trim();
        if url.is_empty() {
            return Err(Error::InvalidConfig(
                "constraints_url must not be empty".to_string(),
            ));
        }

        let parsed = reqwest::Url::parse(url).map_err(|e| {
            Error::InvalidConfig(format!(
                "constraints_url '{url}' is not an absolute URL: {e}"
            ))
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(Error::InvalidConfig(format!(
                "constraints_url scheme '{other}' is not supported. Must be http or https"
            ))),
        }
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(Error::InvalidConfig(format!(
            "Invalid boolean value: '{value}'. Must be 'true' or 'false'"
        ))),
    }
}
