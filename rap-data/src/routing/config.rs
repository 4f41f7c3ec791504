//! Router credentials and limits loaded from a JSON file.
//!
//! The file maps a provider name to its settings:
//!
//! ```json
//! {
//!   "mapbox": { "key": "pk.eyJ1...", "rate_limit": 5 },
//!   "ors": { "key": "5b3ce3...", "rate_limit": 0.66 },
//!   "graphhopper": { "key": "a1b2...", "base_url": "http://localhost:8989" }
//! }
//! ```
//!
//! `rate_limit` is in requests per second; omitted or `-1` means unlimited.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use rap_core::RateLimit;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::factory::Provider;

/// Default location of the router configuration file.
pub const DEFAULT_ROUTER_CONFIG: &str = "routerconf.json";

/// Errors raised while loading router configuration.
#[derive(Debug, Error)]
pub enum RouterConfigError {
    /// The file could not be read.
    #[error("failed to read router config {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid router map.
    #[error("invalid router config {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Settings for one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// API key or access token.
    #[serde(default)]
    pub key: String,
    /// Requests per second; non-positive means unlimited.
    #[serde(default = "unlimited")]
    pub rate_limit: f64,
    /// Endpoint override, e.g. a self-hosted instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

const fn unlimited() -> f64 {
    RateLimit::UNLIMITED.requests_per_second()
}

impl RouterConfig {
    /// Settings with a key and no rate limit.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            rate_limit: unlimited(),
            base_url: None,
        }
    }

    /// Set the rate limit in requests per second.
    #[must_use]
    pub const fn with_rate_limit(mut self, requests_per_second: f64) -> Self {
        self.rate_limit = requests_per_second;
        self
    }

    /// Point the provider at another endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Configured rate limit.
    pub const fn rate_limit(&self) -> RateLimit {
        RateLimit::per_second(self.rate_limit)
    }
}

/// Settings for every configured provider, keyed by lower-case name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutersConfig(BTreeMap<String, RouterConfig>);

impl RoutersConfig {
    /// An empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the settings for `provider`.
    #[must_use]
    pub fn with(mut self, provider: Provider, config: RouterConfig) -> Self {
        self.0.insert(provider.name().to_owned(), config);
        self
    }

    /// Parse a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the text is not a provider map.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        let raw: BTreeMap<String, RouterConfig> = serde_json::from_str(text)?;
        Ok(Self(
            raw.into_iter()
                .map(|(name, config)| (name.trim().to_ascii_lowercase(), config))
                .collect(),
        ))
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`RouterConfigError`] when the file is unreadable or invalid.
    pub fn load(path: &Utf8Path) -> Result<Self, RouterConfigError> {
        let text = rap_fs::read_to_string(path).map_err(|source| RouterConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let config = Self::from_json_str(&text).map_err(|source| RouterConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        log::debug!("loaded router config for {:?} from {path}", config.names());
        Ok(config)
    }

    /// Settings for `provider`, accepting any of its names as the key.
    pub fn get(&self, provider: Provider) -> Option<&RouterConfig> {
        provider
            .names()
            .iter()
            .find_map(|name| self.0.get(*name))
    }

    /// Configured provider names.
    pub fn names(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }
}
