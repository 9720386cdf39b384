//! Server configuration.
//!
//! Configuration is read from a TOML file with three sections:
//! - `[server]`: bind address, CORS, result bounds, default look-back
//! - `[store]`: key prefix, per-call timeout, optional seed file
//! - `[discovery]`: values reported when discovery has nothing to say

use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use logview_core::{DEFAULT_LIMIT, DiscoveryDefaults};
use logview_store::{DEFAULT_PREFIX, KeyLayout};
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address to bind the HTTP server to.
    pub bind_addr: SocketAddr,
    /// CORS allowed origins (empty means all).
    pub cors_origins: Vec<String>,
    /// Limit applied when a request gives none.
    pub default_limit: i64,
    /// Upper bound on any requested limit.
    pub max_limit: i64,
    /// Look-back window used when a time-range request has no start time.
    pub lookback_hours: i64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8081)),
            cors_origins: Vec::new(),
            default_limit: DEFAULT_LIMIT,
            max_limit: 1000,
            lookback_hours: 24,
        }
    }
}

impl ServerSettings {
    /// Look-back window in milliseconds.
    #[must_use]
    pub const fn lookback_ms(&self) -> i64 {
        self.lookback_hours.saturating_mul(60 * 60 * 1000)
    }
}

/// Store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Prefix for every key the retriever reads.
    pub key_prefix: String,
    /// Upper bound on a single retrieval, in milliseconds.
    pub timeout_ms: u64,
    /// JSON-lines file loaded into the in-memory store at startup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_file: Option<PathBuf>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_PREFIX.to_string(),
            timeout_ms: 2_000,
            seed_file: None,
        }
    }
}

impl StoreSettings {
    /// Per-call timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Key layout for the configured prefix.
    #[must_use]
    pub fn layout(&self) -> KeyLayout {
        KeyLayout::new(self.key_prefix.clone())
    }
}

/// Discovery fallback values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverySettings {
    /// Levels reported when none can be discovered.
    pub levels: BTreeSet<String>,
    /// Services reported when none can be discovered.
    pub services: BTreeSet<String>,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        let defaults = DiscoveryDefaults::default();
        Self {
            levels: defaults.levels,
            services: defaults.services,
        }
    }
}

impl DiscoverySettings {
    /// Converts into the retriever's defaults.
    #[must_use]
    pub fn to_defaults(&self) -> DiscoveryDefaults {
        DiscoveryDefaults {
            levels: self.levels.clone(),
            services: self.services.clone(),
        }
    }
}

/// Full configuration for the logview server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogviewConfig {
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Store settings.
    pub store: StoreSettings,
    /// Discovery fallback values.
    pub discovery: DiscoverySettings,
}

impl LogviewConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or fails validation.
    pub fn from_file(path: impl AsRef<Path>) -> ServerResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ServerError::Config(format!(
                "failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or fails validation.
    pub fn from_toml(content: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ServerError::Config(format!("invalid TOML: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> ServerResult<()> {
        let server = &self.server;
        if server.default_limit <= 0 {
            return Err(ServerError::Config(
                "server.default_limit must be positive".to_string(),
            ));
        }
        if server.max_limit < server.default_limit {
            return Err(ServerError::Config(format!(
                "server.max_limit ({}) must be at least server.default_limit ({})",
                server.max_limit, server.default_limit
            )));
        }
        if server.lookback_hours <= 0 {
            return Err(ServerError::Config(
                "server.lookback_hours must be positive".to_string(),
            ));
        }

        if self.store.key_prefix.is_empty() {
            return Err(ServerError::Config(
                "store.key_prefix cannot be empty".to_string(),
            ));
        }
        if self.store.timeout_ms == 0 {
            return Err(ServerError::Config(
                "store.timeout_ms must be positive".to_string(),
            ));
        }

        if self.discovery.levels.is_empty() || self.discovery.services.is_empty() {
            return Err(ServerError::Config(
                "discovery.levels and discovery.services need at least one entry".to_string(),
            ));
        }

        Ok(())
    }
}
