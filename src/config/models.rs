//! Configuration data structures for the engine and the demo server.
//!
//! These types map directly to TOML (also JSON / YAML) configuration files.
//! They are serde-friendly and carry defaults so minimal configs stay
//! concise.
use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Address the demo server binds to.
    pub listen_addr: String,
    /// Whether route matching compares paths case-sensitively.
    pub case_sensitive: bool,
    /// Base URL prepended to relative redirect targets.
    pub base_url: Option<String>,
    pub logging: LoggingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            case_sensitive: false,
            base_url: None,
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration for the tracing subscriber.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Env-filter directive, e.g. `info` or `switchyard=debug`.
    pub level: String,
    /// Emit JSON lines instead of the console format.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
