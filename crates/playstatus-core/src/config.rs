//! Configuration loading and typed config structures for PlayStatus.
//!
//! The configuration lives in `playstatus.yaml` next to the daemon. This
//! module defines strongly-typed structs that mirror the YAML structure and
//! a loader that reads the file. Every field has a default, so an empty or
//! missing file yields a working configuration.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level PlayStatus configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StatusConfig {
    /// Listening address of the HTTP/WebSocket server.
    #[serde(default)]
    pub server: ServerSection,

    /// Push fan-out settings.
    #[serde(default)]
    pub broadcast: BroadcastConfig,

    /// Pending-cut pool settings.
    #[serde(default)]
    pub pool: PoolConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Version strings rendered into the `game` section.
    #[serde(default)]
    pub game: GameConfig,
}

impl StatusConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for the listening address:
    /// - `PLAYSTATUS_HOST` overrides `server.host`
    /// - `PLAYSTATUS_PORT` overrides `server.port`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.server.apply_env_overrides();
        Ok(config)
    }
}

/// Listening address of the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerSection {
    /// Override the listening address with environment variables when set.
    ///
    /// An unparseable `PLAYSTATUS_PORT` is ignored with a warning.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("PLAYSTATUS_HOST") {
            self.host = val;
        }
        if let Ok(val) = std::env::var("PLAYSTATUS_PORT") {
            match val.parse() {
                Ok(port) => self.port = port,
                Err(e) => tracing::warn!(value = %val, error = %e, "Ignoring invalid PLAYSTATUS_PORT"),
            }
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Push fan-out configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BroadcastConfig {
    /// Snapshots a subscriber may have queued before further sends to it
    /// are dropped. Values below 1 are treated as 1.
    #[serde(default = "default_subscriber_buffer")]
    pub subscriber_buffer: usize,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            subscriber_buffer: default_subscriber_buffer(),
        }
    }
}

/// Pending-cut pool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PoolConfig {
    /// Slots reserved up front so the first cuts of a song do not grow
    /// the pool's storage.
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_capacity: default_initial_capacity(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Version strings rendered into the status document's `game` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Version of this status plugin.
    #[serde(default = "default_plugin_version")]
    pub plugin_version: String,

    /// Version of the host game.
    #[serde(default = "default_game_version")]
    pub game_version: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            plugin_version: default_plugin_version(),
            game_version: default_game_version(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_host() -> String {
    String::from("127.0.0.1")
}

const fn default_port() -> u16 {
    6557
}

const fn default_subscriber_buffer() -> usize {
    1
}

const fn default_initial_capacity() -> usize {
    256
}

fn default_log_level() -> String {
    String::from("info")
}

fn default_plugin_version() -> String {
    String::from(env!("CARGO_PKG_VERSION"))
}

fn default_game_version() -> String {
    String::from("unknown")
}
