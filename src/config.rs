use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level configuration, loaded from an optional TOML file and merged with
/// CLI overrides in `main`.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct WatcherConfig {
    pub watch: WatchSection,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WatchSection {
    /// Service tickrate in milliseconds.
    pub tick_interval_ms: u64,
    /// Revert the file when truncation is detected.
    pub fix: bool,
    /// When reverting, also apply the numeric increment transform.
    pub increment: bool,
    /// Step added by the increment transform.
    pub increment_step: i64,
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            fix: false,
            increment: false,
            increment_step: 1,
        }
    }
}

/// Errors that can occur while resolving configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the config file.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Config file is not valid TOML for this schema.
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Tick interval must be positive.
    ZeroTickInterval,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config file {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse config file {}: {}", path.display(), source)
            }
            ConfigError::ZeroTickInterval => {
                write!(f, "tick_interval_ms must be greater than 0")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::ZeroTickInterval => None,
        }
    }
}

/// Load configuration from `path`, or defaults when no file was given.
pub fn load_config(path: Option<&Path>) -> Result<WatcherConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(WatcherConfig::default());
    };
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&raw).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

impl WatcherConfig {
    /// Apply CLI overrides on top of file values. Boolean flags only override
    /// when set; absent flags leave the file's choice in place.
    pub fn apply_cli(&mut self, tickrate: Option<u64>, fix: bool, increment: bool) {
        if let Some(tickrate) = tickrate {
            self.watch.tick_interval_ms = tickrate;
        }
        if fix {
            self.watch.fix = true;
        }
        if increment {
            self.watch.increment = true;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.watch.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }
}
