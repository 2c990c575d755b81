//! Configuration loading and root folder resolution
//!
//! Every bootstrap setting is resolved in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing TOML file is not an error: defaults are used. A TOML file that
//! exists but cannot be parsed is always a configuration error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit TOML config file
pub const CONFIG_ENV_VAR: &str = "KARAOKE_CONFIG";

/// Environment variable naming the folder audio identifiers are resolved against
pub const ROOT_FOLDER_ENV_VAR: &str = "KARAOKE_ROOT_FOLDER";

/// Default analysis window length in samples
pub const DEFAULT_WINDOW_SIZE: usize = 2048;

/// Default distance between consecutive window starts in samples
pub const DEFAULT_HOP_SIZE: usize = 512;

/// File name looked up under the platform config directory
const CONFIG_FILE_NAME: &str = "karaoke-scorer.toml";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Folder that audio identifiers are relative to (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Envelope and alignment parameters (optional)
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
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

/// Scoring parameters as written in the TOML file
///
/// Values are validated by the scorer, not here.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScoringConfig {
    /// Analysis window length in samples
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Hop between window starts in samples
    #[serde(default = "default_hop_size")]
    pub hop_size: usize,

    /// Largest tolerated fraction of windows lost to truncation.
    /// Absent means envelopes are truncated silently.
    #[serde(default)]
    pub max_length_gap: Option<f64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            hop_size: DEFAULT_HOP_SIZE,
            max_length_gap: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

fn default_hop_size() -> usize {
    DEFAULT_HOP_SIZE
}

/// Load bootstrap configuration
///
/// **Priority:** explicit path → `KARAOKE_CONFIG` → platform config file → defaults
///
/// An explicitly named file (argument or environment) must exist. The
/// platform config file is optional.
pub fn load_config(cli_path: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = cli_path {
        info!("Loading config from command-line path: {}", path.display());
        return read_toml_config(path);
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        let path = PathBuf::from(path);
        info!("Loading config from {}: {}", CONFIG_ENV_VAR, path.display());
        return read_toml_config(&path);
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            info!("Loading config from {}", path.display());
            read_toml_config(&path)
        }
        Some(path) => {
            debug!("No config file at {}, using defaults", path.display());
            Ok(TomlConfig::default())
        }
        None => {
            debug!("Could not determine config directory, using defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Read and parse a TOML config file
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        return Err(Error::NotFound(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))
}

/// Platform config file location (`<config_dir>/karaoke/karaoke-scorer.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("karaoke").join(CONFIG_FILE_NAME))
}

/// Resolve the root folder audio identifiers are relative to
///
/// **Priority:** CLI argument → `KARAOKE_ROOT_FOLDER` → TOML → current directory
pub fn resolve_root_folder(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV_VAR) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    PathBuf::from(".")
}

/// Parse a log level name (case-insensitive)
pub fn parse_log_level(level: &str) -> Result<tracing::Level> {
    level.trim().parse::<tracing::Level>().map_err(|_| {
        Error::InvalidInput(format!(
            "Unknown log level '{}' (expected trace, debug, info, warn or error)",
            level
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_defaults() {
        let config = ScoringConfig::default();
        assert_eq!(config.window_size, 2048);
        assert_eq!(config.hop_size, 512);
        assert!(config.max_length_gap.is_none());
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("debug").unwrap(), tracing::Level::DEBUG);
        assert_eq!(parse_log_level("WARN").unwrap(), tracing::Level::WARN);
        assert!(matches!(
            parse_log_level("loud"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_partial_toml_uses_field_defaults() {
        let config: TomlConfig = toml::from_str("[scoring]\nhop_size = 256\n").unwrap();
        assert_eq!(config.scoring.hop_size, 256);
        assert_eq!(config.scoring.window_size, DEFAULT_WINDOW_SIZE);
        assert_eq!(config.logging.level, "info");
        assert!(config.root_folder.is_none());
    }
}
