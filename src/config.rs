use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name of the optional configuration inside the data directory
pub const CONFIG_FILE: &str = "config.json";

/// User configuration stored in config.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Event loop tick interval in milliseconds
    pub tick_ms: u64,
    /// Forward notifications to the desktop as well as the in-app modal
    pub desktop_notifications: bool,
    /// Default log filter, overridden by RUST_LOG
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_ms: crate::ticker::DEFAULT_TICK_MS,
            desktop_notifications: true,
            log_filter: "info".to_string(),
        }
    }
}

/// Load configuration from `path`; a missing file yields the defaults
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();

    let Some(content) = crate::persistence::read_optional(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?
    else {
        return Ok(Config::default());
    };

    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    Ok(config)
}

/// Write configuration to `path`
pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(config)?;
    crate::persistence::atomic_write(path, &json)
        .with_context(|| format!("Failed to write config: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = tempdir().unwrap();
        let config = load_config(temp_dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tick_ms, 250);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{"tick_ms": 100}"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.tick_ms, 100);
        assert!(config.desktop_notifications);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);

        let config = Config {
            tick_ms: 500,
            desktop_notifications: false,
            log_filter: "debug".to_string(),
        };
        save_config(&path, &config).unwrap();

        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "tick_ms = 5").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }
}
