use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::domains::player::selector::ViewportThresholds;
use crate::infra::api_client::AuthScheme;
use crate::infra::constants::{env, files, restore, seeking};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read or write config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No platform config directory available")]
    NoConfigDir,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub server_url: String,
    pub auth_scheme: AuthScheme,
    /// Checkpoint progress when the hosting environment unloads
    pub checkpoint_on_unload: bool,
    /// Rewind / fast-forward step in seconds
    pub seek_step_secs: f64,
    /// Delay before the post-switch seek backstop runs
    pub restore_backstop_ms: u64,
    pub viewport: ViewportThresholds,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8000/api".to_string(),
            auth_scheme: AuthScheme::default(),
            checkpoint_on_unload: false,
            seek_step_secs: seeking::SEEK_STEP_SECS,
            restore_backstop_ms: restore::BACKSTOP_DELAY_MS,
            viewport: ViewportThresholds::default(),
        }
    }
}

impl PlayerConfig {
    /// Defaults, then the user config file, then environment overrides.
    ///
    /// A broken config file is logged and ignored.
    pub fn load() -> Self {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => {
                Self::load_from(&path).unwrap_or_else(|e| {
                    warn!("[Config] Ignoring {}: {}", path.display(), e);
                    Self::default()
                })
            }
            _ => Self::default(),
        };
        config.apply_env_overrides();
        config
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Ok(config.sanitized())
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content =
            serde_json::to_string_pretty(self).map_err(|source| {
                ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        std::fs::write(path, content).map_err(io_err)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(files::CONFIG_DIR).join(files::CONFIG_FILE))
    }

    pub fn restore_backstop(&self) -> Duration {
        Duration::from_millis(self.restore_backstop_ms)
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(server_url) = lookup(env::SERVER_URL) {
            self.server_url = server_url;
        }
        if let Some(raw) = lookup(env::CHECKPOINT_ON_UNLOAD) {
            match parse_flag(&raw) {
                Some(flag) => self.checkpoint_on_unload = flag,
                None => warn!(
                    "[Config] Ignoring {}={:?}: expected a boolean",
                    env::CHECKPOINT_ON_UNLOAD,
                    raw
                ),
            }
        }
    }

    /// Replace values that would stall or break playback with defaults
    fn sanitized(mut self) -> Self {
        if !self.seek_step_secs.is_finite() || self.seek_step_secs <= 0.0 {
            warn!(
                "[Config] seek_step_secs {} is invalid, using {}",
                self.seek_step_secs,
                seeking::SEEK_STEP_SECS
            );
            self.seek_step_secs = seeking::SEEK_STEP_SECS;
        }
        if !self.viewport.is_ordered() {
            warn!(
                "[Config] viewport thresholds {:?} are not ascending, using defaults",
                self.viewport
            );
            self.viewport = ViewportThresholds::default();
        }
        self
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_unload_checkpoint_disabled() {
        let config = PlayerConfig::default();
        assert!(!config.checkpoint_on_unload);
        assert_eq!(config.seek_step_secs, 10.0);
        assert_eq!(config.restore_backstop(), Duration::from_millis(100));
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"server_url": "https://videoflix.test/api", "checkpoint_on_unload": true}"#,
        )
        .unwrap();

        let config = PlayerConfig::load_from(&path).unwrap();
        assert_eq!(config.server_url, "https://videoflix.test/api");
        assert!(config.checkpoint_on_unload);
        assert_eq!(config.restore_backstop_ms, 100);
        assert_eq!(config.viewport, ViewportThresholds::default());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = PlayerConfig {
            auth_scheme: AuthScheme::Token,
            seek_step_secs: 5.0,
            ..PlayerConfig::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(PlayerConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn invalid_values_are_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"seek_step_secs": -3, "viewport": {"small_max": 900, "medium_max": 700, "large_max": 1366}}"#,
        )
        .unwrap();

        let config = PlayerConfig::load_from(&path).unwrap();
        assert_eq!(config.seek_step_secs, 10.0);
        assert_eq!(config.viewport, ViewportThresholds::default());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            PlayerConfig::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn overrides_apply_known_keys() {
        let mut config = PlayerConfig::default();
        config.apply_overrides(|key| match key {
            env::SERVER_URL => Some("https://override.test".into()),
            env::CHECKPOINT_ON_UNLOAD => Some("yes".into()),
            _ => None,
        });
        assert_eq!(config.server_url, "https://override.test");
        assert!(config.checkpoint_on_unload);

        config.apply_overrides(|key| {
            (key == env::CHECKPOINT_ON_UNLOAD).then(|| "maybe".to_string())
        });
        assert!(config.checkpoint_on_unload);
    }
}
