use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "https://docs.googleapis.com";
pub const DEFAULT_SNAPSHOT_DIR: &str = "~/.local/share/docmark/snapshots";
pub const DEFAULT_ACCESS_TOKEN_ENV: &str = "DOCMARK_ACCESS_TOKEN";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// List presets handed to the Docs API when bullets are created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Presets {
    pub bullet: String,
    pub numbered: String,
}

impl Default for Presets {
    fn default() -> Self {
        Self {
            bullet: "BULLET_DISC_CIRCLE_SQUARE".to_string(),
            numbered: "NUMBERED_DECIMAL_ALPHA_ROMAN".to_string(),
        }
    }
}

/// Every key is optional; missing keys take their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub snapshot_dir: PathBuf,
    /// Name of the environment variable holding the OAuth access token.
    pub access_token_env: String,
    pub request_timeout_secs: u64,
    pub presets: Presets,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            snapshot_dir: PathBuf::from(DEFAULT_SNAPSHOT_DIR),
            access_token_env: DEFAULT_ACCESS_TOKEN_ENV.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            presets: Presets::default(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Loads `config_path`, falling back to defaults when the file does not exist.
    pub fn load_or_default<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        Ok(Self::load_from_path(config_path)?.unwrap_or_default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/docmark");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Snapshot directory with `~` and environment variables expanded.
    ///
    /// Kept unexpanded in the struct so a saved config stays portable.
    pub fn snapshot_dir(&self) -> PathBuf {
        Self::expand_path(&self.snapshot_dir).unwrap_or_else(|| self.snapshot_dir.clone())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/docmark/config.toml"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.api_base_url, "https://docs.googleapis.com");
        assert_eq!(config.access_token_env, "DOCMARK_ACCESS_TOKEN");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.presets.bullet, "BULLET_DISC_CIRCLE_SQUARE");
        assert_eq!(config.presets.numbered, "NUMBERED_DECIMAL_ALPHA_ROMAN");
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let config: Config = toml::from_str(
            r#"
request_timeout_secs = 5

[presets]
numbered = "NUMBERED_UPPERALPHA_ALPHA_ROMAN"
"#,
        )
        .unwrap();

        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.presets.bullet, "BULLET_DISC_CIRCLE_SQUARE");
        assert_eq!(config.presets.numbered, "NUMBERED_UPPERALPHA_ALPHA_ROMAN");
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = Config {
            snapshot_dir: PathBuf::from("/tmp/snapshots"),
            ..Default::default()
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_snapshot_dir_expands_tilde() {
        let config = Config::default();
        let expanded = config.snapshot_dir();

        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.ends_with(".local/share/docmark/snapshots"));
    }

    #[test]
    fn test_snapshot_dir_expands_env_var() {
        unsafe {
            env::set_var("DOCMARK_TEST_DATA", "/test/env/path");
        }

        let config = Config {
            snapshot_dir: PathBuf::from("$DOCMARK_TEST_DATA/snapshots"),
            ..Default::default()
        };
        assert_eq!(
            config.snapshot_dir(),
            PathBuf::from("/test/env/path/snapshots")
        );

        unsafe {
            env::remove_var("DOCMARK_TEST_DATA");
        }
    }

    #[test]
    fn test_snapshot_dir_unknown_var_is_left_alone() {
        let config = Config {
            snapshot_dir: PathBuf::from("$DOCMARK_TEST_VAR_THAT_IS_NEVER_SET/x"),
            ..Default::default()
        };
        assert_eq!(
            config.snapshot_dir(),
            PathBuf::from("$DOCMARK_TEST_VAR_THAT_IS_NEVER_SET/x")
        );
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        assert!(Config::load_from_path(&non_existent_config).unwrap().is_none());
        assert_eq!(
            Config::load_or_default(&non_existent_config).unwrap(),
            Config::default()
        );
    }

    #[test]
    fn test_unparsable_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "request_timeout_secs = \"soon\"").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/config.toml");
        let test_config = Config {
            api_base_url: "http://localhost:8080".to_string(),
            ..Default::default()
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }
}
