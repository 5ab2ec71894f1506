use crate::data::snapshot::ColorScheme;
use crate::data::source::SourceConfig;
use crate::data::{DEFAULT_REFRESH_INTERVAL_MS, MIN_REFRESH_INTERVAL_MS};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub color_scheme: ColorScheme,
    /// How often the GPU panel re-samples, in milliseconds.
    pub refresh_interval_ms: u64,
    pub sources: SourceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            color_scheme: ColorScheme::Adrenaline,
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            sources: SourceConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load the user config, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(ConfigError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
            Err(err) => {
                warn!(path = %path.display(), "ignoring config: {}", err);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.refresh_interval_ms = config.refresh_interval_ms.max(MIN_REFRESH_INTERVAL_MS);
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        fs::write(path, toml)?;
        Ok(())
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pulsetool").join("config.toml"))
    }
}
