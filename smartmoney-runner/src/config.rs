//! Serializable scan configuration — the single canonical configuration surface.
//!
//! Every field is optional in TOML; missing sections and keys take the
//! documented defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use smartmoney_core::fingerprint::ConfigHash;
use smartmoney_core::{BaselineConfig, ClassifierConfig, ParamError, PrepareConfig, Preparer};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),

    #[error(transparent)]
    Param(#[from] ParamError),

    #[error("prepare.date_formats must list at least one format")]
    NoDateFormats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub prepare: PrepareConfig,
    pub baseline: BaselineConfig,
    pub classifier: ClassifierConfig,
}

impl ScanConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prepare.date_formats.is_empty() {
            return Err(ConfigError::NoDateFormats);
        }
        self.baseline.validate()?;
        self.classifier.validate()?;
        Ok(())
    }

    pub fn preparer(&self) -> Preparer {
        Preparer::new(self.prepare.clone(), self.baseline.clone())
    }

    /// Hash of everything that can change a scan's output.
    pub fn config_hash(&self) -> Result<ConfigHash, serde_json::Error> {
        ConfigHash::of(self)
    }
}
