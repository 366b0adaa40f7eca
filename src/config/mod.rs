mod error;

pub use error::{ConfigError, ConfigResult};

use crate::console::VerbosityLevel;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Engine-level settings supplied by the embedding host. The candidate
/// truncation limit is a fixed constant
/// ([`crate::mentions::MAX_SUGGESTIONS`]), not a setting.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EngineConfig {
    /// Character that begins a recognized token, e.g. `@`.
    #[serde(default = "default_trigger")]
    pub trigger: char,
    #[serde(default)]
    pub verbosity: Option<String>,
}

fn default_trigger() -> char {
    '@'
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trigger: default_trigger(),
            verbosity: None,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load_from_path(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn verbosity_level(&self) -> ConfigResult<VerbosityLevel> {
        match &self.verbosity {
            None => Ok(VerbosityLevel::default()),
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                field: "verbosity".to_string(),
                value: raw.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_uses_at_trigger() {
        let config = EngineConfig::default();
        assert_eq!(config.trigger, '@');
        assert!(config.verbosity.is_none());
    }

    #[test]
    fn parses_toml_with_overrides() {
        let config = EngineConfig::from_toml_str("trigger = \"#\"\nverbosity = \"debug\"").unwrap();
        assert_eq!(config.trigger, '#');
        assert_eq!(config.verbosity_level().unwrap(), VerbosityLevel::Debug);
    }

    #[test]
    fn empty_toml_falls_back_to_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config.trigger, '@');
        assert_eq!(config.verbosity_level().unwrap(), VerbosityLevel::Normal);
    }

    #[test]
    fn rejects_unknown_verbosity() {
        let config = EngineConfig::from_toml_str("verbosity = \"shouty\"").unwrap();
        assert!(matches!(
            config.verbosity_level(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn load_from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "trigger = \"+\"").unwrap();

        let config = EngineConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.trigger, '+');
    }

    #[test]
    fn load_from_missing_path_is_not_found() {
        let result = EngineConfig::load_from_path(Path::new("/nonexistent/callout.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }
}
