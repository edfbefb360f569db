//! Configuration management

use crate::error::{EqrefError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Prefix equation labels must carry (default "eq-")
    pub label_prefix: String,

    /// Prose prefix for numbered references (default "Equation")
    pub reference_word: String,

    /// Directory resolved documents are written to (default "_resolved")
    pub output_dir: String,

    pub created: DateTime<Utc>,
}

impl Config {
    /// Create a new config with default values
    pub fn new() -> Self {
        Config {
            label_prefix: "eq-".to_string(),
            reference_word: "Equation".to_string(),
            output_dir: "_resolved".to_string(),
            created: Utc::now(),
        }
    }

    /// Load config from .eqref/config.toml in the given directory
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(".eqref").join("config.toml");

        let contents = fs::read_to_string(&config_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                EqrefError::NotProjectDirectory(path.to_path_buf())
            } else {
                EqrefError::Io(e)
            }
        })?;

        toml::from_str(&contents)
            .map_err(|e| EqrefError::Config(format!("Failed to parse config.toml: {}", e)))
    }

    /// Save config to .eqref/config.toml in the given directory
    pub fn save_to_dir(&self, path: &Path) -> Result<()> {
        let eqref_dir = path.join(".eqref");
        let config_path = eqref_dir.join("config.toml");

        // Ensure .eqref directory exists
        if !eqref_dir.exists() {
            fs::create_dir(&eqref_dir)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| EqrefError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Get a config value by CLI key
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "label-prefix" => Ok(self.label_prefix.clone()),
            "reference-word" => Ok(self.reference_word.clone()),
            "output-dir" => Ok(self.output_dir.clone()),
            "created" => Ok(self.created.to_rfc3339()),
            _ => Err(EqrefError::Config(format!("Unknown config key: {}", key))),
        }
    }

    /// Set a config value by CLI key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "label-prefix" => {
                if value.is_empty() {
                    return Err(EqrefError::Config(
                        "label-prefix must not be empty".to_string(),
                    ));
                }
                self.label_prefix = value.to_string();
            }
            "reference-word" => self.reference_word = value.to_string(),
            "output-dir" => self.output_dir = value.to_string(),
            "created" => {
                return Err(EqrefError::Config("created is read-only".to_string()));
            }
            _ => {
                return Err(EqrefError::Config(format!("Unknown config key: {}", key)));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}
