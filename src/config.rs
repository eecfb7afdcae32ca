//! Runtime configuration
//!
//! Loads an optional JSON config file carrying named connection strings and
//! pipeline defaults. A missing file is not an error: the pipeline starts
//! from defaults and fails later, at connection time, if no connection
//! string was ever provided.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::Result;

fn default_models_dir() -> PathBuf {
    PathBuf::from("models")
}

/// Pipeline configuration, usually read from `config.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Connection strings by name, e.g. `{"stg": "postgres://..."}`
    #[serde(default)]
    pub connection_strings: HashMap<String, String>,
    /// Directory where model artifacts are written
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,
    /// Seed shared by all stochastic trainers
    #[serde(default)]
    pub seed: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            connection_strings: HashMap::new(),
            models_dir: default_models_dir(),
            seed: 0,
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file, falling back to defaults when
    /// the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Look up a connection string by name. Contents are not validated;
    /// a bad string surfaces as a connect failure in the extractor.
    pub fn connection_string(&self, name: &str) -> Option<&str> {
        self.connection_strings.get(name).map(|s| s.as_str())
    }
}
