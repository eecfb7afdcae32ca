//! Model artifacts
//!
//! A fitted model travels with the schema it was trained on. The on-disk
//! byte layout belongs to bincode and is treated as opaque; the interface is
//! just `save` and `load`. Loading verifies the stored schema against the
//! pipeline's current feature order and fails loudly on mismatch rather
//! than silently mis-scoring.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ForecastError, Result};
use crate::features::{FEATURE_NAMES, LABEL_NAME};
use crate::training::DemandModel;

/// Input schema a model was fitted with: feature names in vector order plus
/// the label column name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSchema {
    pub feature_names: Vec<String>,
    pub label: String,
}

impl ModelSchema {
    /// The schema the feature pipeline currently produces.
    pub fn current() -> Self {
        Self {
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            label: LABEL_NAME.to_string(),
        }
    }

    fn describe(&self) -> String {
        format!("[{}] -> {}", self.feature_names.join(", "), self.label)
    }
}

/// Serialized unit of a fitted model plus its schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub schema: ModelSchema,
    pub model: DemandModel,
}

impl ModelArtifact {
    /// Wrap a freshly fitted model with the current pipeline schema.
    pub fn new(model: DemandModel) -> Self {
        Self { schema: ModelSchema::current(), model }
    }

    /// Serialize to a file, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let bytes = bincode::serialize(self).map_err(|e| {
            ForecastError::SerializationError(format!("failed to serialize model: {}", e))
        })?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Load from a file. An absent or corrupt file is an error, as is a
    /// schema that no longer matches the feature pipeline.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| {
            ForecastError::DataError(format!("failed to read model {}: {}", path.display(), e))
        })?;

        let artifact: Self = bincode::deserialize(&bytes).map_err(|e| {
            ForecastError::SerializationError(format!(
                "failed to deserialize model {}: {}",
                path.display(),
                e
            ))
        })?;

        let current = ModelSchema::current();
        if artifact.schema != current {
            return Err(ForecastError::SchemaMismatch {
                expected: artifact.schema.describe(),
                actual: current.describe(),
            });
        }

        Ok(artifact)
    }
}
