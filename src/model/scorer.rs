//! Single-row scoring
//!
//! Binds a loaded model into a prediction function over individual
//! observations. The recognition type id is passed through from the input,
//! not predicted; predicted counts are floored at zero since event counts
//! cannot be negative.

use ndarray::Array2;
use std::path::Path;

use super::artifact::ModelArtifact;
use crate::data::{DemandObservation, DemandPrediction};
use crate::error::Result;
use crate::features::{feature_row, FEATURE_COUNT};

/// A prediction engine bound to one loaded model.
pub struct Scorer {
    artifact: ModelArtifact,
}

impl Scorer {
    pub fn new(artifact: ModelArtifact) -> Self {
        Self { artifact }
    }

    /// Load the artifact at `path` and bind it for scoring.
    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(Self::new(ModelArtifact::load(path)?))
    }

    /// Score one observation.
    pub fn predict_one(&self, obs: &DemandObservation) -> Result<DemandPrediction> {
        let row = feature_row(obs);
        let x = Array2::from_shape_vec((1, FEATURE_COUNT), row.to_vec())?;
        let scores = self.artifact.model.predict(&x)?;

        Ok(DemandPrediction {
            predicted_count: scores[0].max(0.0),
            recognition_type_id: obs.id,
        })
    }
}
