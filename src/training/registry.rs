//! Trainer registry
//!
//! The four demand trainers as a fixed, ordered list of descriptors. The
//! same descriptors drive the training stage and the scoring stage, and the
//! artifact file name for a trainer is derived in exactly one place.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::boosted_trees::{BoostedTreesConfig, BoostedTreesRegressor, BoostingLoss};
use super::coordinate_descent::CoordinateDescentRegressor;
use super::poisson::PoissonRegressor;
use crate::error::{ForecastError, Result};

/// The trainer algorithms the pipeline knows about. No dynamic registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainerKind {
    /// Gradient-boosted trees, squared loss
    BoostedTrees,
    /// Poisson GLM, log link
    Poisson,
    /// Elastic-net linear regression via coordinate descent
    CoordinateDescent,
    /// Gradient-boosted trees, Tweedie deviance loss
    TweedieBoostedTrees,
}

/// One registry entry: a display name plus the algorithm it selects.
#[derive(Debug, Clone, Copy)]
pub struct TrainerSpec {
    pub name: &'static str,
    pub kind: TrainerKind,
    pub seed: u64,
}

/// The fixed trainer list, in training and scoring order.
pub fn registry(seed: u64) -> Vec<TrainerSpec> {
    vec![
        TrainerSpec { name: "BoostedTrees", kind: TrainerKind::BoostedTrees, seed },
        TrainerSpec { name: "Poisson", kind: TrainerKind::Poisson, seed },
        TrainerSpec { name: "CoordinateDescent", kind: TrainerKind::CoordinateDescent, seed },
        TrainerSpec { name: "TweedieBoostedTrees", kind: TrainerKind::TweedieBoostedTrees, seed },
    ]
}

impl TrainerSpec {
    /// Artifact path for this trainer under the models directory.
    pub fn artifact_path(&self, models_dir: &Path) -> PathBuf {
        models_dir.join(format!("{}Model.bin", self.name))
    }

    /// Fit this trainer on the assembled feature matrix and labels.
    pub fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<DemandModel> {
        if x.nrows() == 0 {
            return Err(ForecastError::TrainingError("no training data".to_string()));
        }

        let model = match self.kind {
            TrainerKind::BoostedTrees => {
                let config = BoostedTreesConfig { seed: self.seed, ..Default::default() };
                let mut model = BoostedTreesRegressor::new(config);
                model.fit(x, y)?;
                DemandModel::BoostedTrees(model)
            }
            TrainerKind::Poisson => {
                let mut model = PoissonRegressor::new();
                model.fit(x, y)?;
                DemandModel::Poisson(model)
            }
            TrainerKind::CoordinateDescent => {
                let mut model = CoordinateDescentRegressor::new();
                model.fit(x, y)?;
                DemandModel::CoordinateDescent(model)
            }
            TrainerKind::TweedieBoostedTrees => {
                let config = BoostedTreesConfig {
                    loss: BoostingLoss::Tweedie { power: 1.5 },
                    seed: self.seed,
                    ..Default::default()
                };
                let mut model = BoostedTreesRegressor::new(config);
                model.fit(x, y)?;
                DemandModel::TweedieBoostedTrees(model)
            }
        };

        Ok(model)
    }
}

/// A fitted demand model, ready to score or serialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DemandModel {
    BoostedTrees(BoostedTreesRegressor),
    Poisson(PoissonRegressor),
    CoordinateDescent(CoordinateDescentRegressor),
    TweedieBoostedTrees(BoostedTreesRegressor),
}

impl DemandModel {
    /// Score a batch of feature rows.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        match self {
            DemandModel::BoostedTrees(model) => model.predict(x),
            DemandModel::Poisson(model) => model.predict(x),
            DemandModel::CoordinateDescent(model) => model.predict(x),
            DemandModel::TweedieBoostedTrees(model) => model.predict(x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_order_is_fixed() {
        let specs = registry(0);
        let names: Vec<&str> = specs.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec!["BoostedTrees", "Poisson", "CoordinateDescent", "TweedieBoostedTrees"]
        );
    }

    #[test]
    fn test_artifact_paths_are_unique() {
        let dir = Path::new("models");
        let specs = registry(0);
        let mut paths: Vec<PathBuf> = specs.iter().map(|s| s.artifact_path(dir)).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), specs.len());
        assert_eq!(
            specs[0].artifact_path(dir),
            PathBuf::from("models/BoostedTreesModel.bin")
        );
    }

    #[test]
    fn test_fit_on_empty_data_is_an_error() {
        let x = Array2::<f64>::zeros((0, 6));
        let y = Array1::<f64>::zeros(0);
        for spec in registry(0) {
            let err = spec.fit(&x, &y).unwrap_err();
            assert!(
                err.to_string().contains("no training data"),
                "unexpected error for {}: {}",
                spec.name,
                err
            );
        }
    }
}
