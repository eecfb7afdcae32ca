//! Model training
//!
//! The regression capabilities behind the trainer registry:
//! - Gradient-boosted trees (squared and Tweedie losses)
//! - Poisson regression (log-link GLM)
//! - Coordinate-descent linear regression (elastic net)
//! plus the regression tree base learner and evaluation metrics.

pub mod boosted_trees;
pub mod coordinate_descent;
pub mod decision_tree;
pub mod metrics;
pub mod poisson;
mod registry;

pub use boosted_trees::{BoostedTreesConfig, BoostedTreesRegressor, BoostingLoss};
pub use coordinate_descent::CoordinateDescentRegressor;
pub use decision_tree::RegressionTree;
pub use metrics::RegressionMetrics;
pub use poisson::PoissonRegressor;
pub use registry::{registry, DemandModel, TrainerKind, TrainerSpec};
