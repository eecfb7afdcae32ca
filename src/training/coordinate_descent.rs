//! Coordinate-descent linear regression
//!
//! Elastic-net penalized least squares solved by cyclic coordinate descent
//! with soft-thresholding, on centered data with an incremental residual
//! update per coordinate.

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

/// Linear regression fit by cyclic coordinate descent under an elastic-net
/// penalty. `l1_ratio` = 0 is ridge, 1 is lasso.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinateDescentRegressor {
    pub coefficients: Option<Array1<f64>>,
    pub intercept: Option<f64>,
    pub fit_intercept: bool,
    /// Overall regularization strength
    pub alpha: f64,
    /// Mix between L1 and L2 penalty
    pub l1_ratio: f64,
    pub max_iter: usize,
    pub tol: f64,
    pub is_fitted: bool,
}

impl Default for CoordinateDescentRegressor {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinateDescentRegressor {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            fit_intercept: true,
            alpha: 1e-3,
            l1_ratio: 0.5,
            max_iter: 1000,
            tol: 1e-6,
            is_fitted: false,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_l1_ratio(mut self, l1_ratio: f64) -> Self {
        self.l1_ratio = l1_ratio;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Soft-threshold operator for the L1 proximal step
    fn soft_threshold(val: f64, threshold: f64) -> f64 {
        if val > threshold {
            val - threshold
        } else if val < -threshold {
            val + threshold
        } else {
            0.0
        }
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(ForecastError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(ForecastError::TrainingError("no training data".to_string()));
        }

        let (x_c, y_c, x_mean, y_mean) = if self.fit_intercept {
            let xm = x.mean_axis(Axis(0)).unwrap();
            let ym = y.mean().unwrap_or(0.0);
            (x - &xm.clone().insert_axis(Axis(0)), y - ym, Some(xm), Some(ym))
        } else {
            (x.clone(), y.clone(), None, None)
        };

        let col_norms: Vec<f64> = (0..n_features)
            .map(|j| x_c.column(j).mapv(|v| v * v).sum())
            .collect();

        let l1_penalty = self.alpha * self.l1_ratio * n_samples as f64;
        let l2_penalty = self.alpha * (1.0 - self.l1_ratio) * n_samples as f64;

        let mut w: Array1<f64> = Array1::zeros(n_features);

        for _iter in 0..self.max_iter {
            let w_old = w.clone();

            let mut r = &y_c - &x_c.dot(&w);

            for j in 0..n_features {
                if col_norms[j] < 1e-15 {
                    w[j] = 0.0;
                    continue;
                }
                // rho = x_j^T r + ||x_j||² w_j, i.e. the unregularized update
                let rho = x_c.column(j).dot(&r) + col_norms[j] * w[j];
                let old_wj = w[j];
                w[j] = Self::soft_threshold(rho, l1_penalty) / (col_norms[j] + l2_penalty);
                if (old_wj - w[j]).abs() > 0.0 {
                    r = r + &(&x_c.column(j) * (old_wj - w[j]));
                }
            }

            let diff = (&w - &w_old).mapv(|v| v.abs()).sum();
            if diff < self.tol {
                break;
            }
        }

        self.intercept = if self.fit_intercept {
            Some(y_mean.unwrap() - w.dot(&x_mean.unwrap()))
        } else {
            Some(0.0)
        };
        self.coefficients = Some(w);
        self.is_fitted = true;
        Ok(self)
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if !self.is_fitted {
            return Err(ForecastError::ModelNotFitted);
        }
        Ok(x.dot(self.coefficients.as_ref().unwrap()) + self.intercept.unwrap_or(0.0))
    }
}
