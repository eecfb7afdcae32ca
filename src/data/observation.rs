//! Observation and prediction records
//!
//! All fields are `f64` for uniformity with the numeric column type the
//! trainers consume. Observations are immutable value records: one per
//! aggregated SQL row or CSV line, never mutated after construction.

use serde::{Deserialize, Serialize};

/// One aggregated demand row: a recognition type and hour-of-day bucket
/// together with the number of events observed in that bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DemandObservation {
    /// Recognition type identifier
    pub id: f64,
    pub year: f64,
    pub month: f64,
    pub day: f64,
    pub hour: f64,
    /// Day of week, 1–7
    pub weekday: f64,
    /// Number of events in the bucket; the regression label
    pub count: f64,
}

/// Output of scoring one observation; transient, display only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemandPrediction {
    /// Predicted event count, floored at zero
    pub predicted_count: f64,
    /// Recognition type id, passed through from the observation
    pub recognition_type_id: f64,
}

impl DemandObservation {
    /// Canonical sample row used by demos and tests.
    pub fn sample() -> Self {
        Self {
            id: 2.0,
            year: 2019.0,
            month: 1.0,
            day: 1.0,
            hour: 4.0,
            weekday: 3.0,
            count: 4.0,
        }
    }
}
