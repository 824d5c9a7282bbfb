//! Continuous feature scalers
//!
//! Parameters are the fitted attributes exported from the training side,
//! so a transform here reproduces the training-time transform exactly.

use serde::{Deserialize, Serialize};

use super::error::PredictError;

/// Fitted scaler applied to the continuous columns only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Scaler {
    /// `(x - mean) / scale`
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// `x * scale + min`
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

impl Scaler {
    /// Number of columns the scaler was fit on
    pub fn width(&self) -> usize {
        match self {
            Self::Standard { mean, .. } => mean.len(),
            Self::MinMax { min, .. } => min.len(),
        }
    }

    /// Check parameter vectors agree and are usable
    pub fn validate(&self) -> Result<(), String> {
        let (a, b) = match self {
            Self::Standard { mean, scale } => (mean, scale),
            Self::MinMax { min, scale } => (min, scale),
        };
        if a.len() != b.len() {
            return Err(format!(
                "parameter lengths differ ({} vs {})",
                a.len(),
                b.len()
            ));
        }
        if a.iter().chain(b).any(|v| !v.is_finite()) {
            return Err("parameters must be finite".to_string());
        }
        if matches!(self, Self::Standard { .. }) && b.iter().any(|s| *s == 0.0) {
            return Err("standard scaler has a zero scale".to_string());
        }
        Ok(())
    }

    /// Scale one row of continuous values
    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>, PredictError> {
        if row.len() != self.width() {
            return Err(PredictError::DimensionMismatch {
                stage: "scaler",
                expected: self.width(),
                actual: row.len(),
            });
        }
        let scaled = match self {
            Self::Standard { mean, scale } => row
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| (x - m) / s)
                .collect(),
            Self::MinMax { min, scale } => row
                .iter()
                .zip(min.iter().zip(scale))
                .map(|(x, (m, s))| x.mul_add(*s, *m))
                .collect(),
        };
        Ok(scaled)
    }
}
