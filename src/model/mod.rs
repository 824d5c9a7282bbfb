//! Model module
//!
//! Loads the fitted scaler and classifier once at startup and runs the
//! scale-then-classify pipeline for each request.

mod classifier;
mod error;
mod scaler;

pub use classifier::{Classifier, DecisionTree, TreeNode};
pub use error::{ArtifactError, PredictError};
pub use scaler::Scaler;

use serde::de::DeserializeOwned;
use std::fmt;
use std::path::Path;

use crate::features::{FeatureVector, CONTINUOUS_COUNT, FEATURE_COUNT};

/// Classifier output mapped to its display label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    WillSurvive,
    AtRisk,
}

impl Outcome {
    /// Class 0 survives, every other class is at risk
    pub const fn from_class(class: u8) -> Self {
        if class == 0 {
            Self::WillSurvive
        } else {
            Self::AtRisk
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::WillSurvive => "Will Survive",
            Self::AtRisk => "At Risk",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scaler plus classifier, immutable after load
#[derive(Debug, Clone)]
pub struct Predictor {
    scaler: Scaler,
    classifier: Classifier,
}

impl Predictor {
    /// Pair a scaler and classifier after checking they fit the schema
    pub fn new(scaler: Scaler, classifier: Classifier) -> Result<Self, String> {
        check_scaler(&scaler)?;
        classifier.validate(FEATURE_COUNT)?;
        Ok(Self { scaler, classifier })
    }

    /// Load both artifacts; any failure is fatal for the server
    pub fn load(model_path: &Path, scaler_path: &Path) -> Result<Self, ArtifactError> {
        let scaler: Scaler = load_artifact(scaler_path)?;
        check_scaler(&scaler).map_err(|reason| incompatible(scaler_path, reason))?;

        let classifier: Classifier = load_artifact(model_path)?;
        classifier
            .validate(FEATURE_COUNT)
            .map_err(|reason| incompatible(model_path, reason))?;

        Ok(Self { scaler, classifier })
    }

    pub const fn scaler(&self) -> &Scaler {
        &self.scaler
    }

    pub const fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Scale the continuous columns in place, then classify the full row
    pub fn predict(&self, features: &FeatureVector) -> Result<Outcome, PredictError> {
        let mut row = features.clone();
        let scaled = self.scaler.transform(&row.continuous())?;
        row.set_continuous(&scaled);
        let class = self.classifier.predict(row.values())?;
        Ok(Outcome::from_class(class))
    }
}

fn check_scaler(scaler: &Scaler) -> Result<(), String> {
    scaler.validate()?;
    if scaler.width() == CONTINUOUS_COUNT {
        Ok(())
    } else {
        Err(format!(
            "scaler was fit on {} columns, expected {CONTINUOUS_COUNT}",
            scaler.width()
        ))
    }
}

fn incompatible(path: &Path, reason: String) -> ArtifactError {
    ArtifactError::Incompatible {
        path: path.to_path_buf(),
        reason,
    }
}

/// Read an artifact, choosing the decoder from the file extension
pub fn load_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let format = path.extension().and_then(|e| e.to_str());
    if !matches!(format, Some("json" | "toml")) {
        return Err(ArtifactError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed = if format == Some("json") {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    } else {
        toml::from_str(&content).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| ArtifactError::Parse {
        path: path.to_path_buf(),
        message,
    })
}
