//! Form submission handling
//!
//! Validation and prediction stay typed until the very end, where the
//! result becomes the one string the user sees.

use crate::features::FeatureVector;
use crate::http::FormData;
use crate::model::{Outcome, PredictError, Predictor};

/// Prefix of every user-facing failure message
pub const ERROR_PREFIX: &str = "Error: Invalid input. ";

/// Result of one submission
pub type Prediction = Result<Outcome, PredictError>;

/// Validate the form and run the model
pub fn evaluate(predictor: &Predictor, form: &FormData) -> Prediction {
    let features = FeatureVector::from_form(form)?;
    predictor.predict(&features)
}

/// Text shown in the prediction slot
pub fn display(prediction: &Prediction) -> String {
    match prediction {
        Ok(outcome) => outcome.label().to_string(),
        Err(err) => format!("{ERROR_PREFIX}{err}"),
    }
}
