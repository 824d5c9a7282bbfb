//! Validation errors for submitted feature values

use thiserror::Error;

/// A submitted field could not be turned into a usable number.
///
/// Display strings match what users of the form have always seen.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Continuous field is not a number
    #[error("could not convert string to float: '{raw}'")]
    Coercion { field: &'static str, raw: String },

    /// Continuous field is outside its inclusive bound
    #[error("{field} must be between {min} and {max}")]
    Range {
        field: &'static str,
        min: f64,
        max: f64,
    },
}

impl ValidationError {
    /// Name of the offending field
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Coercion { field, .. } | Self::Range { field, .. } => field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_message_prints_bounds_as_configured() {
        let err = ValidationError::Range {
            field: "serum_creatinine",
            min: 0.1,
            max: 10.0,
        };
        assert_eq!(err.to_string(), "serum_creatinine must be between 0.1 and 10");

        let err = ValidationError::Range {
            field: "age",
            min: 18.0,
            max: 120.0,
        };
        assert_eq!(err.to_string(), "age must be between 18 and 120");
    }

    #[test]
    fn test_coercion_message() {
        let err = ValidationError::Coercion {
            field: "age",
            raw: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "could not convert string to float: 'abc'");
        assert_eq!(err.field(), "age");
    }
}
