//! Feature module
//!
//! Turns a submitted form into the ordered numeric row the model expects:
//! - Binary coercion (`"1"`, `"Yes"`, `"Male"` -> 1.0, anything else -> 0.0)
//! - Continuous coercion and inclusive range checks
//! - Access to the continuous subset for scaling

mod error;
mod schema;

pub use error::ValidationError;
pub use schema::{
    continuous_indices, Feature, FeatureKind, ValidRange, CONTINUOUS_COUNT, FEATURES,
    FEATURE_COUNT,
};

use crate::http::FormData;

/// Raw values accepted as "true" for binary fields
pub const BINARY_TRUE_VALUES: [&str; 3] = ["1", "Yes", "Male"];

/// Text substituted for a field that was not submitted at all
pub const MISSING_VALUE: &str = "None";

/// Map a binary field's raw value to 0.0/1.0.
///
/// Unrecognised values fall through to 0.0 rather than failing; the form
/// has always behaved this way and clients may depend on it.
pub fn coerce_binary(raw: &str) -> f64 {
    if BINARY_TRUE_VALUES.contains(&raw) {
        1.0
    } else {
        0.0
    }
}

/// Parse a continuous field's raw value
pub fn coerce_continuous(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::Coercion {
            field,
            raw: raw.to_string(),
        })
}

/// Reject values outside the feature's inclusive range
pub fn check_range(feature: &Feature, value: f64) -> Result<(), ValidationError> {
    match feature.range {
        Some(range) if !range.contains(value) => Err(ValidationError::Range {
            field: feature.name,
            min: range.min,
            max: range.max,
        }),
        _ => Ok(()),
    }
}

/// Coerce and validate a single field
pub fn coerce_feature(feature: &Feature, raw: Option<&str>) -> Result<f64, ValidationError> {
    let raw = raw.unwrap_or(MISSING_VALUE);
    let value = match feature.kind {
        FeatureKind::Binary => coerce_binary(raw),
        FeatureKind::Continuous => coerce_continuous(feature.name, raw)?,
    };
    check_range(feature, value)?;
    Ok(value)
}

/// One request's worth of feature values, in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Build from a submitted form, stopping at the first invalid field
    pub fn from_form(form: &FormData) -> Result<Self, ValidationError> {
        let mut values = [0.0; FEATURE_COUNT];
        for (slot, feature) in values.iter_mut().zip(FEATURES.iter()) {
            *slot = coerce_feature(feature, form.get(feature.name))?;
        }
        Ok(Self { values })
    }

    #[cfg(test)]
    pub const fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub const fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Continuous columns in schema order
    pub fn continuous(&self) -> Vec<f64> {
        continuous_indices().map(|i| self.values[i]).collect()
    }

    /// Write scaled continuous values back into their columns
    pub fn set_continuous(&mut self, scaled: &[f64]) {
        for (i, value) in continuous_indices().zip(scaled) {
            self.values[i] = *value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::schema::continuous_features;
    use super::*;

    fn valid_form() -> FormData {
        FormData::from_pairs([
            ("age", "60"),
            ("anaemia", "Yes"),
            ("creatinine_phosphokinase", "500"),
            ("diabetes", "No"),
            ("ejection_fraction", "38"),
            ("high_blood_pressure", "No"),
            ("platelets", "260"),
            ("serum_creatinine", "1.1"),
            ("serum_sodium", "137"),
            ("sex", "Male"),
            ("smoking", "No"),
            ("time", "115"),
        ])
    }

    #[test]
    fn test_binary_true_values() {
        for raw in BINARY_TRUE_VALUES {
            assert!((coerce_binary(raw) - 1.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_binary_catch_all_is_zero() {
        for raw in ["0", "No", "", "yes", "male", "Female", "true", "None"] {
            assert!(coerce_binary(raw).abs() < f64::EPSILON, "{raw:?}");
        }
    }

    #[test]
    fn test_valid_form_builds_ordered_vector() {
        let vector = FeatureVector::from_form(&valid_form()).unwrap();
        assert_eq!(
            vector.values(),
            &[60.0, 1.0, 500.0, 0.0, 38.0, 0.0, 260.0, 1.1, 137.0, 1.0, 0.0, 115.0]
        );
        assert_eq!(
            vector.continuous(),
            vec![60.0, 500.0, 38.0, 260.0, 1.1, 137.0, 115.0]
        );
    }

    #[test]
    fn test_boundaries_are_inclusive_for_every_continuous_field() {
        for feature in continuous_features() {
            let range = feature.range.unwrap();
            for edge in [range.min, range.max] {
                let mut form = valid_form();
                form.set(feature.name, &edge.to_string());
                assert!(
                    FeatureVector::from_form(&form).is_ok(),
                    "{} rejected {edge}",
                    feature.name
                );
            }
        }
    }

    #[test]
    fn test_just_outside_bounds_is_range_error() {
        let eps = 1e-6;
        for feature in continuous_features() {
            let range = feature.range.unwrap();
            for outside in [range.min - eps, range.max + eps] {
                let mut form = valid_form();
                form.set(feature.name, &outside.to_string());
                let err = FeatureVector::from_form(&form).unwrap_err();
                assert_eq!(
                    err,
                    ValidationError::Range {
                        field: feature.name,
                        min: range.min,
                        max: range.max,
                    }
                );
                let message = err.to_string();
                assert!(message.contains(feature.name));
                assert!(message.contains(&range.min.to_string()));
                assert!(message.contains(&range.max.to_string()));
            }
        }
    }

    #[test]
    fn test_non_numeric_continuous_is_coercion_error() {
        let mut form = valid_form();
        form.set("ejection_fraction", "forty");
        assert_eq!(
            FeatureVector::from_form(&form).unwrap_err(),
            ValidationError::Coercion {
                field: "ejection_fraction",
                raw: "forty".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_continuous_reads_as_none() {
        let mut form = valid_form();
        form.remove("time");
        let err = FeatureVector::from_form(&form).unwrap_err();
        assert_eq!(err.to_string(), "could not convert string to float: 'None'");
    }

    #[test]
    fn test_missing_binary_is_zero() {
        let mut form = valid_form();
        form.remove("sex");
        let vector = FeatureVector::from_form(&form).unwrap();
        // sex is column 9
        assert!(vector.values()[9].abs() < f64::EPSILON);
    }

    #[test]
    fn test_nan_fails_range_check() {
        let mut form = valid_form();
        form.set("age", "nan");
        assert!(matches!(
            FeatureVector::from_form(&form),
            Err(ValidationError::Range { field: "age", .. })
        ));
    }

    #[test]
    fn test_first_failing_field_wins() {
        let mut form = valid_form();
        form.set("age", "10");
        form.set("time", "abc");
        assert_eq!(FeatureVector::from_form(&form).unwrap_err().field(), "age");
    }

    #[test]
    fn test_set_continuous_leaves_binary_columns() {
        let mut vector = FeatureVector::from_form(&valid_form()).unwrap();
        vector.set_continuous(&[0.0; CONTINUOUS_COUNT]);
        assert_eq!(
            vector.values(),
            &[0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0]
        );
    }
}
