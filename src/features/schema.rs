//! Feature schema and valid range table
//!
//! The order of `FEATURES` is the column order the classifier and scaler
//! were trained on. Changing it silently corrupts every prediction.

/// How a submitted value is turned into a number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Yes/no field encoded as 0.0 or 1.0
    Binary,
    /// Real-valued field, scaled before prediction
    Continuous,
}

/// Inclusive numeric bound for a continuous field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidRange {
    pub min: f64,
    pub max: f64,
}

impl ValidRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Both ends are accepted
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// One column of the feature schema
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feature {
    pub name: &'static str,
    pub kind: FeatureKind,
    pub range: Option<ValidRange>,
    /// Short hint shown next to the input on the form
    pub hint: &'static str,
}

impl Feature {
    const fn binary(name: &'static str, hint: &'static str) -> Self {
        Self {
            name,
            kind: FeatureKind::Binary,
            range: None,
            hint,
        }
    }

    const fn continuous(name: &'static str, min: f64, max: f64, hint: &'static str) -> Self {
        Self {
            name,
            kind: FeatureKind::Continuous,
            range: Some(ValidRange::new(min, max)),
            hint,
        }
    }

    /// Human readable label, e.g. `serum_sodium` -> `Serum sodium`
    pub fn label(&self) -> String {
        let spaced = self.name.replace('_', " ");
        let mut chars = spaced.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Number of columns in a feature vector
pub const FEATURE_COUNT: usize = 12;

/// Number of continuous columns seen by the scaler
pub const CONTINUOUS_COUNT: usize = 7;

/// Full schema in training order.
///
/// `platelets` is bounded to 100..=500, which reads as kiloplatelets/mL.
/// The bound is kept as deployed even though raw platelet counts are
/// usually reported per µL.
pub static FEATURES: [Feature; FEATURE_COUNT] = [
    Feature::continuous("age", 18.0, 120.0, "years"),
    Feature::binary("anaemia", "decrease of red blood cells"),
    Feature::continuous("creatinine_phosphokinase", 10.0, 10000.0, "mcg/L"),
    Feature::binary("diabetes", "patient has diabetes"),
    Feature::continuous("ejection_fraction", 10.0, 80.0, "%"),
    Feature::binary("high_blood_pressure", "patient has hypertension"),
    Feature::continuous("platelets", 100.0, 500.0, "kiloplatelets/mL"),
    Feature::continuous("serum_creatinine", 0.1, 10.0, "mg/dL"),
    Feature::continuous("serum_sodium", 100.0, 160.0, "mEq/L"),
    Feature::binary("sex", "Male or Female"),
    Feature::binary("smoking", "patient smokes"),
    Feature::continuous("time", 1.0, 365.0, "follow-up period, days"),
];

/// Continuous features in schema order
#[cfg(test)]
pub fn continuous_features() -> impl Iterator<Item = &'static Feature> {
    FEATURES.iter().filter(|f| f.kind == FeatureKind::Continuous)
}

/// Schema positions of the continuous columns
pub fn continuous_indices() -> impl Iterator<Item = usize> {
    FEATURES
        .iter()
        .enumerate()
        .filter(|(_, f)| f.kind == FeatureKind::Continuous)
        .map(|(i, _)| i)
}
