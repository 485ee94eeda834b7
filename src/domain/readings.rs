//! Vital-sign readings captured during a patient visit.
//!
//! Based on the 13-attribute heart-disease intake schema (UCI Cleveland).

use serde::{Deserialize, Serialize};

/// A single captured value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadingValue {
    /// Whole-number reading (counts, codes, mmHg, bpm)
    Integer(i64),
    /// Real-valued reading, e.g. ST depression
    Decimal(f64),
    /// Categorical reading kept as text
    Category(String),
}

impl std::fmt::Display for ReadingValue {
    /// Decimals always carry a fractional part (`1.0`, not `1`), so the
    /// flattened text of a reading does not depend on its magnitude.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Decimal(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Category(v) => f.write_str(v),
        }
    }
}

impl From<i64> for ReadingValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for ReadingValue {
    fn from(v: f64) -> Self {
        Self::Decimal(v)
    }
}

impl From<&str> for ReadingValue {
    fn from(v: &str) -> Self {
        Self::Category(v.to_string())
    }
}

/// Ordered mapping from field name to value.
///
/// Order is significant: the encoder concatenates values in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadingSet {
    fields: Vec<(String, ReadingValue)>,
}

impl ReadingSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, keeping insertion order.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ReadingValue>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<ReadingValue>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Look up a field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ReadingValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReadingValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Concatenate the textual form of every value in field order.
    #[must_use]
    pub fn flatten(&self) -> String {
        self.fields
            .iter()
            .map(|(_, value)| value.to_string())
            .collect()
    }
}

/// Field names of the intake schema, in capture order.
pub const FIELD_NAMES: [&str; 13] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// Vital signs read from the unit's sensors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
    /// Age in years
    pub age: i64,
    /// 0 = female, 1 = male
    pub sex: i64,
    /// Chest pain type (0-3)
    pub cp: i64,
    /// Resting blood pressure in mmHg
    pub trestbps: i64,
    /// Serum cholesterol in mg/dL
    pub chol: i64,
    /// Fasting blood sugar > 120 mg/dL (0/1)
    pub fbs: i64,
    /// Resting ECG result (0-2)
    pub restecg: i64,
    /// Maximum heart rate achieved (bpm)
    pub thalach: i64,
    /// Exercise-induced angina (0/1)
    pub exang: i64,
    /// ST depression induced by exercise
    pub oldpeak: f64,
    /// Slope of the peak exercise ST segment (0-2)
    pub slope: i64,
    /// Number of major vessels colored by fluoroscopy (0-4)
    pub ca: i64,
    /// Thalassemia code (0-3)
    pub thal: i64,
}

impl VitalSigns {
    /// Convert to a reading set in `FIELD_NAMES` order.
    #[must_use]
    pub fn to_reading_set(&self) -> ReadingSet {
        let values: [ReadingValue; 13] = [
            self.age.into(),
            self.sex.into(),
            self.cp.into(),
            self.trestbps.into(),
            self.chol.into(),
            self.fbs.into(),
            self.restecg.into(),
            self.thalach.into(),
            self.exang.into(),
            self.oldpeak.into(),
            self.slope.into(),
            self.ca.into(),
            self.thal.into(),
        ];

        let mut set = ReadingSet::new();
        for (name, value) in FIELD_NAMES.into_iter().zip(values) {
            set.push(name, value);
        }
        set
    }

    /// Check readings against plausible physiological ranges.
    ///
    /// Advisory only: sensors are trusted, violations are reported as warnings.
    ///
    /// # Errors
    /// Returns every violation found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let mut check = |name: &str, value: i64, range: std::ops::RangeInclusive<i64>| {
            if !range.contains(&value) {
                errors.push(format!(
                    "{name} {value} out of range [{}, {}]",
                    range.start(),
                    range.end()
                ));
            }
        };

        check("age", self.age, 0..=120);
        check("sex", self.sex, 0..=1);
        check("cp", self.cp, 0..=3);
        check("trestbps", self.trestbps, 50..=250);
        check("chol", self.chol, 80..=600);
        check("fbs", self.fbs, 0..=1);
        check("restecg", self.restecg, 0..=2);
        check("thalach", self.thalach, 40..=240);
        check("exang", self.exang, 0..=1);
        check("slope", self.slope, 0..=2);
        check("ca", self.ca, 0..=4);
        check("thal", self.thal, 0..=3);

        if !(0.0..=10.0).contains(&self.oldpeak) {
            errors.push(format!("oldpeak {} out of range [0, 10]", self.oldpeak));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> VitalSigns {
        VitalSigns {
            age: 52,
            sex: 1,
            cp: 0,
            trestbps: 125,
            chol: 212,
            fbs: 0,
            restecg: 1,
            thalach: 168,
            exang: 0,
            oldpeak: 1.0,
            slope: 2,
            ca: 2,
            thal: 3,
        }
    }

    #[test]
    fn test_decimal_keeps_fraction() {
        assert_eq!(ReadingValue::Decimal(1.0).to_string(), "1.0");
        assert_eq!(ReadingValue::Decimal(2.3).to_string(), "2.3");
        assert_eq!(ReadingValue::Integer(-4).to_string(), "-4");
        assert_eq!(ReadingValue::from("typical").to_string(), "typical");
    }

    #[test]
    fn test_reading_set_preserves_order() {
        let set = ReadingSet::new().with("sex", 1_i64).with("age", 52_i64);
        let names: Vec<&str> = set.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["sex", "age"]);
        assert_eq!(set.flatten(), "152");
        assert_eq!(set.get("age"), Some(&ReadingValue::Integer(52)));
        assert!(set.get("chol").is_none());
    }

    #[test]
    fn test_vitals_flatten_in_schema_order() {
        let set = reference().to_reading_set();
        assert_eq!(set.len(), FIELD_NAMES.len());
        assert_eq!(set.flatten(), "52101252120116801.0223");
    }

    #[test]
    fn test_validation() {
        assert!(reference().validate().is_ok());

        let bad = VitalSigns {
            sex: 2,
            trestbps: 400,
            oldpeak: -1.0,
            ..reference()
        };
        let errors = bad.validate().expect_err("should flag violations");
        assert_eq!(errors.len(), 3);
    }
}
