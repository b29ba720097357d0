use serde::{Deserialize, Serialize};

use crate::error::{codes, AppError};

/// Minimum cosine similarity for a fragment/source pair to count as evidence.
///
/// Always in (0, 1]. 0.70 and 0.75 are both used in practice, so the value is carried as
/// configuration rather than baked into the selector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
#[serde(try_from = "f32", into = "f32")]
pub struct Threshold(f32);

impl Threshold {
    pub const DEFAULT: f32 = 0.70;

    pub fn new(value: f32) -> Result<Self, AppError> {
        if !value.is_finite() || value <= 0.0 || value > 1.0 {
            return Err(AppError::new(
                codes::CONFIG_INVALID,
                "Similarity threshold must be within (0, 1]",
            )
            .with_details(format!("threshold={value}")));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<f32> for Threshold {
    type Error = AppError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Threshold> for f32 {
    fn from(t: Threshold) -> Self {
        t.0
    }
}

/// Knobs of the scoring engine itself (network-free).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    pub threshold: Threshold,
    /// How many leading characters of the input are sent as the search query.
    pub query_max_chars: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            threshold: Threshold::default(),
            query_max_chars: 200,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        Threshold::new(self.threshold.value())?;
        if self.query_max_chars == 0 {
            return Err(AppError::new(
                codes::CONFIG_INVALID,
                "scoring.query_max_chars must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_rejects_out_of_range_values() {
        assert!(Threshold::new(0.75).is_ok());
        assert!(Threshold::new(1.0).is_ok());
        for bad in [0.0, -0.1, 1.01, f32::NAN, f32::INFINITY] {
            let err = Threshold::new(bad).expect_err("should reject");
            assert_eq!(err.code, codes::CONFIG_INVALID);
        }
    }

    #[test]
    fn threshold_deserializes_through_validation() {
        let ok: ScoringConfig = serde_json::from_str(r#"{"threshold":0.75}"#).expect("parse");
        assert_eq!(ok.threshold.value(), 0.75);
        assert_eq!(ok.query_max_chars, 200);

        let bad = serde_json::from_str::<ScoringConfig>(r#"{"threshold":1.5}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn default_threshold_is_point_seven() {
        assert_eq!(ScoringConfig::default().threshold.value(), 0.70);
    }
}
