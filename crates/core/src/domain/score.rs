use serde::{Deserialize, Serialize};

use super::DomainError;

/// Points awarded for asking a question. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct QuestionScore(f64);

impl QuestionScore {
    pub const ZERO: Self = Self(0.0);

    pub fn new(value: f64) -> Result<Self, DomainError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidScore(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for QuestionScore {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<QuestionScore> for f64 {
    fn from(value: QuestionScore) -> Self {
        value.value()
    }
}

#[cfg(test)]
mod tests {
    use super::QuestionScore;

    #[test]
    fn fractional_score_is_accepted() {
        let score = QuestionScore::new(2.5).expect("2.5 should be valid");

        assert_eq!(score.value(), 2.5);
    }

    #[test]
    fn negative_score_is_rejected() {
        let err = QuestionScore::new(-1.0).expect_err("-1 should be rejected");

        assert_eq!(
            err.to_string(),
            "invalid score: -1. score must be a finite number >= 0"
        );
    }

    #[test]
    fn nan_is_rejected() {
        assert!(QuestionScore::new(f64::NAN).is_err());
    }

    #[test]
    fn deserializing_negative_score_fails() {
        let result: Result<QuestionScore, _> = serde_json::from_str("-3.0");
        assert!(result.is_err());
    }
}
