use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    #[default]
    NormalQuestion,
    AskForMedicalPicture,
}

impl QuestionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NormalQuestion => "NORMAL_QUESTION",
            Self::AskForMedicalPicture => "ASK_FOR_MEDICAL_PICTURE",
        }
    }

    /// Whether a question of this type has to carry a medical picture url.
    pub fn requires_medical_picture(self) -> bool {
        matches!(self, Self::AskForMedicalPicture)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NORMAL_QUESTION" => Ok(Self::NormalQuestion),
            "ASK_FOR_MEDICAL_PICTURE" => Ok(Self::AskForMedicalPicture),
            other => Err(DomainError::UnknownVariant {
                kind: "question type",
                value: other.to_string(),
            }),
        }
    }
}
