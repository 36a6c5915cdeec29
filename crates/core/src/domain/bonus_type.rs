use serde::{Deserialize, Serialize};

/// How a bonus link relates its source question to its target question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BonusType {
    LinkedToPreviousResponse,
    LinkedToNextResponse,
    #[default]
    RelatedToTopic,
}
