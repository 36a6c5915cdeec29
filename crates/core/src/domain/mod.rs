mod bonus_type;
mod error;
mod ids;
mod question_type;
mod score;
mod user_role;

pub use bonus_type::BonusType;
pub use error::DomainError;
pub use ids::{BonusLinkId, CategoryId, ClassroomId, PmpId, QuestionId, UserId};
pub use question_type::QuestionType;
pub use score::QuestionScore;
pub use user_role::UserRole;
