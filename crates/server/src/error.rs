use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{entity} with ID \"{id}\" not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("invalid data in database: {0}")]
    Corrupt(String),

    #[error("password hashing failed: {0}")]
    Password(String),

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl RepositoryError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Whether `err` is a unique-constraint violation reported by the driver.
    pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
        matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
    }

    pub(crate) fn is_foreign_key_violation(err: &DbErr) -> bool {
        matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
