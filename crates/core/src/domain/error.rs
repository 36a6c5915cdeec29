use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("invalid score: {0}. score must be a finite number >= 0")]
    InvalidScore(f64),

    #[error("unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}
