//! API 错误类型。
//!
//! 将仓储层与提取器的错误统一转换为 `ErrorResponse` JSON。

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;
use validator::ValidationErrors;
use vpmp_api_types::ErrorResponse;

use crate::error::RepositoryError;

/// API 错误类型。
#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    pub code: &'static str,
    pub status: StatusCode,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: "VALIDATION_ERROR",
            status: StatusCode::BAD_REQUEST,
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: "INTERNAL_ERROR",
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        let message = err.to_string();
        match err {
            RepositoryError::NotFound { .. } => ApiError {
                message,
                code: "NOT_FOUND",
                status: StatusCode::NOT_FOUND,
            },
            RepositoryError::Conflict(_) => ApiError {
                message,
                code: "CONFLICT",
                status: StatusCode::CONFLICT,
            },
            RepositoryError::Validation(_) => ApiError::validation(message),
            RepositoryError::Corrupt(_)
            | RepositoryError::Password(_)
            | RepositoryError::Database(_) => {
                error!(error = %message, "repository operation failed");
                ApiError::internal("Internal server error")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError {
            message: rejection.body_text(),
            code: "INVALID_JSON",
            status: StatusCode::BAD_REQUEST,
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::validation(errors.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            code: self.code.to_string(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use crate::error::RepositoryError;
    use axum::http::StatusCode;

    #[test]
    fn repository_errors_map_to_status_codes() {
        let cases = [
            (
                RepositoryError::not_found("Classroom", "abc"),
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
            ),
            (
                RepositoryError::Conflict("Classroom already exists".into()),
                StatusCode::CONFLICT,
                "CONFLICT",
            ),
            (
                RepositoryError::Validation("bad".into()),
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                RepositoryError::Corrupt("bad code".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];

        for (err, status, code) in cases {
            let api_error = ApiError::from(err);
            assert_eq!(api_error.status, status);
            assert_eq!(api_error.code, code);
        }
    }

    #[test]
    fn not_found_message_names_entity_and_id() {
        let api_error = ApiError::from(RepositoryError::not_found("PMP", "42"));
        assert_eq!(api_error.message, "PMP with ID \"42\" not found");
    }

    #[test]
    fn internal_errors_hide_details() {
        let api_error = ApiError::from(RepositoryError::Corrupt("secret column".into()));
        assert!(!api_error.message.contains("secret"));
    }
}
