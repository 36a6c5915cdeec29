//! 用户注册 API 路由。

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use std::sync::Arc;
use vpmp_api_types::{RegisterUserRequest, UserResponse};
use vpmp_core::domain::UserRole;

use super::error::ApiError;
use super::extract::ValidatedJson;
use super::state::AppState;
use crate::repository::{NewUser, UserRecord};

/// 创建用户 API 路由。
pub fn create_user_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/user/register", post(register_student))
        .route("/user/register-professor", post(register_professor))
}

impl From<UserRecord> for UserResponse {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            role: record.role,
            created_at: record.created_at,
        }
    }
}

async fn register_student(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    register(&state, payload, UserRole::Student).await
}

async fn register_professor(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    register(&state, payload, UserRole::Professor).await
}

async fn register(
    state: &AppState,
    payload: RegisterUserRequest,
    role: UserRole,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let record = state
        .users
        .register(
            NewUser {
                name: payload.name,
                email: payload.email,
                password: payload.password,
            },
            role,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}
