//! 班级 API 路由。

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use std::sync::Arc;
use vpmp_api_types::{ClassroomResponse, CreateClassroomRequest, UpdateClassroomRequest};
use vpmp_core::domain::ClassroomId;

use super::error::ApiError;
use super::extract::{ApiPath, ValidatedJson};
use super::state::AppState;
use crate::repository::{ClassroomChanges, ClassroomRecord, NewClassroom};

/// 创建班级 API 路由。
pub fn create_classroom_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/classrooms", get(list_classrooms).post(create_classroom))
        .route(
            "/classrooms/{id}",
            get(get_classroom)
                .put(update_classroom)
                .delete(delete_classroom),
        )
}

impl From<ClassroomRecord> for ClassroomResponse {
    fn from(record: ClassroomRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            grade: record.grade,
            major: record.major,
            description: record.description,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

async fn create_classroom(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<CreateClassroomRequest>,
) -> Result<(StatusCode, Json<ClassroomResponse>), ApiError> {
    let record = state
        .classrooms
        .create(NewClassroom {
            name: payload.name,
            grade: payload.grade,
            major: payload.major,
            description: payload.description,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

async fn list_classrooms(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ClassroomResponse>>, ApiError> {
    let records = state.classrooms.find_all().await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

async fn get_classroom(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<ClassroomId>,
) -> Result<Json<ClassroomResponse>, ApiError> {
    let record = state.classrooms.find_by_id(id).await?;
    Ok(Json(record.into()))
}

async fn update_classroom(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<ClassroomId>,
    ValidatedJson(payload): ValidatedJson<UpdateClassroomRequest>,
) -> Result<Json<ClassroomResponse>, ApiError> {
    let record = state
        .classrooms
        .update(
            id,
            ClassroomChanges {
                name: payload.name,
                grade: payload.grade,
                major: payload.major,
                description: payload.description,
            },
        )
        .await?;
    Ok(Json(record.into()))
}

async fn delete_classroom(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<ClassroomId>,
) -> Result<StatusCode, ApiError> {
    state.classrooms.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
