//! PMP（病例）API 路由。

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use std::sync::Arc;
use vpmp_api_types::{
    CreatePmpRequest, PmpDetailResponse, PmpListQuery, PmpResponse, UpdatePmpRequest,
};
use vpmp_core::domain::PmpId;

use super::error::ApiError;
use super::extract::{ApiPath, ApiQuery, ValidatedJson};
use super::state::AppState;
use crate::repository::{NewPmp, PmpChanges, PmpDetail, PmpRecord};

/// 创建 PMP API 路由。
pub fn create_pmp_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/pmp", get(list_pmps).post(create_pmp))
        .route(
            "/pmp/{id}",
            get(get_pmp).patch(update_pmp).delete(delete_pmp),
        )
}

impl From<PmpRecord> for PmpResponse {
    fn from(record: PmpRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            annonce_of_the_problem: record.annonce_of_the_problem,
            professor_id: record.professor_id,
            classroom_id: record.classroom_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl From<PmpDetail> for PmpDetailResponse {
    fn from(detail: PmpDetail) -> Self {
        Self {
            pmp: detail.pmp.into(),
            classroom: detail.classroom.into(),
            categories: detail.categories.into_iter().map(Into::into).collect(),
        }
    }
}

async fn create_pmp(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<CreatePmpRequest>,
) -> Result<(StatusCode, Json<PmpResponse>), ApiError> {
    let record = state
        .pmps
        .create(NewPmp {
            title: payload.title,
            description: payload.description,
            annonce_of_the_problem: payload.annonce_of_the_problem,
            classroom_id: payload.classroom_id,
            professor_id: payload.professor_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// 列出 PMP，可按 `classroomId` 过滤。
async fn list_pmps(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<PmpListQuery>,
) -> Result<Json<Vec<PmpResponse>>, ApiError> {
    let records = state.pmps.find_all(query.classroom_id).await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// 获取 PMP 及其班级、分类和问题。
async fn get_pmp(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<PmpId>,
) -> Result<Json<PmpDetailResponse>, ApiError> {
    let detail = state.pmps.find_by_id(id).await?;
    Ok(Json(detail.into()))
}

async fn update_pmp(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<PmpId>,
    ValidatedJson(payload): ValidatedJson<UpdatePmpRequest>,
) -> Result<Json<PmpResponse>, ApiError> {
    let record = state
        .pmps
        .update(
            id,
            PmpChanges {
                title: payload.title,
                description: payload.description,
                annonce_of_the_problem: payload.annonce_of_the_problem,
                classroom_id: payload.classroom_id,
                professor_id: payload.professor_id,
            },
        )
        .await?;
    Ok(Json(record.into()))
}

async fn delete_pmp(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<PmpId>,
) -> Result<StatusCode, ApiError> {
    state.pmps.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
