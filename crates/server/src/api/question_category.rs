//! 问题分类 API 路由。

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use std::sync::Arc;
use vpmp_api_types::{
    CreateQuestionCategoryRequest, QuestionCategoryDetailResponse, QuestionCategoryListQuery,
    QuestionCategoryResponse, UpdateQuestionCategoryRequest,
};
use vpmp_core::domain::CategoryId;

use super::error::ApiError;
use super::extract::{ApiPath, ApiQuery, ValidatedJson};
use super::state::AppState;
use crate::repository::{CategoryChanges, CategoryDetail, CategoryRecord, NewCategory};

/// 创建问题分类 API 路由。
pub fn create_question_category_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/question-categories",
            get(list_categories).post(create_category),
        )
        .route(
            "/question-categories/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
}

impl From<CategoryRecord> for QuestionCategoryResponse {
    fn from(record: CategoryRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            pmp_id: record.pmp_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl From<CategoryDetail> for QuestionCategoryDetailResponse {
    fn from(detail: CategoryDetail) -> Self {
        Self {
            category: detail.category.into(),
            questions: detail.questions.into_iter().map(Into::into).collect(),
        }
    }
}

async fn create_category(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<CreateQuestionCategoryRequest>,
) -> Result<(StatusCode, Json<QuestionCategoryResponse>), ApiError> {
    let record = state
        .categories
        .create(NewCategory {
            name: payload.name,
            pmp_id: payload.pmp_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// 列出分类及其问题，可按 `pmpId` 过滤。
async fn list_categories(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<QuestionCategoryListQuery>,
) -> Result<Json<Vec<QuestionCategoryDetailResponse>>, ApiError> {
    let details = state.categories.find_all(query.pmp_id).await?;
    Ok(Json(details.into_iter().map(Into::into).collect()))
}

async fn get_category(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<CategoryId>,
) -> Result<Json<QuestionCategoryDetailResponse>, ApiError> {
    let detail = state.categories.find_by_id(id).await?;
    Ok(Json(detail.into()))
}

async fn update_category(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<CategoryId>,
    ValidatedJson(payload): ValidatedJson<UpdateQuestionCategoryRequest>,
) -> Result<Json<QuestionCategoryResponse>, ApiError> {
    let record = state
        .categories
        .update(
            id,
            CategoryChanges {
                name: payload.name,
                pmp_id: payload.pmp_id,
            },
        )
        .await?;
    Ok(Json(record.into()))
}

async fn delete_category(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<CategoryId>,
) -> Result<StatusCode, ApiError> {
    state.categories.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
