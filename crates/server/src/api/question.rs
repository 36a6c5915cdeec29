//! 问题 API 路由，包括问题之间的加分关联。

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;
use validator::Validate;
use vpmp_api_types::{
    BonusLinkResponse, CreateQuestionRequest, LinkDirectionParam, LinkQuestionRequest,
    LinkedQuestionsQuery, QuestionDetailResponse, QuestionListQuery, QuestionResponse,
    UpdateQuestionRequest,
};
use vpmp_core::domain::{CategoryId, PmpId, QuestionId, QuestionScore};

use super::error::ApiError;
use super::extract::{ApiPath, ApiQuery, ValidatedJson};
use super::state::AppState;
use crate::repository::{
    BonusLinkRecord, LinkDirection, NewBonusLink, NewQuestion, QuestionChanges, QuestionDetail,
    QuestionRecord,
};

/// 创建问题 API 路由。
pub fn create_question_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/pmp/{pmp_id}", get(list_questions_by_pmp))
        .route(
            "/questions/by-category/{category_id}",
            get(list_questions_by_category),
        )
        .route(
            "/questions/{id}",
            get(get_question)
                .patch(update_question)
                .delete(delete_question),
        )
        .route("/questions/{id}/linked-questions", get(list_linked_questions))
        .route("/questions/{id}/bonus-links", get(list_bonus_links))
        .route(
            "/questions/{id}/linked-questions/{linked_id}",
            post(add_linked_question).delete(remove_linked_question),
        )
}

impl From<QuestionRecord> for QuestionResponse {
    fn from(record: QuestionRecord) -> Self {
        Self {
            id: record.id,
            question_text: record.question_text,
            question_type: record.question_type,
            response: record.response,
            medical_picture_url: record.medical_picture_url,
            score: record.score,
            question_category_id: record.question_category_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl From<QuestionDetail> for QuestionDetailResponse {
    fn from(detail: QuestionDetail) -> Self {
        Self {
            question: detail.question.into(),
            linked_questions: detail.linked_questions.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<BonusLinkRecord> for BonusLinkResponse {
    fn from(record: BonusLinkRecord) -> Self {
        Self {
            id: record.id,
            source_question_id: record.source_question_id,
            target_question_id: record.target_question_id,
            bonus_type: record.bonus_type,
            bonus_value: record.bonus_value,
        }
    }
}

impl From<LinkDirectionParam> for LinkDirection {
    fn from(param: LinkDirectionParam) -> Self {
        match param {
            LinkDirectionParam::Outgoing => LinkDirection::Outgoing,
            LinkDirectionParam::Incoming => LinkDirection::Incoming,
            LinkDirectionParam::Both => LinkDirection::Both,
        }
    }
}

fn parse_score(score: f64) -> Result<QuestionScore, ApiError> {
    QuestionScore::new(score).map_err(|e| ApiError::validation(e.to_string()))
}

async fn create_question(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<CreateQuestionRequest>,
) -> Result<(StatusCode, Json<QuestionResponse>), ApiError> {
    let record = state
        .questions
        .create(NewQuestion {
            question_text: payload.question_text,
            question_type: payload.question_type,
            response: payload.response,
            medical_picture_url: payload.medical_picture_url,
            score: parse_score(payload.score)?,
            question_category_id: payload.question_category_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// 列出问题（含关联问题），可按 `categoryId` 过滤。
async fn list_questions(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<QuestionListQuery>,
) -> Result<Json<Vec<QuestionDetailResponse>>, ApiError> {
    let details = state.questions.find_all(query.category_id).await?;
    Ok(Json(details.into_iter().map(Into::into).collect()))
}

/// 列出某个 PMP 下所有分类的问题。
async fn list_questions_by_pmp(
    State(state): State<Arc<AppState>>,
    ApiPath(pmp_id): ApiPath<PmpId>,
) -> Result<Json<Vec<QuestionDetailResponse>>, ApiError> {
    let details = state.questions.find_by_pmp(pmp_id).await?;
    Ok(Json(details.into_iter().map(Into::into).collect()))
}

async fn list_questions_by_category(
    State(state): State<Arc<AppState>>,
    ApiPath(category_id): ApiPath<CategoryId>,
) -> Result<Json<Vec<QuestionDetailResponse>>, ApiError> {
    let details = state.questions.find_all(Some(category_id)).await?;
    Ok(Json(details.into_iter().map(Into::into).collect()))
}

async fn get_question(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<QuestionId>,
) -> Result<Json<QuestionDetailResponse>, ApiError> {
    let detail = state.questions.find_by_id(id).await?;
    Ok(Json(detail.into()))
}

async fn update_question(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<QuestionId>,
    ValidatedJson(payload): ValidatedJson<UpdateQuestionRequest>,
) -> Result<Json<QuestionDetailResponse>, ApiError> {
    let changes = QuestionChanges {
        question_text: payload.question_text,
        question_type: payload.question_type,
        response: payload.response,
        medical_picture_url: payload.medical_picture_url,
        score: payload.score.map(parse_score).transpose()?,
        question_category_id: payload.question_category_id,
    };
    let detail = state.questions.update(id, changes).await?;
    Ok(Json(detail.into()))
}

async fn delete_question(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<QuestionId>,
) -> Result<StatusCode, ApiError> {
    state.questions.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 按方向（outgoing / incoming / both）列出关联问题。
async fn list_linked_questions(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<QuestionId>,
    ApiQuery(query): ApiQuery<LinkedQuestionsQuery>,
) -> Result<Json<Vec<QuestionResponse>>, ApiError> {
    let records = state
        .questions
        .find_linked(id, query.direction.into())
        .await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

async fn list_bonus_links(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<QuestionId>,
) -> Result<Json<Vec<BonusLinkResponse>>, ApiError> {
    let links = state.questions.list_bonus_links(id).await?;
    Ok(Json(links.into_iter().map(Into::into).collect()))
}

/// 添加关联问题；请求体可选，缺省为 RELATED_TO_TOPIC 且加分为 0。
async fn add_linked_question(
    State(state): State<Arc<AppState>>,
    ApiPath((id, linked_id)): ApiPath<(QuestionId, QuestionId)>,
    payload: Result<Option<Json<LinkQuestionRequest>>, JsonRejection>,
) -> Result<Json<QuestionDetailResponse>, ApiError> {
    let request = payload?.map(|Json(request)| request).unwrap_or_default();
    request.validate()?;

    let defaults = NewBonusLink::default();
    let bonus = NewBonusLink {
        bonus_type: request.bonus_type.unwrap_or(defaults.bonus_type),
        bonus_value: request.bonus_value.unwrap_or(defaults.bonus_value),
    };

    let detail = state
        .questions
        .add_linked_question(id, linked_id, bonus)
        .await?;
    Ok(Json(detail.into()))
}

async fn remove_linked_question(
    State(state): State<Arc<AppState>>,
    ApiPath((id, linked_id)): ApiPath<(QuestionId, QuestionId)>,
) -> Result<Json<QuestionDetailResponse>, ApiError> {
    let detail = state
        .questions
        .remove_linked_question(id, linked_id)
        .await?;
    Ok(Json(detail.into()))
}
