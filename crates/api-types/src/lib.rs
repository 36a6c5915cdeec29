//! Shared request/response types used by API-facing crates.
//!
//! Field names follow the JSON shape the dashboard and the student client
//! consume (camelCase). Request types carry field-level validation rules.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;
use vpmp_core::consultation::{CategorySummary, ConsultationQuestion, PmpSummary};
use vpmp_core::domain::{
    BonusLinkId, BonusType, CategoryId, ClassroomId, PmpId, QuestionId, QuestionScore,
    QuestionType, UserId, UserRole,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
}

impl HealthCheckResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

// Classrooms

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassroomRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub grade: i32,
    #[validate(length(min = 1, message = "major must not be empty"))]
    pub major: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClassroomRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub grade: Option<i32>,
    #[validate(length(min = 1, message = "major must not be empty"))]
    pub major: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassroomResponse {
    pub id: ClassroomId,
    pub name: String,
    pub grade: i32,
    pub major: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// PMPs

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePmpRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    #[validate(length(min = 1, message = "annonceOfTheProblem must not be empty"))]
    pub annonce_of_the_problem: String,
    pub classroom_id: ClassroomId,
    pub professor_id: Option<UserId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePmpRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "annonceOfTheProblem must not be empty"))]
    pub annonce_of_the_problem: Option<String>,
    pub classroom_id: Option<ClassroomId>,
    pub professor_id: Option<UserId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PmpResponse {
    pub id: PmpId,
    pub title: String,
    pub description: String,
    pub annonce_of_the_problem: String,
    pub professor_id: Option<UserId>,
    pub classroom_id: ClassroomId,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A PMP with its classroom and its full category/question tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PmpDetailResponse {
    #[serde(flatten)]
    pub pmp: PmpResponse,
    pub classroom: ClassroomResponse,
    pub categories: Vec<QuestionCategoryDetailResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PmpListQuery {
    pub classroom_id: Option<ClassroomId>,
}

// Question categories

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionCategoryRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub pmp_id: PmpId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestionCategoryRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub pmp_id: Option<PmpId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionCategoryResponse {
    pub id: CategoryId,
    pub name: String,
    pub pmp_id: PmpId,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionCategoryDetailResponse {
    #[serde(flatten)]
    pub category: QuestionCategoryResponse,
    pub questions: Vec<QuestionResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionCategoryListQuery {
    pub pmp_id: Option<PmpId>,
}

// Questions

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, message = "questionText must not be empty"))]
    pub question_text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[validate(length(min = 1, message = "response must not be empty"))]
    pub response: String,
    #[validate(length(min = 1, message = "medicalPictureUrl must not be empty"))]
    pub medical_picture_url: Option<String>,
    #[validate(range(min = 0.0, message = "score must be >= 0"))]
    pub score: f64,
    pub question_category_id: CategoryId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, message = "questionText must not be empty"))]
    pub question_text: Option<String>,
    #[serde(rename = "type")]
    pub question_type: Option<QuestionType>,
    #[validate(length(min = 1, message = "response must not be empty"))]
    pub response: Option<String>,
    /// `null` clears the picture, an absent field keeps it.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[allow(clippy::option_option)]
    #[validate(length(min = 1, message = "medicalPictureUrl must not be empty"))]
    pub medical_picture_url: Option<Option<String>>,
    #[validate(range(min = 0.0, message = "score must be >= 0"))]
    pub score: Option<f64>,
    pub question_category_id: Option<CategoryId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub id: QuestionId,
    pub question_text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub response: String,
    pub medical_picture_url: Option<String>,
    pub score: QuestionScore,
    pub question_category_id: CategoryId,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDetailResponse {
    #[serde(flatten)]
    pub question: QuestionResponse,
    pub linked_questions: Vec<QuestionResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionListQuery {
    pub category_id: Option<CategoryId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkDirectionParam {
    #[default]
    Outgoing,
    Incoming,
    Both,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkedQuestionsQuery {
    #[serde(default)]
    pub direction: LinkDirectionParam,
}

/// Optional body of `POST /questions/{id}/linked-questions/{linkedId}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LinkQuestionRequest {
    pub bonus_type: Option<BonusType>,
    pub bonus_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusLinkResponse {
    pub id: BonusLinkId,
    pub source_question_id: QuestionId,
    pub target_question_id: QuestionId,
    pub bonus_type: BonusType,
    pub bonus_value: f64,
}

// Users

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: NaiveDateTime,
}

// Consultation inputs built from fetched content.

impl From<PmpResponse> for PmpSummary {
    fn from(pmp: PmpResponse) -> Self {
        Self {
            id: pmp.id,
            title: pmp.title,
            annonce_of_the_problem: pmp.annonce_of_the_problem,
        }
    }
}

impl From<QuestionCategoryResponse> for CategorySummary {
    fn from(category: QuestionCategoryResponse) -> Self {
        Self {
            id: category.id,
            name: category.name,
            pmp_id: category.pmp_id,
        }
    }
}

impl From<QuestionResponse> for ConsultationQuestion {
    fn from(question: QuestionResponse) -> Self {
        Self {
            id: question.id,
            question_text: question.question_text,
            question_type: question.question_type,
            response: question.response,
            medical_picture_url: question.medical_picture_url,
            score: question.score,
            question_category_id: question.question_category_id,
        }
    }
}

impl From<QuestionDetailResponse> for ConsultationQuestion {
    fn from(detail: QuestionDetailResponse) -> Self {
        detail.question.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_check_ok_payload() {
        let response = HealthCheckResponse::ok();
        assert_eq!(response.status, "ok");
    }

    #[test]
    fn create_question_uses_wire_field_names() {
        let request: CreateQuestionRequest = serde_json::from_str(
            r#"{
                "questionText": "Describe the pain",
                "type": "ASK_FOR_MEDICAL_PICTURE",
                "response": "See the image",
                "medicalPictureUrl": "https://img.example/xray.png",
                "score": 2.5,
                "questionCategoryId": "123e4567-e89b-12d3-a456-426614174000"
            }"#,
        )
        .expect("deserialize create question request");

        assert_eq!(request.question_type, QuestionType::AskForMedicalPicture);
        assert_eq!(request.score, 2.5);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn malformed_uuid_is_rejected_at_deserialization() {
        let result: Result<CreateQuestionCategoryRequest, _> =
            serde_json::from_str(r#"{"name": "History", "pmpId": "42"}"#);

        assert!(result.is_err());
    }

    #[test]
    fn empty_and_negative_fields_fail_validation() {
        let request = CreateQuestionRequest {
            question_text: String::new(),
            question_type: QuestionType::NormalQuestion,
            response: "ok".to_string(),
            medical_picture_url: None,
            score: -1.0,
            question_category_id: CategoryId::new(),
        };

        let errors = request.validate().expect_err("request should be invalid");
        let fields = errors.field_errors();
        assert!(fields.contains_key("question_text"));
        assert!(fields.contains_key("score"));
    }

    #[test]
    fn partial_update_accepts_empty_body() {
        let request: UpdatePmpRequest = serde_json::from_str("{}").expect("empty patch");

        assert!(request.title.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn question_update_distinguishes_null_from_absent_picture() {
        let absent: UpdateQuestionRequest = serde_json::from_str("{}").expect("empty patch");
        let cleared: UpdateQuestionRequest =
            serde_json::from_str(r#"{"medicalPictureUrl": null}"#).expect("null picture");
        let set: UpdateQuestionRequest =
            serde_json::from_str(r#"{"medicalPictureUrl": "https://img.example/ct.png"}"#)
                .expect("new picture");

        assert_eq!(absent.medical_picture_url, None);
        assert_eq!(cleared.medical_picture_url, Some(None));
        assert_eq!(
            set.medical_picture_url,
            Some(Some("https://img.example/ct.png".to_string()))
        );
        assert!(cleared.validate().is_ok());

        let empty: UpdateQuestionRequest =
            serde_json::from_str(r#"{"medicalPictureUrl": ""}"#).expect("empty picture");
        assert!(empty.validate().is_err());
    }

    #[test]
    fn link_request_accepts_negative_bonus() {
        let request: LinkQuestionRequest =
            serde_json::from_str(r#"{"bonusValue": -0.5}"#).expect("negative bonus");

        assert_eq!(request.bonus_value, Some(-0.5));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn register_rejects_invalid_email() {
        let request = RegisterUserRequest {
            name: "Dr. House".to_string(),
            email: "not-an-email".to_string(),
            password: "vicodin-2004".to_string(),
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn link_direction_defaults_to_outgoing() {
        assert_eq!(LinkDirectionParam::default(), LinkDirectionParam::Outgoing);
        let parsed: LinkDirectionParam = serde_json::from_str("\"both\"").expect("parse direction");
        assert_eq!(parsed, LinkDirectionParam::Both);
    }

    #[test]
    fn question_response_converts_into_consultation_question() {
        let question = QuestionResponse {
            id: QuestionId::new(),
            question_text: "Describe the pain".to_string(),
            question_type: QuestionType::NormalQuestion,
            response: "Sharp".to_string(),
            medical_picture_url: None,
            score: QuestionScore::new(10.0).expect("valid score"),
            question_category_id: CategoryId::new(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        };

        let converted = ConsultationQuestion::from(question.clone());

        assert_eq!(converted.id, question.id);
        assert_eq!(converted.score.value(), 10.0);
        assert_eq!(converted.question_category_id, question.question_category_id);
    }
}
