mod common;

use axum::http::{Method, StatusCode};
use common::{send, setup_app};
use serde_json::{Value, json};
use vpmp_api_types::{
    BonusLinkResponse, PmpDetailResponse, PmpResponse, QuestionCategoryResponse,
    QuestionDetailResponse, QuestionResponse, UserResponse,
};
use vpmp_core::consultation::{AskOutcome, Consultation, ConsultationQuestion};
use vpmp_core::domain::{BonusType, UserRole};

fn id_of(body: &Value) -> String {
    body["id"]
        .as_str()
        .expect("response should carry an id")
        .to_string()
}

async fn seed_question(app: &axum::Router, classroom: &str) -> (String, String, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/classrooms",
        Some(json!({ "name": classroom, "grade": 10, "major": "Mathematics" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let classroom_id = id_of(&body);

    let (status, body) = send(
        app,
        Method::POST,
        "/pmp",
        Some(json!({
            "title": "Chest Pain",
            "description": "Acute chest pain",
            "annonceOfTheProblem": "A patient walks in holding his chest",
            "classroomId": classroom_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let pmp_id = id_of(&body);

    let (status, body) = send(
        app,
        Method::POST,
        "/question-categories",
        Some(json!({ "name": "History", "pmpId": pmp_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = id_of(&body);

    (classroom_id, pmp_id, category_id)
}

async fn post_question(app: &axum::Router, category_id: &str, text: &str, score: f64) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/questions",
        Some(json!({
            "questionText": text,
            "type": "NORMAL_QUESTION",
            "response": "Sharp, since this morning",
            "score": score,
            "questionCategoryId": category_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
    id_of(&body)
}

#[tokio::test]
async fn test_health() {
    let app = setup_app().await;
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_consultation_scenario_counts_question_once() {
    let app = setup_app().await;
    let (_, pmp_id, category_id) = seed_question(&app, "Algebra 101").await;
    let question_id = post_question(&app, &category_id, "Describe the pain", 10.0).await;

    let (status, body) = send(&app, Method::GET, &format!("/pmp/{pmp_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let detail: PmpDetailResponse =
        serde_json::from_value(body).expect("pmp detail should deserialize");
    assert_eq!(detail.classroom.name, "Algebra 101");
    assert_eq!(detail.categories.len(), 1);
    assert_eq!(detail.categories[0].questions.len(), 1);

    let (status, body) = send(&app, Method::GET, &format!("/questions/pmp/{pmp_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let questions: Vec<QuestionDetailResponse> =
        serde_json::from_value(body).expect("questions should deserialize");
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].question.id.to_string(), question_id);

    let mut consultation = Consultation::new();
    consultation
        .select_pmp(detail.pmp.clone().into())
        .expect("pmp should be selectable");
    consultation
        .select_category(detail.categories[0].category.clone().into())
        .expect("category belongs to the pmp");

    let question: ConsultationQuestion = questions[0].clone().into();
    assert_eq!(
        consultation.ask_question(&question),
        Ok(AskOutcome::Recorded)
    );
    assert_eq!(
        consultation.ask_question(&question),
        Ok(AskOutcome::AlreadyAsked)
    );

    assert_eq!(consultation.current_score(), 10.0);
    assert_eq!(consultation.asked_questions().len(), 1);

    let result = consultation.end_session();
    assert_eq!(result.pmp_title.as_deref(), Some("Chest Pain"));
    assert_eq!(result.questions_asked, 1);
}

#[tokio::test]
async fn test_classroom_status_codes() {
    let app = setup_app().await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/classrooms",
        Some(json!({ "name": "Pediatrics", "grade": 2, "major": "Medicine" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/classrooms",
        Some(json!({ "name": "Pediatrics", "grade": 3, "major": "Medicine" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
    assert_eq!(body["message"], "Classroom already exists");

    let (status, body) = send(
        &app,
        Method::POST,
        "/classrooms",
        Some(json!({ "name": "", "grade": 3, "major": "Medicine" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        Method::GET,
        "/classrooms/6f1c2b9e-3d4a-4c5b-8e7f-9a0b1c2d3e4f",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = send(&app, Method::GET, "/classrooms/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::GET, "/classrooms", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let app = setup_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/classrooms",
        Some(json!({ "name": "Missing fields" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");
}

#[tokio::test]
async fn test_pmp_requires_existing_classroom() {
    let app = setup_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/pmp",
        Some(json!({
            "title": "Orphan",
            "description": "No classroom",
            "annonceOfTheProblem": "Nobody owns this case",
            "classroomId": "6f1c2b9e-3d4a-4c5b-8e7f-9a0b1c2d3e4f",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_pmp_patch_and_filtered_list() {
    let app = setup_app().await;
    let (classroom_id, pmp_id, _) = seed_question(&app, "Internal Medicine").await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/pmp/{pmp_id}"),
        Some(json!({ "title": "Chest Pain (revised)" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let pmp: PmpResponse = serde_json::from_value(body).expect("pmp should deserialize");
    assert_eq!(pmp.title, "Chest Pain (revised)");
    assert_eq!(pmp.description, "Acute chest pain");

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/pmp?classroomId={classroom_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let pmps: Vec<PmpResponse> = serde_json::from_value(body).expect("pmps should deserialize");
    assert_eq!(pmps.len(), 1);

    let (status, body) = send(&app, Method::DELETE, &format!("/pmp/{pmp_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, Method::GET, &format!("/pmp/{pmp_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_category_routes() {
    let app = setup_app().await;
    let (_, pmp_id, category_id) = seed_question(&app, "Surgery").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/question-categories/{category_id}"),
        Some(json!({ "name": "Anamnesis" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let category: QuestionCategoryResponse =
        serde_json::from_value(body).expect("category should deserialize");
    assert_eq!(category.name, "Anamnesis");

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/question-categories?pmpId={pmp_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["name"], "Anamnesis");
    assert!(body[0]["questions"].is_array());
}

#[tokio::test]
async fn test_question_routes_and_links() {
    let app = setup_app().await;
    let (_, _, category_id) = seed_question(&app, "Cardiology").await;
    let first = post_question(&app, &category_id, "When did it start?", 2.0).await;
    let second = post_question(&app, &category_id, "Does it radiate?", 3.0).await;

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/questions/by-category/{category_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/questions?categoryId={category_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/questions/{first}/linked-questions/{second}"),
        Some(json!({ "bonusType": "LINKED_TO_NEXT_RESPONSE", "bonusValue": 1.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let detail: QuestionDetailResponse =
        serde_json::from_value(body).expect("detail should deserialize");
    assert_eq!(detail.linked_questions.len(), 1);
    assert_eq!(detail.linked_questions[0].id.to_string(), second);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/questions/{first}/bonus-links"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let links: Vec<BonusLinkResponse> =
        serde_json::from_value(body).expect("links should deserialize");
    assert_eq!(links[0].bonus_type, BonusType::LinkedToNextResponse);
    assert_eq!(links[0].bonus_value, 1.5);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/questions/{second}/linked-questions?direction=incoming"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let incoming: Vec<QuestionResponse> =
        serde_json::from_value(body).expect("incoming should deserialize");
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0].id.to_string(), first);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/questions/{first}/linked-questions/{second}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["linkedQuestions"], json!([]));

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/questions/{first}"),
        Some(json!({ "score": 4.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 4.0);
    assert_eq!(body["questionText"], "When did it start?");

    let (status, _) = send(&app, Method::DELETE, &format!("/questions/{first}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &format!("/questions/{first}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_link_without_body_uses_defaults() {
    let app = setup_app().await;
    let (_, _, category_id) = seed_question(&app, "Oncology").await;
    let first = post_question(&app, &category_id, "Weight loss?", 1.0).await;
    let second = post_question(&app, &category_id, "Night sweats?", 1.0).await;

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/questions/{first}/linked-questions/{second}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(
        &app,
        Method::GET,
        &format!("/questions/{first}/bonus-links"),
        None,
    )
    .await;
    let links: Vec<BonusLinkResponse> =
        serde_json::from_value(body).expect("links should deserialize");
    assert_eq!(links[0].bonus_type, BonusType::RelatedToTopic);
    assert_eq!(links[0].bonus_value, 0.0);
}

#[tokio::test]
async fn test_medical_picture_question_without_url_is_rejected() {
    let app = setup_app().await;
    let (_, _, category_id) = seed_question(&app, "Radiology").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/questions",
        Some(json!({
            "questionText": "Show me the chest X-ray",
            "type": "ASK_FOR_MEDICAL_PICTURE",
            "response": "Cardiomegaly",
            "score": 2,
            "questionCategoryId": category_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_question_patch_with_null_picture_clears_it() {
    let app = setup_app().await;
    let (_, _, category_id) = seed_question(&app, "Imaging").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/questions",
        Some(json!({
            "questionText": "Show me the ECG",
            "type": "ASK_FOR_MEDICAL_PICTURE",
            "response": "ST elevation",
            "medicalPictureUrl": "https://img.example/ecg.png",
            "score": 3,
            "questionCategoryId": category_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
    let question_id = id_of(&body);
    let uri = format!("/questions/{question_id}");

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "score": 4 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["medicalPictureUrl"], "https://img.example/ecg.png");

    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "type": "NORMAL_QUESTION", "medicalPictureUrl": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "unexpected body: {body}");
    assert_eq!(body["type"], "NORMAL_QUESTION");
    assert!(body["medicalPictureUrl"].is_null());
}

#[tokio::test]
async fn test_registration_roles_and_duplicates() {
    let app = setup_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/user/register",
        Some(json!({ "name": "Student", "email": "student@example.com", "password": "password1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let student: UserResponse = serde_json::from_value(body).expect("user should deserialize");
    assert_eq!(student.role, UserRole::Student);

    let (status, body) = send(
        &app,
        Method::POST,
        "/user/register-professor",
        Some(json!({ "name": "Prof", "email": "prof@example.com", "password": "password2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "professor");
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());

    let (status, body) = send(
        &app,
        Method::POST,
        "/user/register-professor",
        Some(json!({ "name": "Copy", "email": "student@example.com", "password": "password3" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User with this email already exists");
}
