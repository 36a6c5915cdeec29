#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;

use vpmp_core::domain::{CategoryId, ClassroomId, PmpId, QuestionScore, QuestionType};
use vpmp_server::api::{AppState, create_app};
use vpmp_server::config::{CorsConfig, DatabaseConfig};
use vpmp_server::db;
use vpmp_server::repository::{
    CategoryRecord, ClassroomRecord, ClassroomRepository, NewCategory, NewClassroom, NewPmp,
    NewQuestion, PmpRecord, PmpRepository, QuestionCategoryRepository, QuestionRecord,
    QuestionRepository, SeaOrmClassroomRepository, SeaOrmPmpRepository,
    SeaOrmQuestionCategoryRepository, SeaOrmQuestionRepository,
};

/// Fresh migrated in-memory database. One connection keeps every query on the same database.
pub async fn setup_db() -> DatabaseConnection {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        run_migrations: true,
        max_connections: Some(1),
        sqlx_logging: false,
    };
    db::connect(&config)
        .await
        .expect("in-memory database should migrate")
}

pub async fn setup_app() -> Router {
    let db = setup_db().await;
    create_app(Arc::new(AppState::new(db)), &CorsConfig::default())
}

pub async fn create_classroom(db: &DatabaseConnection, name: &str) -> ClassroomRecord {
    SeaOrmClassroomRepository::new(db.clone())
        .create(NewClassroom {
            name: name.to_string(),
            grade: 4,
            major: "Medicine".to_string(),
            description: None,
        })
        .await
        .expect("classroom should be created")
}

pub async fn create_pmp(db: &DatabaseConnection, classroom_id: ClassroomId, title: &str) -> PmpRecord {
    SeaOrmPmpRepository::new(db.clone())
        .create(NewPmp {
            title: title.to_string(),
            description: "Patient presenting with chest pain".to_string(),
            annonce_of_the_problem: "A 54 year old man arrives at the emergency room".to_string(),
            classroom_id,
            professor_id: None,
        })
        .await
        .expect("pmp should be created")
}

pub async fn create_category(db: &DatabaseConnection, pmp_id: PmpId, name: &str) -> CategoryRecord {
    SeaOrmQuestionCategoryRepository::new(db.clone())
        .create(NewCategory {
            name: name.to_string(),
            pmp_id,
        })
        .await
        .expect("category should be created")
}

pub async fn create_question(
    db: &DatabaseConnection,
    category_id: CategoryId,
    text: &str,
    score: f64,
) -> QuestionRecord {
    SeaOrmQuestionRepository::new(db.clone())
        .create(NewQuestion {
            question_text: text.to_string(),
            question_type: QuestionType::NormalQuestion,
            response: format!("answer to {text}"),
            medical_picture_url: None,
            score: QuestionScore::new(score).expect("score should be valid"),
            question_category_id: category_id,
        })
        .await
        .expect("question should be created")
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).expect("request should build"))
        .await
        .expect("router should respond");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body should be json")
    };
    (status, json)
}
