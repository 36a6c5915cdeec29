//! API 路由模块。
//!
//! 提供管理后台与学生端使用的 REST 接口。

pub mod classroom;
pub mod error;
pub mod extract;
pub mod health;
pub mod pmp;
pub mod question;
pub mod question_category;
pub mod state;
pub mod user;

use axum::{Router, http::HeaderValue};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::CorsConfig;

pub use classroom::create_classroom_router;
pub use error::ApiError;
pub use health::create_health_router;
pub use pmp::create_pmp_router;
pub use question::create_question_router;
pub use question_category::create_question_category_router;
pub use state::AppState;
pub use user::create_user_router;

/// 组装全部路由、请求追踪与 CORS。
pub fn create_app(state: Arc<AppState>, cors: &CorsConfig) -> Router {
    Router::new()
        .merge(create_health_router())
        .merge(create_classroom_router())
        .merge(create_pmp_router())
        .merge(create_question_category_router())
        .merge(create_question_router())
        .merge(create_user_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors))
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(%origin, error = %err, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
