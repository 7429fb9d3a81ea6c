use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::app::AppRuntime;

use super::handlers::{health, messages, problems};

pub fn build_router(app: AppRuntime) -> Router {
    Router::new()
        // -----------------------
        // Health
        // -----------------------
        .route("/health/scanner", get(health::scanner))
        // -----------------------
        // Problems
        // -----------------------
        .route("/problems", get(problems::list))
        .route("/problems/refresh", post(problems::refresh))
        // -----------------------
        // Problem message cache
        // -----------------------
        .route("/messages/{key}", get(messages::get))
        .route("/messages/{key}", post(messages::add))
        .route("/messages/{key}", delete(messages::clear))
        .with_state(app)
}
