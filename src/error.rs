/// Crate-wide result type.
pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // =========
    // Config / startup
    // =========
    #[error("Configuration file IO error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Failed to parse TOML config: {0}")]
    ConfigToml(#[from] toml::de::Error),

    #[error("Missing configuration field: {0}")]
    MissingConfig(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // =========
    // Serialization / deserialization
    // =========
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    // =========
    // Metrics / Prometheus
    // =========
    #[cfg(feature = "metrics")]
    #[error("Prometheus registry error: {0}")]
    Prometheus(#[from] prometheus::Error),

    // =========
    // Job-queue statistics backend
    // =========
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Redis logic error: {0}")]
    RedisLogic(String),

    // =========
    // Application-domain errors
    // =========
    #[error("Unknown problem message key: {0}")]
    UnknownMessageKey(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to spawn task: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    /// `tokio::time::timeout(...)` elapsed before completion.
    #[error("Operation timed out")]
    Timeout(#[from] tokio::time::error::Elapsed),

    #[error("Shutdown requested")]
    Shutdown,

    #[error("Disabled: {0}")]
    Disabled(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

// ============================
// Axum HTTP adapter
// ============================

#[cfg(feature = "axum")]
mod axum_impl {
    use super::AppError;
    use axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    use serde::Serialize;

    /// Thin HTTP wrapper so core errors don't depend on HTTP.
    #[derive(Debug)]
    pub struct ApiError(pub AppError);

    #[derive(Debug, Serialize)]
    struct ErrorBody {
        error: String,
        kind: &'static str,
    }

    impl From<AppError> for ApiError {
        fn from(e: AppError) -> Self {
            Self(e)
        }
    }

    impl IntoResponse for ApiError {
        fn into_response(self) -> Response {
            let (status, kind, msg) = map_error(&self.0);
            (status, Json(ErrorBody { error: msg, kind })).into_response()
        }
    }

    fn map_error(e: &AppError) -> (StatusCode, &'static str, String) {
        match e {
            AppError::Disabled(reason) => {
                (StatusCode::SERVICE_UNAVAILABLE, "disabled", reason.clone())
            }

            AppError::UnknownMessageKey(key) => {
                (StatusCode::NOT_FOUND, "unknown_message_key", key.clone())
            }

            AppError::InvalidArgument(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_argument", msg.clone())
            }
            AppError::MissingConfig(field) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "missing_config",
                field.to_string(),
            ),
            AppError::InvalidConfig(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "invalid_config",
                msg.clone(),
            ),

            AppError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "timeout", e.to_string()),
            AppError::Shutdown => (StatusCode::SERVICE_UNAVAILABLE, "shutdown", e.to_string()),

            // Collaborator transport errors: dependency down, not our fault
            AppError::Redis(_) | AppError::RedisLogic(_) => {
                (StatusCode::BAD_GATEWAY, "upstream_transport", e.to_string())
            }

            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal", e.to_string()),
        }
    }
}

#[cfg(feature = "axum")]
pub use axum_impl::ApiError;
