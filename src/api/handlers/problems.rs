use axum::{Json, extract::State};

use crate::api::types::ProblemsResp;
use crate::app::AppRuntime;
use crate::error::ApiError;

/// Report from the most recent scan. Cheap: no evaluation happens here.
pub async fn list(State(app): State<AppRuntime>) -> Json<ProblemsResp> {
    Json(ProblemsResp::from(app.current_report()))
}

/// Evaluate all checks now, publish and return the fresh report.
pub async fn refresh(State(app): State<AppRuntime>) -> Result<Json<ProblemsResp>, ApiError> {
    let report = app.fetch_problems().await?;
    Ok(Json(ProblemsResp::from(report)))
}
