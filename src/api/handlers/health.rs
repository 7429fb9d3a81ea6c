use axum::{Json, extract::State};

use crate::api::types::HealthResp;
use crate::app::AppRuntime;

pub async fn scanner(State(app): State<AppRuntime>) -> Json<HealthResp> {
    // "ok" means: the scan loop is alive, or checks are intentionally off.
    Json(HealthResp {
        ok: app.scanner_ok(),
    })
}
