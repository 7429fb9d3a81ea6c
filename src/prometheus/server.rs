use crate::api::server::shutdown_signal;
use crate::error::{AppError, AppResult};
use crate::prometheus::config::PrometheusConfig;

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::compression::CompressionLayer;

const PROM_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

type GatherFn = Arc<dyn Fn() -> AppResult<String> + Send + Sync>;

/// Serve the metrics registry on its own listener, next to a trivial
/// `/healthz`. `gather` is called per scrape.
pub async fn run_metrics_server<G>(gather: G) -> AppResult<()>
where
    G: Fn() -> AppResult<String> + Send + Sync + 'static,
{
    let cfg = PrometheusConfig::load_default()?;
    let addr: SocketAddr = format!("{}:{}", cfg.bind_addr, cfg.port)
        .parse()
        .map_err(|e| AppError::InvalidConfig(format!("prometheus.toml: invalid bind/port: {e}")))?;

    let gather: GatherFn = Arc::new(gather);

    let app = Router::new()
        .route(&cfg.metrics_path, get(metrics_handler))
        .route("/healthz", get(|| async { "ok\n" }))
        .layer(CompressionLayer::new())
        .with_state(gather);

    tracing::info!(
        bind_addr = %cfg.bind_addr,
        port = cfg.port,
        path = %cfg.metrics_path,
        "prometheus metrics server starting (axum)"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind metrics server: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal("metrics server"))
        .await
        .map_err(|e| AppError::Internal(format!("Metrics server error: {e}")))?;

    Ok(())
}

async fn metrics_handler(State(gather): State<GatherFn>) -> impl IntoResponse {
    match gather() {
        Ok(text) => ([(header::CONTENT_TYPE, PROM_CONTENT_TYPE)], text).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to gather metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, "gather metrics failed\n").into_response()
        }
    }
}
