use admin_probes::api::server::run_api_server;
use admin_probes::app::runtime::AppRuntime;
use admin_probes::error::AppResult;
use admin_probes::prometheus::server::run_metrics_server;
use admin_probes::telemetry::tracing as app_tracing;

#[tokio::main]
async fn main() -> AppResult<()> {
    app_tracing::init();

    let runtime = AppRuntime::new(true).await?;
    let metrics_enabled = runtime.deps.cfg.metrics.enabled;

    let gather = {
        let rt = runtime.clone();
        move || rt.encode_prometheus_text()
    };

    let api_task = run_api_server(runtime.clone());
    let metrics_task = run_metrics_server(gather);

    tokio::select! {
        res = api_task => res?,
        res = metrics_task, if metrics_enabled => res?,
    }

    runtime.shutdown().await?;

    Ok(())
}
