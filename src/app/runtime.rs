use crate::app::dependencies::AppDeps;
use crate::app::metrics::AppMetrics;
use crate::app::sampler::ProbeSampler;
use crate::cache::messages::ProblemMessageCache;
use crate::error::AppResult;
use crate::probes::registry::ProblemCheckRegistry;
use crate::probes::scanner::ProblemScanner;
use crate::probes::types::ProblemReport;

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Clone-able handle over the whole subsystem: deps, metrics, the check
/// registry, the message cache and the background scan loop.
#[derive(Clone)]
pub struct AppRuntime {
    pub deps: Arc<AppDeps>,
    pub metrics: Arc<AppMetrics>,
    pub scanner: Arc<ProblemScanner>,

    // Keep the JoinHandle private and shared across clones.
    scan_task: Arc<Mutex<Option<JoinHandle<()>>>>,
    scan_cancel: CancellationToken,
}

impl AppRuntime {
    pub async fn new(from_env: bool) -> AppResult<Self> {
        let deps = Arc::new(AppDeps::new(from_env).await?);
        Self::from_deps(deps)
    }

    /// Build from pre-wired deps and start the scan loop.
    pub fn from_deps(deps: Arc<AppDeps>) -> AppResult<Self> {
        let cfg = deps.cfg.clone();

        let metrics = Arc::new(AppMetrics::new(&cfg.id, cfg.env, cfg.config_version)?);

        // Boot markers (the scan loop keeps the problem gauges in sync)
        metrics.set_ready(true);
        metrics.set_health(true);

        let registry = Arc::new(ProblemCheckRegistry::with_defaults());
        let messages = Arc::new(ProblemMessageCache::new());
        let sampler = ProbeSampler::new(deps.jobs.clone(), deps.memory.clone());

        let scanner = Arc::new(ProblemScanner::new(
            cfg,
            registry,
            messages,
            sampler,
            metrics.clone(),
        ));

        let token = CancellationToken::new();
        let jh = scanner.clone().spawn_scan_loop(token.clone());

        Ok(Self {
            deps,
            metrics,
            scanner,
            scan_task: Arc::new(Mutex::new(Some(jh))),
            scan_cancel: token,
        })
    }

    pub fn registry(&self) -> &ProblemCheckRegistry {
        self.scanner.registry()
    }

    pub fn messages(&self) -> &ProblemMessageCache {
        self.scanner.messages()
    }

    /// Evaluate all checks now, publish and return the report.
    pub async fn fetch_problems(&self) -> AppResult<ProblemReport> {
        self.scanner.scan_once().await
    }

    /// Report from the most recent scan (no evaluation).
    pub fn current_report(&self) -> ProblemReport {
        self.scanner.current()
    }

    /// True while the scan loop is healthy (or intentionally disabled).
    pub fn scanner_ok(&self) -> bool {
        if !self.deps.cfg.checks.enabled {
            return true;
        }
        !self.scan_cancel.is_cancelled() && self.scanner.is_running()
    }

    /// Stop the scan loop and wait for it to exit.
    pub async fn shutdown(&self) -> AppResult<()> {
        self.scan_cancel.cancel();
        self.metrics.set_ready(false);

        if let Some(jh) = self.scan_task.lock().await.take() {
            jh.await?;
        }
        Ok(())
    }

    pub fn encode_prometheus_text(&self) -> AppResult<String> {
        self.metrics.encode_text()
    }
}
