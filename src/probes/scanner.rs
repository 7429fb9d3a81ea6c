use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration};
use tokio_util::sync::CancellationToken;

use crate::app::config::AppConfig;
use crate::app::metrics::AppMetrics;
use crate::app::sampler::ProbeSampler;
use crate::cache::messages::ProblemMessageCache;
use crate::error::AppResult;
use crate::probes::registry::ProblemCheckRegistry;
use crate::probes::types::{CheckContext, ProblemReport};

/// Runs the periodic problem scan and publishes the latest report.
///
/// One evaluation pass: sample collaborators into a snapshot, run every
/// registered check against it, append the active problem messages, publish
/// on the watch channel and update metrics.
#[derive(Debug)]
pub struct ProblemScanner {
    cfg: Arc<AppConfig>,
    registry: Arc<ProblemCheckRegistry>,
    messages: Arc<ProblemMessageCache>,
    sampler: ProbeSampler,
    metrics: Arc<AppMetrics>,

    tx: watch::Sender<ProblemReport>,
    running: AtomicBool,
}

impl ProblemScanner {
    pub fn new(
        cfg: Arc<AppConfig>,
        registry: Arc<ProblemCheckRegistry>,
        messages: Arc<ProblemMessageCache>,
        sampler: ProbeSampler,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        let initial = ProblemReport::empty(chrono::Utc::now());
        let (tx, _rx) = watch::channel(initial);

        Self {
            cfg,
            registry,
            messages,
            sampler,
            metrics,
            tx,
            running: AtomicBool::new(true),
        }
    }

    pub fn registry(&self) -> &ProblemCheckRegistry {
        &self.registry
    }

    pub fn messages(&self) -> &ProblemMessageCache {
        &self.messages
    }

    pub fn subscribe(&self) -> watch::Receiver<ProblemReport> {
        self.tx.subscribe()
    }

    /// Most recently published report.
    pub fn current(&self) -> ProblemReport {
        self.tx.borrow().clone()
    }

    /// False once the scan loop has exited (shutdown, or checks disabled).
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// One evaluation pass without publishing. Registry checks first, in
    /// registration order, then the active problem messages.
    pub async fn fetch_problems(&self) -> AppResult<ProblemReport> {
        let snapshot = self.sampler.sample().await?;
        let ctx = CheckContext::new(self.cfg.clone(), snapshot);

        let mut problems = self.registry.run_all(&ctx);
        problems.extend(self.messages.active_problems());

        Ok(ProblemReport {
            scanned_at: snapshot.sampled_at,
            problems,
        })
    }

    /// Evaluate now, publish the result and return it.
    pub async fn scan_once(&self) -> AppResult<ProblemReport> {
        let report = self.fetch_problems().await?;
        self.publish(&report);
        Ok(report)
    }

    fn publish(&self, report: &ProblemReport) {
        self.metrics.inc_scan();
        self.metrics.set_problems_active(report.problems.len());
        self.metrics.set_messages_active(self.messages.active_len());
        self.metrics.set_last_scan_unix(report.scanned_at.timestamp());

        // send_replace so the latest report is readable even with no
        // subscribers around
        self.tx.send_replace(report.clone());
    }

    pub fn spawn_scan_loop(self: Arc<Self>, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }

    pub async fn run(&self, shutdown: CancellationToken) {
        if !self.cfg.checks.enabled {
            tracing::info!("problem checks disabled; scan loop not starting");
            self.running.store(false, Ordering::Relaxed);
            return;
        }

        let poll = Duration::from_millis(self.cfg.checks.scan_interval_ms);
        let mut interval = time::interval(poll);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("problem scan loop shutting down");
                    break;
                }
                _ = interval.tick() => {}
            }

            match self.scan_once().await {
                Ok(report) => {
                    tracing::debug!(
                        problems = report.problems.len(),
                        "problem scan completed"
                    );
                }
                Err(e) => {
                    // keep the previous report; a flaky collaborator should
                    // not blank the dashboard
                    tracing::warn!(error = %e, "problem scan failed");
                    self.metrics.inc_scan_error();
                }
            }
        }

        self.running.store(false, Ordering::Relaxed);
    }
}
