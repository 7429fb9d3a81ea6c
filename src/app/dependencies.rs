use crate::app::config::{AppConfig, load_app_config};
use crate::app::ports::{JobQueueStats, MemoryInfo, NoopJobQueue, RedisJobQueue};
use crate::app::sampler::ProcMemoryInfo;
use crate::error::AppResult;
use crate::redis::jobs::JobsClient;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Config plus the collaborator ports, wired once at startup.
#[derive(Debug)]
pub struct AppDeps {
    pub cfg: Arc<AppConfig>,

    // Always-present ports (real or noop)
    pub jobs: Arc<dyn JobQueueStats>,
    pub memory: Arc<dyn MemoryInfo>,

    // Runtime gate: lets operators stop hitting redis without a restart
    jobs_enabled: Arc<AtomicBool>,
}

impl AppDeps {
    pub async fn new(from_env: bool) -> AppResult<Self> {
        let cfg = Arc::new(load_app_config(from_env)?);
        Self::from_config(cfg).await
    }

    pub async fn from_config(cfg: Arc<AppConfig>) -> AppResult<Self> {
        let jobs_enabled = Arc::new(AtomicBool::new(cfg.redis.enabled));

        let jobs: Arc<dyn JobQueueStats> = if cfg.redis.enabled {
            let client = JobsClient::connect_from_config(&cfg.redis).await?;
            tracing::info!(uri = %cfg.redis.uri, "job-queue statistics backed by redis");
            Arc::new(RedisJobQueue::new(jobs_enabled.clone(), client))
        } else {
            tracing::info!("redis disabled; job-queue statistics are a no-op");
            Arc::new(NoopJobQueue)
        };

        Ok(Self {
            cfg,
            jobs,
            memory: Arc::new(ProcMemoryInfo),
            jobs_enabled,
        })
    }

    /// Wire explicit ports (tests, embedding in a larger app).
    pub fn with_ports(
        cfg: Arc<AppConfig>,
        jobs: Arc<dyn JobQueueStats>,
        memory: Arc<dyn MemoryInfo>,
    ) -> Self {
        let jobs_enabled = Arc::new(AtomicBool::new(cfg.redis.enabled));
        Self {
            cfg,
            jobs,
            memory,
            jobs_enabled,
        }
    }

    #[inline]
    pub fn is_jobs_enabled(&self) -> bool {
        self.jobs_enabled.load(Ordering::Relaxed)
    }

    pub fn set_jobs_enabled(&self, enabled: bool) {
        self.jobs_enabled.store(enabled, Ordering::Relaxed);
    }
}
