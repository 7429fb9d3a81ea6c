use crate::error::AppResult;
use crate::probes::types::JobQueueSnapshot;
use crate::redis::jobs::JobsClient;

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::{Arc, atomic::AtomicBool, atomic::Ordering};

/// ------------------------------
/// Job-queue statistics trait
/// ------------------------------
#[async_trait]
pub trait JobQueueStats: Send + Sync + Debug {
    async fn snapshot(&self) -> AppResult<JobQueueSnapshot>;
}

/// Real provider: reads queue length and last-performed timestamp from Redis.
#[derive(Clone, Debug)]
pub struct RedisJobQueue {
    enabled: Arc<AtomicBool>,
    client: JobsClient,
}

impl RedisJobQueue {
    pub fn new(enabled: Arc<AtomicBool>, client: JobsClient) -> Self {
        Self { enabled, client }
    }
}

#[async_trait]
impl JobQueueStats for RedisJobQueue {
    async fn snapshot(&self) -> AppResult<JobQueueSnapshot> {
        if !self.enabled.load(Ordering::Relaxed) {
            return Ok(JobQueueSnapshot::default());
        }

        let queued = self.client.queued().await?;
        let last_job_performed_at = self.client.last_job_performed_at().await?;

        Ok(JobQueueSnapshot {
            queued,
            last_job_performed_at,
        })
    }
}

/// No-backend provider: an empty, never-stale queue. The job_queue check
/// never fires against it.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopJobQueue;

#[async_trait]
impl JobQueueStats for NoopJobQueue {
    async fn snapshot(&self) -> AppResult<JobQueueSnapshot> {
        Ok(JobQueueSnapshot::default())
    }
}

/// Fixed provider for tests: always returns the given snapshot.
#[derive(Clone, Copy, Debug)]
pub struct FixedJobQueue(pub JobQueueSnapshot);

#[async_trait]
impl JobQueueStats for FixedJobQueue {
    async fn snapshot(&self) -> AppResult<JobQueueSnapshot> {
        Ok(self.0)
    }
}

/// ------------------------------
/// System memory trait
/// ------------------------------
pub trait MemoryInfo: Send + Sync + Debug {
    /// Total system RAM in kB, None when it cannot be determined.
    fn mem_total_kb(&self) -> Option<u64>;
}

/// Fixed provider for tests and platforms without /proc.
#[derive(Clone, Copy, Debug)]
pub struct FixedMemoryInfo(pub Option<u64>);

impl MemoryInfo for FixedMemoryInfo {
    fn mem_total_kb(&self) -> Option<u64> {
        self.0
    }
}
