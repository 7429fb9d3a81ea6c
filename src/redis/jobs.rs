use crate::error::{AppError, AppResult};
use crate::redis::config::RedisConfig;

use chrono::{DateTime, Utc};
use redis::RedisResult;
use redis::aio::ConnectionManager;
use std::time::Duration;
use tokio::time::timeout;

/// Async Redis client for job-queue statistics:
/// - owns a ConnectionManager (auto reconnect)
/// - enforces per-command timeouts
/// - provides exactly the two primitives the job_queue check needs:
///   queued count (LLEN) and last-performed timestamp (GET)
///
/// No policy logic here.
#[derive(Clone)]
pub struct JobsClient {
    manager: ConnectionManager,
    command_timeout: Duration,

    queue_key: String,
    last_performed_at_key: String,
}

impl std::fmt::Debug for JobsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobsClient")
            .field("command_timeout", &self.command_timeout)
            .field("queue_key", &self.queue_key)
            .field("last_performed_at_key", &self.last_performed_at_key)
            .finish()
    }
}

impl JobsClient {
    /// Connect using the RedisConfig URI and connection timeouts.
    pub async fn connect_from_config(cfg: &RedisConfig) -> AppResult<Self> {
        let connect_timeout = Duration::from_millis(cfg.connect_timeout_ms);
        let command_timeout = Duration::from_millis(cfg.command_timeout_ms);

        let client = redis::Client::open(cfg.uri.as_str())
            .map_err(|e| AppError::InvalidConfig(format!("invalid redis uri '{}': {e}", cfg.uri)))?;

        let manager = timeout(connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| {
                AppError::RedisLogic(format!("redis connect timeout after {connect_timeout:?}"))
            })?
            .map_err(|e| AppError::RedisLogic(format!("redis connect error: {e}")))?;

        Ok(Self {
            manager,
            command_timeout,
            queue_key: cfg.queue_key.clone(),
            last_performed_at_key: cfg.last_performed_at_key.clone(),
        })
    }

    async fn with_timeout<T>(
        &self,
        fut: impl std::future::Future<Output = RedisResult<T>>,
    ) -> AppResult<T> {
        timeout(self.command_timeout, fut)
            .await
            .map_err(|_| {
                AppError::RedisLogic(format!(
                    "redis command timeout after {:?}",
                    self.command_timeout
                ))
            })?
            .map_err(|e| AppError::RedisLogic(format!("{e}")))
    }

    /// Number of jobs waiting in the queue list.
    pub async fn queued(&self) -> AppResult<u64> {
        let cmd = redis::cmd("LLEN").arg(&self.queue_key).clone();
        self.with_timeout(async {
            let mut conn = self.manager.clone();
            cmd.query_async(&mut conn).await
        })
        .await
    }

    /// When a worker last finished a job, or None if the timestamp key is
    /// absent (nothing ever processed).
    pub async fn last_job_performed_at(&self) -> AppResult<Option<DateTime<Utc>>> {
        let cmd = redis::cmd("GET").arg(&self.last_performed_at_key).clone();
        let unix_secs: Option<i64> = self
            .with_timeout(async {
                let mut conn = self.manager.clone();
                cmd.query_async(&mut conn).await
            })
            .await?;

        match unix_secs {
            None => Ok(None),
            Some(secs) => DateTime::<Utc>::from_timestamp(secs, 0)
                .map(Some)
                .ok_or_else(|| {
                    AppError::RedisLogic(format!(
                        "key '{}' holds an out-of-range unix timestamp: {secs}",
                        self.last_performed_at_key
                    ))
                }),
        }
    }
}
