use crate::error::{AppError, AppResult};
use serde::Deserialize;

/// Settings for the Redis-backed job-queue statistics provider.
///
/// When disabled, the job_queue check sees an empty, never-stale queue.
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub enabled: bool,

    pub uri: String,

    pub connect_timeout_ms: u64,
    pub command_timeout_ms: u64,

    /// List whose length is the queued-job count (LLEN).
    pub queue_key: String,

    /// String key holding the unix-seconds timestamp of the last finished
    /// job (GET). Absent key means "no job has ever been processed".
    pub last_performed_at_key: String,
}

impl RedisConfig {
    pub fn validate(&self) -> AppResult<()> {
        if !self.enabled {
            return Ok(());
        }

        if self.uri.trim().is_empty() {
            return Err(AppError::MissingConfig("redis.uri"));
        }

        if !(self.uri.starts_with("redis://") || self.uri.starts_with("rediss://")) {
            return Err(AppError::InvalidConfig(format!(
                "redis.uri must start with redis:// or rediss:// (got '{}')",
                self.uri
            )));
        }

        if self.connect_timeout_ms == 0 {
            return Err(AppError::InvalidConfig(
                "redis.connect_timeout_ms must be > 0".into(),
            ));
        }

        if self.command_timeout_ms == 0 {
            return Err(AppError::InvalidConfig(
                "redis.command_timeout_ms must be > 0".into(),
            ));
        }

        if self.queue_key.trim().is_empty() {
            return Err(AppError::MissingConfig("redis.queue_key"));
        }

        if self.last_performed_at_key.trim().is_empty() {
            return Err(AppError::MissingConfig("redis.last_performed_at_key"));
        }

        Ok(())
    }
}
