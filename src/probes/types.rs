use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::config::AppConfig;

/// A single finding from a problem check: which check fired and the
/// human-readable warning it produced for administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub check: String,
    pub message: String,
}

impl Problem {
    pub fn new(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            message: message.into(),
        }
    }
}

/// Result of one full evaluation pass over all registered checks
/// plus the active problem messages.
#[derive(Debug, Clone, Serialize)]
pub struct ProblemReport {
    pub scanned_at: DateTime<Utc>,
    pub problems: Vec<Problem>,
}

impl ProblemReport {
    pub fn empty(scanned_at: DateTime<Utc>) -> Self {
        Self {
            scanned_at,
            problems: Vec::new(),
        }
    }

    #[inline]
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Point-in-time view of the background-job queue.
///
/// `queued` is the number of jobs waiting; `last_job_performed_at` is when a
/// worker last finished a job (None if no job has ever been processed, or the
/// backend doesn't track it).
#[derive(Debug, Clone, Copy, Default)]
pub struct JobQueueSnapshot {
    pub queued: u64,
    pub last_job_performed_at: Option<DateTime<Utc>>,
}

/// A minimal snapshot of the external state the built-in checks read.
///
/// Keep this small and stable:
/// - the sampler populates it (possibly awaiting collaborators)
/// - checks consume it synchronously, in registration order
#[derive(Debug, Clone, Copy)]
pub struct ProbeSnapshot {
    /// Total system RAM in kB, None when it cannot be determined.
    pub mem_total_kb: Option<u64>,

    /// Background-job queue statistics.
    pub jobs: JobQueueSnapshot,

    /// When this snapshot was taken. Checks use this as "now" so they stay
    /// pure functions of the snapshot.
    pub sampled_at: DateTime<Utc>,
}

/// Everything a problem check is allowed to look at: the app configuration
/// (deployment env, hostname, thresholds, auth settings) plus the sampled
/// snapshot of external state.
#[derive(Debug, Clone)]
pub struct CheckContext {
    pub cfg: Arc<AppConfig>,
    pub snapshot: ProbeSnapshot,
}

impl CheckContext {
    pub fn new(cfg: Arc<AppConfig>, snapshot: ProbeSnapshot) -> Self {
        Self { cfg, snapshot }
    }
}
