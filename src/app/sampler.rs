use crate::app::ports::{JobQueueStats, MemoryInfo};
use crate::error::{AppError, AppResult};
use crate::probes::types::ProbeSnapshot;

use chrono::Utc;
use std::fs;
use std::sync::Arc;

/// Gathers one [`ProbeSnapshot`] from the collaborator ports. This is the
/// only place a scan touches the outside world; the checks themselves run
/// against the frozen snapshot.
#[derive(Debug)]
pub struct ProbeSampler {
    jobs: Arc<dyn JobQueueStats>,
    memory: Arc<dyn MemoryInfo>,
}

impl ProbeSampler {
    pub fn new(jobs: Arc<dyn JobQueueStats>, memory: Arc<dyn MemoryInfo>) -> Self {
        Self { jobs, memory }
    }

    pub async fn sample(&self) -> AppResult<ProbeSnapshot> {
        let jobs = self.jobs.snapshot().await?;

        Ok(ProbeSnapshot {
            mem_total_kb: self.memory.mem_total_kb(),
            jobs,
            sampled_at: Utc::now(),
        })
    }
}

/// System memory via /proc.
///
/// Linux implementation:
/// - total RAM kB: /proc/meminfo (MemTotal)
///
/// Any read or parse failure reports None; the ram check treats unknown
/// memory as "not a problem".
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcMemoryInfo;

impl MemoryInfo for ProcMemoryInfo {
    fn mem_total_kb(&self) -> Option<u64> {
        #[cfg(target_os = "linux")]
        {
            read_mem_total_kb_linux().ok()
        }

        #[cfg(not(target_os = "linux"))]
        {
            None
        }
    }
}

#[cfg(target_os = "linux")]
fn read_mem_total_kb_linux() -> AppResult<u64> {
    // Parse "MemTotal:    16384256 kB" from /proc/meminfo
    let s = fs::read_to_string("/proc/meminfo")?;
    for line in s.lines() {
        if let Some(rest) = line.strip_prefix("MemTotal:") {
            return parse_first_u64(rest);
        }
    }
    Err(AppError::Internal(
        "failed to read MemTotal from /proc/meminfo".into(),
    ))
}

fn parse_first_u64(s: &str) -> AppResult<u64> {
    // Extract first number in a string like "   12345 kB"
    let num = s
        .split_whitespace()
        .next()
        .ok_or_else(|| AppError::Internal("failed to parse numeric value from /proc".into()))?;
    num.parse::<u64>()
        .map_err(|_| AppError::Internal("failed to parse u64 from /proc".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::MemoryInfo;

    #[test]
    fn parse_first_u64_handles_meminfo_shapes() {
        assert_eq!(parse_first_u64("   16384256 kB").unwrap(), 16_384_256);
        assert_eq!(parse_first_u64("42").unwrap(), 42);
        assert!(parse_first_u64("   ").is_err());
        assert!(parse_first_u64(" not-a-number kB").is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn proc_memory_info_reads_a_positive_total() {
        let total = ProcMemoryInfo.mem_total_kb();
        assert!(matches!(total, Some(kb) if kb > 0));
    }
}
