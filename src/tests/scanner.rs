//! Scan loop behavior: publishing, dynamic checks, failure handling,
//! shutdown.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::time::{sleep, timeout};

use crate::app::AppRuntime;
use crate::app::config::AppConfig;
use crate::app::dependencies::AppDeps;
use crate::app::ports::{FixedJobQueue, FixedMemoryInfo, JobQueueStats, NoopJobQueue};
use crate::cache::messages::MessageKey;
use crate::error::{AppError, AppResult};
use crate::probes::types::JobQueueSnapshot;

use super::support::test_config;

fn runtime_with(cfg: AppConfig, jobs: Arc<dyn JobQueueStats>) -> AppRuntime {
    let deps = Arc::new(AppDeps::with_ports(
        Arc::new(cfg),
        jobs,
        Arc::new(FixedMemoryInfo(Some(2_000_000))),
    ));
    AppRuntime::from_deps(deps).expect("runtime build")
}

#[derive(Debug)]
struct FailingJobQueue;

#[async_trait]
impl JobQueueStats for FailingJobQueue {
    async fn snapshot(&self) -> AppResult<JobQueueSnapshot> {
        Err(AppError::RedisLogic("connection refused".to_string()))
    }
}

#[tokio::test]
async fn scan_loop_publishes_reports() {
    let rt = runtime_with(test_config(), Arc::new(NoopJobQueue));

    let mut rx = rt.scanner.subscribe();
    timeout(Duration::from_secs(5), rx.changed())
        .await
        .expect("no scan within 5s")
        .expect("scanner dropped");

    let report = rt.current_report();
    assert!(report.is_clean(), "unexpected problems: {:?}", report.problems);
    assert!(rt.scanner_ok());

    rt.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn dynamically_registered_check_shows_up() {
    let rt = runtime_with(test_config(), Arc::new(NoopJobQueue));

    rt.registry()
        .register("disk_space", |_| Some("Disk is almost full.".to_string()));

    let report = rt.fetch_problems().await.expect("fetch");
    assert_eq!(report.problems.len(), 1);
    assert_eq!(report.problems[0].check, "disk_space");

    // published, not just returned
    assert_eq!(rt.current_report().problems.len(), 1);

    rt.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn cached_messages_follow_registry_problems() {
    let mut cfg = test_config();
    // development mode makes the deploy_env check fire
    cfg.env = crate::app::config::DeployEnv::Development;

    let rt = runtime_with(cfg, Arc::new(NoopJobQueue));
    rt.messages().add(MessageKey::EmailPollTimeout);

    let report = rt.fetch_problems().await.expect("fetch");
    let checks: Vec<&str> = report.problems.iter().map(|p| p.check.as_str()).collect();

    assert_eq!(checks, vec!["deploy_env", "email_poll_timeout"]);

    rt.messages().clear(MessageKey::EmailPollTimeout);
    let report = rt.fetch_problems().await.expect("fetch");
    assert_eq!(report.problems.len(), 1);

    rt.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn stalled_job_queue_is_reported() {
    let jobs = FixedJobQueue(JobQueueSnapshot {
        queued: 4,
        last_job_performed_at: Some(Utc::now() - chrono::Duration::minutes(30)),
    });

    let rt = runtime_with(test_config(), Arc::new(jobs));

    let report = rt.fetch_problems().await.expect("fetch");
    assert_eq!(report.problems.len(), 1);
    assert_eq!(report.problems[0].check, "job_queue");

    rt.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn failed_scan_keeps_previous_report() {
    let rt = runtime_with(test_config(), Arc::new(FailingJobQueue));

    let before = rt.current_report();

    let err = rt.fetch_problems().await.expect_err("sampling should fail");
    assert!(matches!(err, AppError::RedisLogic(_)));

    // previous (initial) report untouched
    let after = rt.current_report();
    assert_eq!(after.scanned_at, before.scanned_at);
    assert!(after.is_clean());

    rt.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn shutdown_stops_the_loop() {
    let rt = runtime_with(test_config(), Arc::new(NoopJobQueue));

    rt.shutdown().await.expect("shutdown");

    assert!(!rt.scanner.is_running());
    assert!(!rt.scanner_ok());
}

#[tokio::test]
async fn disabled_checks_leave_scanner_ok() {
    let mut cfg = test_config();
    cfg.checks.enabled = false;

    let rt = runtime_with(cfg, Arc::new(NoopJobQueue));

    // the loop exits immediately but that is intentional, not a failure
    sleep(Duration::from_millis(50)).await;
    assert!(rt.scanner_ok());

    rt.shutdown().await.expect("shutdown");
}
