//! Built-in check semantics, case by case.

use chrono::Duration;

use crate::probes::builtin::{
    deploy_env_check, facebook_config_check, github_config_check, host_names_check,
    job_queue_check, ram_check, twitter_config_check,
};
use crate::probes::types::JobQueueSnapshot;

use super::support::{clean_ctx, clean_snapshot, ctx, provider, test_config};
use crate::app::config::DeployEnv;

// --------------------------------------------------
// deploy_env_check
// --------------------------------------------------

#[test]
fn deploy_env_ok_in_production() {
    assert_eq!(deploy_env_check(&clean_ctx()), None);
}

#[test]
fn deploy_env_warns_in_development() {
    let mut cfg = test_config();
    cfg.env = DeployEnv::Development;
    let msg = deploy_env_check(&ctx(cfg, clean_snapshot())).expect("expected a warning");
    assert!(msg.contains("development"));
}

#[test]
fn deploy_env_warns_in_test_mode() {
    let mut cfg = test_config();
    cfg.env = DeployEnv::Test;
    assert!(deploy_env_check(&ctx(cfg, clean_snapshot())).is_some());
}

// --------------------------------------------------
// host_names_check
// --------------------------------------------------

#[test]
fn host_names_ok_with_real_hostname() {
    assert_eq!(host_names_check(&clean_ctx()), None);
}

#[test]
fn host_names_warns_on_localhost() {
    let mut cfg = test_config();
    cfg.hostname = "localhost".to_string();
    assert!(host_names_check(&ctx(cfg, clean_snapshot())).is_some());
}

#[test]
fn host_names_warns_on_production_localhost() {
    let mut cfg = test_config();
    cfg.hostname = "production.localhost".to_string();
    assert!(host_names_check(&ctx(cfg, clean_snapshot())).is_some());
}

#[test]
fn host_names_warns_on_empty_hostname() {
    let mut cfg = test_config();
    cfg.hostname = String::new();
    assert!(host_names_check(&ctx(cfg, clean_snapshot())).is_some());
}

#[test]
fn host_names_placeholder_match_is_case_insensitive() {
    let mut cfg = test_config();
    cfg.hostname = "LOCALHOST".to_string();
    assert!(host_names_check(&ctx(cfg, clean_snapshot())).is_some());
}

// --------------------------------------------------
// ram_check
// --------------------------------------------------

#[test]
fn ram_ok_at_one_gb() {
    let mut snap = clean_snapshot();
    snap.mem_total_kb = Some(1_025_272);
    assert_eq!(ram_check(&ctx(test_config(), snap)), None);
}

#[test]
fn ram_ok_when_total_unknown() {
    let mut snap = clean_snapshot();
    snap.mem_total_kb = None;
    assert_eq!(ram_check(&ctx(test_config(), snap)), None);
}

#[test]
fn ram_warns_below_threshold() {
    let mut snap = clean_snapshot();
    snap.mem_total_kb = Some(512_636);
    let msg = ram_check(&ctx(test_config(), snap)).expect("expected a warning");
    assert!(msg.contains("512636"));
}

// --------------------------------------------------
// job_queue_check
// --------------------------------------------------

fn jobs_snapshot(queued: u64, last_ago: Option<Duration>) -> crate::probes::types::ProbeSnapshot {
    let mut snap = clean_snapshot();
    snap.jobs = JobQueueSnapshot {
        queued,
        last_job_performed_at: last_ago.map(|ago| snap.sampled_at - ago),
    };
    snap
}

#[test]
fn job_queue_ok_when_processed_recently() {
    let snap = jobs_snapshot(0, Some(Duration::minutes(1)));
    assert_eq!(job_queue_check(&ctx(test_config(), snap)), None);
}

#[test]
fn job_queue_ok_when_stale_but_nothing_queued() {
    let snap = jobs_snapshot(0, Some(Duration::days(7)));
    assert_eq!(job_queue_check(&ctx(test_config(), snap)), None);
}

#[test]
fn job_queue_ok_when_never_processed_and_nothing_queued() {
    let snap = jobs_snapshot(0, None);
    assert_eq!(job_queue_check(&ctx(test_config(), snap)), None);
}

#[test]
fn job_queue_warns_when_stale_with_jobs_queued() {
    let snap = jobs_snapshot(1, Some(Duration::minutes(20)));
    assert!(job_queue_check(&ctx(test_config(), snap)).is_some());
}

#[test]
fn job_queue_warns_when_never_processed_with_jobs_queued() {
    let snap = jobs_snapshot(1, None);
    let msg = job_queue_check(&ctx(test_config(), snap)).expect("expected a warning");
    assert!(msg.contains("never been processed"));
}

#[test]
fn job_queue_ok_exactly_at_staleness_boundary() {
    // 120s threshold; a job that finished exactly 120s ago is still "recent"
    let snap = jobs_snapshot(3, Some(Duration::seconds(120)));
    assert_eq!(job_queue_check(&ctx(test_config(), snap)), None);
}

#[test]
fn job_queue_ok_when_queued_but_fresh() {
    let snap = jobs_snapshot(5, Some(Duration::seconds(30)));
    assert_eq!(job_queue_check(&ctx(test_config(), snap)), None);
}

// --------------------------------------------------
// auth config checks
// --------------------------------------------------

#[test]
fn auth_ok_when_provider_disabled() {
    // disabled with blank credentials is fine
    assert_eq!(facebook_config_check(&clean_ctx()), None);
    assert_eq!(twitter_config_check(&clean_ctx()), None);
    assert_eq!(github_config_check(&clean_ctx()), None);
}

#[test]
fn auth_ok_when_enabled_with_credentials() {
    let mut cfg = test_config();
    cfg.auth.facebook = provider(true, "12313213", "12312313123");
    assert_eq!(facebook_config_check(&ctx(cfg, clean_snapshot())), None);
}

#[test]
fn auth_warns_when_client_id_missing() {
    let mut cfg = test_config();
    cfg.auth.facebook = provider(true, "", "12312313123");
    let msg = facebook_config_check(&ctx(cfg, clean_snapshot())).expect("expected a warning");
    assert!(msg.contains("Facebook"));
}

#[test]
fn auth_warns_when_client_secret_missing() {
    let mut cfg = test_config();
    cfg.auth.twitter = provider(true, "123123", "");
    assert!(twitter_config_check(&ctx(cfg, clean_snapshot())).is_some());
}

#[test]
fn auth_warns_when_both_credentials_missing() {
    let mut cfg = test_config();
    cfg.auth.github = provider(true, "", "");
    let msg = github_config_check(&ctx(cfg, clean_snapshot())).expect("expected a warning");
    assert!(msg.contains("GitHub"));
}

#[test]
fn auth_treats_whitespace_credentials_as_blank() {
    let mut cfg = test_config();
    cfg.auth.github = provider(true, "   ", "secret");
    assert!(github_config_check(&ctx(cfg, clean_snapshot())).is_some());
}
