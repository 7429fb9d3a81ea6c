//! Shared builders for the cross-module tests.

use std::sync::Arc;

use chrono::Utc;

use crate::app::config::{
    AppConfig, AuthConfig, ChecksConfig, DeployEnv, LoggingConfig, MetricsConfig,
    OauthProviderSettings,
};
use crate::probes::types::{CheckContext, JobQueueSnapshot, ProbeSnapshot};
use crate::redis::config::RedisConfig;

pub fn provider(enabled: bool, client_id: &str, client_secret: &str) -> OauthProviderSettings {
    OauthProviderSettings {
        enabled,
        client_id: client_id.to_string(),
        client_secret: client_secret.to_string(),
    }
}

/// A production config with a real hostname, plenty of RAM and every
/// provider disabled: all built-in checks pass against it.
pub fn test_config() -> AppConfig {
    AppConfig {
        id: "admin-probes-test".to_string(),
        env: DeployEnv::Production,
        config_version: 1,
        hostname: "forum.example.com".to_string(),
        logging: LoggingConfig {
            level: "info".to_string(),
        },
        metrics: MetricsConfig { enabled: true },
        checks: ChecksConfig {
            enabled: true,
            scan_interval_ms: 100,
            min_total_ram_kb: 1_000_000,
            job_queue_stale_after_secs: 120,
            placeholder_hostnames: vec![
                "localhost".to_string(),
                "production.localhost".to_string(),
            ],
        },
        redis: RedisConfig {
            enabled: false,
            uri: "redis://127.0.0.1:6379/0".to_string(),
            connect_timeout_ms: 2000,
            command_timeout_ms: 1000,
            queue_key: "jobs:default".to_string(),
            last_performed_at_key: "jobs:last_performed_at".to_string(),
        },
        auth: AuthConfig {
            facebook: provider(false, "", ""),
            twitter: provider(false, "", ""),
            github: provider(false, "", ""),
        },
    }
}

/// Snapshot that trips nothing: enough RAM, empty queue.
pub fn clean_snapshot() -> ProbeSnapshot {
    ProbeSnapshot {
        mem_total_kb: Some(2_000_000),
        jobs: JobQueueSnapshot::default(),
        sampled_at: Utc::now(),
    }
}

pub fn ctx(cfg: AppConfig, snapshot: ProbeSnapshot) -> CheckContext {
    CheckContext::new(Arc::new(cfg), snapshot)
}

pub fn clean_ctx() -> CheckContext {
    ctx(test_config(), clean_snapshot())
}
