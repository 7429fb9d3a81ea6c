use crate::error::{AppError, AppResult};
use crate::redis::config::RedisConfig;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub id: String,
    pub env: DeployEnv,
    pub config_version: u32,

    /// The hostname this deployment believes it serves. Treated as an
    /// external collaborator's answer; the host_names check judges it.
    pub hostname: String,

    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,

    pub checks: ChecksConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
}

/// Deployment mode of the surrounding application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployEnv {
    Production,
    Development,
    Test,
}

impl DeployEnv {
    #[inline]
    pub fn is_production(self) -> bool {
        matches!(self, DeployEnv::Production)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeployEnv::Production => "production",
            DeployEnv::Development => "development",
            DeployEnv::Test => "test",
        }
    }
}

impl std::fmt::Display for DeployEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChecksConfig {
    pub enabled: bool,

    /// How often the background scan loop evaluates all checks.
    pub scan_interval_ms: u64,

    /// ram_check threshold: total system RAM below this is a problem.
    pub min_total_ram_kb: u64,

    /// job_queue_check: with jobs queued, no job finishing within this
    /// window means the worker looks stalled.
    pub job_queue_stale_after_secs: u64,

    /// host_names_check: hostnames that mean "nobody configured this yet".
    pub placeholder_hostnames: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    pub facebook: OauthProviderSettings,
    pub twitter: OauthProviderSettings,
    pub github: OauthProviderSettings,
}

/// Login-provider credentials as stored in the settings store.
#[derive(Debug, Clone, Deserialize)]
pub struct OauthProviderSettings {
    pub enabled: bool,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
}

fn validate_config(cfg: &AppConfig) -> AppResult<()> {
    if cfg.id.is_empty() {
        return Err(AppError::MissingConfig("id"));
    }

    if cfg.config_version == 0 {
        return Err(AppError::InvalidConfig(
            "config_version must be >= 1".into(),
        ));
    }

    if cfg.logging.level.trim().is_empty() {
        return Err(AppError::InvalidConfig(
            "logging.level must not be empty".into(),
        ));
    }

    validate_checks_config(&cfg.checks)?;
    cfg.redis.validate()?;

    Ok(())
}

fn validate_checks_config(checks: &ChecksConfig) -> AppResult<()> {
    if checks.scan_interval_ms == 0 {
        return Err(AppError::InvalidConfig(
            "checks.scan_interval_ms must be > 0".into(),
        ));
    }

    // guard against "why does my dashboard hammer the queue" misconfigs
    if checks.scan_interval_ms < 100 {
        return Err(AppError::InvalidConfig(
            "checks.scan_interval_ms must be >= 100".into(),
        ));
    }

    if checks.min_total_ram_kb == 0 {
        return Err(AppError::InvalidConfig(
            "checks.min_total_ram_kb must be > 0".into(),
        ));
    }

    if checks.job_queue_stale_after_secs == 0 {
        return Err(AppError::InvalidConfig(
            "checks.job_queue_stale_after_secs must be > 0".into(),
        ));
    }

    if checks.placeholder_hostnames.is_empty() {
        return Err(AppError::InvalidConfig(
            "checks.placeholder_hostnames must list at least one hostname".into(),
        ));
    }

    for h in &checks.placeholder_hostnames {
        if h.trim().is_empty() {
            return Err(AppError::InvalidConfig(
                "checks.placeholder_hostnames entries must not be empty".into(),
            ));
        }
    }

    Ok(())
}

const APP_CONFIG_ENV_VAR: &str = "ADMIN_PROBES_APP_CONFIG_PATH";

fn default_config_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("src")
        .join("config")
        .join("app.toml")
}

/// Load and validate the app config.
///
/// With `from_env` set, `ADMIN_PROBES_APP_CONFIG_PATH` overrides the
/// default in-tree path (the usual deployment setup mounts the file and
/// exports the variable).
pub fn load_app_config(from_env: bool) -> AppResult<AppConfig> {
    let (path, source): (PathBuf, &'static str) = if from_env {
        match std::env::var(APP_CONFIG_ENV_VAR) {
            Ok(p) => (PathBuf::from(p), "env var"),
            Err(std::env::VarError::NotPresent) => {
                (default_config_path(), "default path (env var not set)")
            }
            Err(std::env::VarError::NotUnicode(_)) => {
                return Err(AppError::InvalidConfig(format!(
                    "app config path env var `{APP_CONFIG_ENV_VAR}` is not valid unicode; \
                     set it to a UTF-8 path"
                )));
            }
        }
    } else {
        (default_config_path(), "local default")
    };

    let contents = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AppError::InvalidConfig(format!(
            "app config file not found\n\
             ├─ tried path: `{}`\n\
             ├─ source: {}\n\
             └─ fix: create the file OR export {}=/absolute/path/to/app.toml",
            path.display(),
            source,
            APP_CONFIG_ENV_VAR
        )),
        ErrorKind::PermissionDenied => AppError::InvalidConfig(format!(
            "app config file is not readable (permission denied)\n\
             ├─ path: `{}`\n\
             └─ os error: {}",
            path.display(),
            e
        )),
        _ => AppError::ConfigIo(e),
    })?;

    let config: AppConfig = toml::from_str(&contents).map_err(AppError::ConfigToml)?;

    validate_config(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_and_validate_default_app_config() {
        let cfg = load_app_config(false).expect("failed to load app config");

        assert!(!cfg.id.is_empty());
        assert!(cfg.config_version >= 1);
        assert!(cfg.checks.scan_interval_ms >= 100);
        assert!(cfg.checks.min_total_ram_kb > 0);
        assert!(!cfg.checks.placeholder_hostnames.is_empty());

        // the default config ships with redis disabled so the binary starts
        // without external services
        assert!(!cfg.redis.enabled);

        println!("id = {}", cfg.id);
        println!("env = {}", cfg.env);
        println!(
            "checks: interval_ms={}, min_ram_kb={}, stale_after_secs={}",
            cfg.checks.scan_interval_ms,
            cfg.checks.min_total_ram_kb,
            cfg.checks.job_queue_stale_after_secs
        );
    }

    #[test]
    fn deploy_env_parses_lowercase_names() {
        let env: DeployEnv = serde_json::from_str("\"production\"").unwrap();
        assert!(env.is_production());

        let env: DeployEnv = serde_json::from_str("\"development\"").unwrap();
        assert_eq!(env, DeployEnv::Development);
        assert_eq!(env.to_string(), "development");
    }
}
