use crate::error::AppResult;

use crate::app::config::DeployEnv;

#[cfg(feature = "metrics")]
use prometheus::{Encoder, IntCounter, IntGauge, Opts, Registry, TextEncoder};

/// App-level metrics.
///
/// Scope:
/// - app identity & config
/// - readiness / health
/// - problem scan loop
///
/// NO per-check labels.
/// NO high-cardinality labels.
#[derive(Clone, Debug)]
pub struct AppMetrics {
    #[cfg(feature = "metrics")]
    registry: Registry,

    // --------------------------------------------------
    // Lifecycle / readiness
    // --------------------------------------------------
    #[cfg(feature = "metrics")]
    pub app_ready: IntGauge,
    #[cfg(feature = "metrics")]
    pub app_health: IntGauge,

    // --------------------------------------------------
    // Problem scan loop
    // --------------------------------------------------
    #[cfg(feature = "metrics")]
    pub probe_scans_total: IntCounter,
    #[cfg(feature = "metrics")]
    pub probe_scan_errors_total: IntCounter,
    #[cfg(feature = "metrics")]
    pub probe_problems_active: IntGauge,
    #[cfg(feature = "metrics")]
    pub probe_messages_active: IntGauge,
    #[cfg(feature = "metrics")]
    pub probe_last_scan_unix_seconds: IntGauge,

    // no-op fallback
    #[cfg(not(feature = "metrics"))]
    _noop: (),
}

impl AppMetrics {
    pub fn new(app_id: &str, env: DeployEnv, config_version: u32) -> AppResult<Self> {
        #[cfg(feature = "metrics")]
        {
            let registry = Registry::new();

            // --------------------------------------------------
            // app_info (const labels)
            // --------------------------------------------------
            let app_info = IntGauge::with_opts(
                Opts::new("app_info", "Static app identity info")
                    .const_label("app_id", app_id)
                    .const_label("env", env.as_str())
                    .const_label("config_version", config_version.to_string()),
            )?;
            app_info.set(1);
            registry.register(Box::new(app_info))?;

            let app_ready = IntGauge::with_opts(Opts::new(
                "app_ready",
                "Whether the app is ready to serve traffic (0/1)",
            ))?;
            registry.register(Box::new(app_ready.clone()))?;

            let app_health = IntGauge::with_opts(Opts::new(
                "app_health",
                "Whether the app considers itself healthy (0/1)",
            ))?;
            registry.register(Box::new(app_health.clone()))?;

            let probe_scans_total = IntCounter::with_opts(Opts::new(
                "probe_scans_total",
                "Completed problem scan passes",
            ))?;
            registry.register(Box::new(probe_scans_total.clone()))?;

            let probe_scan_errors_total = IntCounter::with_opts(Opts::new(
                "probe_scan_errors_total",
                "Scan passes that failed while sampling collaborators",
            ))?;
            registry.register(Box::new(probe_scan_errors_total.clone()))?;

            let probe_problems_active = IntGauge::with_opts(Opts::new(
                "probe_problems_active",
                "Problems reported by the most recent scan",
            ))?;
            registry.register(Box::new(probe_problems_active.clone()))?;

            let probe_messages_active = IntGauge::with_opts(Opts::new(
                "probe_messages_active",
                "Active problem-message cache entries at the most recent scan",
            ))?;
            registry.register(Box::new(probe_messages_active.clone()))?;

            let probe_last_scan_unix_seconds = IntGauge::with_opts(Opts::new(
                "probe_last_scan_unix_seconds",
                "Unix timestamp of the most recent completed scan",
            ))?;
            registry.register(Box::new(probe_last_scan_unix_seconds.clone()))?;

            Ok(Self {
                registry,
                app_ready,
                app_health,
                probe_scans_total,
                probe_scan_errors_total,
                probe_problems_active,
                probe_messages_active,
                probe_last_scan_unix_seconds,
            })
        }

        #[cfg(not(feature = "metrics"))]
        {
            let _ = (app_id, env, config_version);
            Ok(Self { _noop: () })
        }
    }

    pub fn set_ready(&self, ready: bool) {
        #[cfg(feature = "metrics")]
        self.app_ready.set(ready as i64);
        #[cfg(not(feature = "metrics"))]
        let _ = ready;
    }

    pub fn set_health(&self, healthy: bool) {
        #[cfg(feature = "metrics")]
        self.app_health.set(healthy as i64);
        #[cfg(not(feature = "metrics"))]
        let _ = healthy;
    }

    pub fn inc_scan(&self) {
        #[cfg(feature = "metrics")]
        self.probe_scans_total.inc();
    }

    pub fn inc_scan_error(&self) {
        #[cfg(feature = "metrics")]
        self.probe_scan_errors_total.inc();
    }

    pub fn set_problems_active(&self, n: usize) {
        #[cfg(feature = "metrics")]
        self.probe_problems_active.set(n as i64);
        #[cfg(not(feature = "metrics"))]
        let _ = n;
    }

    pub fn set_messages_active(&self, n: usize) {
        #[cfg(feature = "metrics")]
        self.probe_messages_active.set(n as i64);
        #[cfg(not(feature = "metrics"))]
        let _ = n;
    }

    pub fn set_last_scan_unix(&self, unix_seconds: i64) {
        #[cfg(feature = "metrics")]
        self.probe_last_scan_unix_seconds.set(unix_seconds);
        #[cfg(not(feature = "metrics"))]
        let _ = unix_seconds;
    }

    /// Encode the registry in Prometheus text format. Empty string when the
    /// metrics feature is off.
    pub fn encode_text(&self) -> AppResult<String> {
        #[cfg(feature = "metrics")]
        {
            let mut buf = Vec::new();
            let encoder = TextEncoder::new();
            encoder.encode(&self.registry.gather(), &mut buf)?;
            String::from_utf8(buf)
                .map_err(|e| crate::error::AppError::Internal(format!("metrics not UTF-8: {e}")))
        }

        #[cfg(not(feature = "metrics"))]
        {
            Ok(String::new())
        }
    }
}
