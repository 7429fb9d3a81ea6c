//! The built-in problem checks.
//!
//! Each check is a pure function of [`CheckContext`]: it reads the app
//! configuration and the sampled snapshot, and returns a warning string for
//! administrators, or None when everything looks fine.

use chrono::Duration;

use crate::app::config::OauthProviderSettings;
use crate::probes::types::CheckContext;

/// Warn unless the server runs in production mode.
pub fn deploy_env_check(ctx: &CheckContext) -> Option<String> {
    let env = ctx.cfg.env;
    if env.is_production() {
        return None;
    }

    Some(format!(
        "The server is running in {env} mode. Switch it to production before \
         serving real traffic."
    ))
}

/// Warn when the configured hostname is empty or still a placeholder.
pub fn host_names_check(ctx: &CheckContext) -> Option<String> {
    let host = ctx.cfg.hostname.trim();

    if host.is_empty() {
        return Some("No hostname is configured for this server.".to_string());
    }

    let is_placeholder = ctx
        .cfg
        .checks
        .placeholder_hostnames
        .iter()
        .any(|p| p.eq_ignore_ascii_case(host));

    if is_placeholder {
        Some(format!(
            "The server hostname is still the placeholder '{host}'. Update it \
             to the site's real domain."
        ))
    } else {
        None
    }
}

/// Warn when total system RAM is known and below the configured minimum.
/// Unknown RAM is not a problem.
pub fn ram_check(ctx: &CheckContext) -> Option<String> {
    let min_kb = ctx.cfg.checks.min_total_ram_kb;

    match ctx.snapshot.mem_total_kb {
        Some(total_kb) if total_kb < min_kb => Some(format!(
            "Total system memory is {total_kb} kB, below the recommended \
             minimum of {min_kb} kB. The server may run out of memory under load."
        )),
        _ => None,
    }
}

/// Warn when jobs are queued but nothing has been processed recently.
///
/// Zero queued jobs is never a problem: a long-idle worker with an empty
/// queue is healthy, not stalled.
pub fn job_queue_check(ctx: &CheckContext) -> Option<String> {
    let jobs = &ctx.snapshot.jobs;
    if jobs.queued == 0 {
        return None;
    }

    let stale_after = Duration::seconds(ctx.cfg.checks.job_queue_stale_after_secs as i64);

    match jobs.last_job_performed_at {
        Some(at) if ctx.snapshot.sampled_at - at <= stale_after => None,
        Some(at) => Some(format!(
            "{} background jobs are queued but no job has finished since {}. \
             Check that the job worker process is running.",
            jobs.queued,
            at.to_rfc3339()
        )),
        None => Some(format!(
            "{} background jobs are queued but no job has ever been processed. \
             Check that the job worker process is running.",
            jobs.queued
        )),
    }
}

pub fn facebook_config_check(ctx: &CheckContext) -> Option<String> {
    oauth_config_check("Facebook", &ctx.cfg.auth.facebook)
}

pub fn twitter_config_check(ctx: &CheckContext) -> Option<String> {
    oauth_config_check("Twitter", &ctx.cfg.auth.twitter)
}

pub fn github_config_check(ctx: &CheckContext) -> Option<String> {
    oauth_config_check("GitHub", &ctx.cfg.auth.github)
}

/// Shared logic for the OAuth provider checks: enabled logins need both a
/// client id and a client secret.
fn oauth_config_check(provider: &str, settings: &OauthProviderSettings) -> Option<String> {
    if !settings.enabled {
        return None;
    }

    if is_blank(&settings.client_id) || is_blank(&settings.client_secret) {
        Some(format!(
            "{provider} logins are enabled, but the client id or client secret \
             is not configured."
        ))
    } else {
        None
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
