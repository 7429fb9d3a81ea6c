use std::borrow::Cow;
use std::sync::RwLock;

use super::builtin;
use super::types::{CheckContext, Problem};

/// A registered unit of evaluation. Checks return None for "no problem" or a
/// descriptive message for administrators.
pub type CheckFn = Box<dyn Fn(&CheckContext) -> Option<String> + Send + Sync>;

struct RegisteredCheck {
    name: Cow<'static, str>,
    run: CheckFn,
}

impl std::fmt::Debug for RegisteredCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredCheck")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Registry of problem checks.
///
/// Registration order is preserved and is the evaluation order. `reset`
/// restores the built-in default set (used for test isolation).
#[derive(Debug)]
pub struct ProblemCheckRegistry {
    checks: RwLock<Vec<RegisteredCheck>>,
}

impl ProblemCheckRegistry {
    /// Registry pre-populated with the built-in checks, in their
    /// canonical order.
    pub fn with_defaults() -> Self {
        Self {
            checks: RwLock::new(default_set()),
        }
    }

    /// Registry with no checks at all.
    pub fn empty() -> Self {
        Self {
            checks: RwLock::new(Vec::new()),
        }
    }

    /// Append a check. `check` can be a closure or a fn item.
    pub fn register<F>(&self, name: impl Into<Cow<'static, str>>, check: F)
    where
        F: Fn(&CheckContext) -> Option<String> + Send + Sync + 'static,
    {
        if let Ok(mut checks) = self.checks.write() {
            checks.push(RegisteredCheck {
                name: name.into(),
                run: Box::new(check),
            });
        }
    }

    /// Drop everything registered since startup and restore the built-in set.
    pub fn reset(&self) {
        if let Ok(mut checks) = self.checks.write() {
            *checks = default_set();
        }
    }

    pub fn len(&self) -> usize {
        self.checks.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of the registered checks, in evaluation order.
    pub fn names(&self) -> Vec<String> {
        self.checks
            .read()
            .map(|c| c.iter().map(|r| r.name.to_string()).collect())
            .unwrap_or_default()
    }

    /// Invoke every registered check, in registration order, collecting the
    /// ones that found a problem.
    pub fn run_all(&self, ctx: &CheckContext) -> Vec<Problem> {
        let checks = match self.checks.read() {
            Ok(g) => g,
            Err(_) => return Vec::new(), // poisoned; skip this pass
        };

        checks
            .iter()
            .filter_map(|c| (c.run)(ctx).map(|msg| Problem::new(c.name.as_ref(), msg)))
            .collect()
    }
}

/// The built-in checks, in their canonical order. `facebook`/`twitter`/
/// `github` stay separate entries so per-provider naming and ordering hold.
fn default_set() -> Vec<RegisteredCheck> {
    fn entry(name: &'static str, f: fn(&CheckContext) -> Option<String>) -> RegisteredCheck {
        RegisteredCheck {
            name: Cow::Borrowed(name),
            run: Box::new(f),
        }
    }

    vec![
        entry("deploy_env", builtin::deploy_env_check),
        entry("host_names", builtin::host_names_check),
        entry("ram", builtin::ram_check),
        entry("job_queue", builtin::job_queue_check),
        entry("facebook_config", builtin::facebook_config_check),
        entry("twitter_config", builtin::twitter_config_check),
        entry("github_config", builtin::github_config_check),
    ]
}

/// Number of built-in checks (handy for reset assertions).
pub fn default_check_count() -> usize {
    default_set().len()
}
