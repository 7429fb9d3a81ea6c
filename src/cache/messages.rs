use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::probes::types::Problem;

/// Keys of the known problem messages. Other subsystems (mail polling,
/// asset validation, ...) flag these when they hit trouble; the dashboard
/// surfaces the matching catalog message while the key is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKey {
    EmailPollTimeout,
    EmailPollAuthError,
    BadFaviconUrl,
}

impl MessageKey {
    /// All keys, in catalog order. Iterated instead of the map so reported
    /// order stays stable.
    pub const ALL: [MessageKey; 3] = [
        MessageKey::EmailPollTimeout,
        MessageKey::EmailPollAuthError,
        MessageKey::BadFaviconUrl,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MessageKey::EmailPollTimeout => "email_poll_timeout",
            MessageKey::EmailPollAuthError => "email_poll_auth_error",
            MessageKey::BadFaviconUrl => "bad_favicon_url",
        }
    }

    /// Catalog lookup. Stands in for the localization collaborator, which is
    /// out of scope here.
    pub fn message(self) -> &'static str {
        match self {
            MessageKey::EmailPollTimeout => {
                "Polling the incoming email account timed out. Incoming mail \
                 may not be processed until the mail server responds again."
            }
            MessageKey::EmailPollAuthError => {
                "Authentication failed while polling the incoming email \
                 account. Check the account credentials."
            }
            MessageKey::BadFaviconUrl => {
                "The configured favicon URL could not be fetched. Browsers \
                 will show a broken icon for this site."
            }
        }
    }
}

impl std::fmt::Display for MessageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| AppError::UnknownMessageKey(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy)]
struct MessageEntry {
    added_at: Instant,
    ttl: Option<Duration>,
}

impl MessageEntry {
    fn is_expired(&self, now: Instant) -> bool {
        match self.ttl {
            Some(ttl) => now.duration_since(self.added_at) >= ttl,
            None => false,
        }
    }
}

/// Keyed cache of active problem messages with optional per-key expiry.
///
/// Absence of an entry means "not a problem". Expiry is checked lazily on
/// read; there is no eviction task.
#[derive(Debug, Default)]
pub struct ProblemMessageCache {
    inner: Mutex<HashMap<MessageKey, MessageEntry>>,
}

impl ProblemMessageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a key active until explicitly cleared.
    pub fn add(&self, key: MessageKey) {
        self.insert(key, None);
    }

    /// Mark a key active for `ttl`. Re-adding overwrites any previous entry
    /// and its expiry.
    pub fn add_with_expiry(&self, key: MessageKey, ttl: Duration) {
        self.insert(key, Some(ttl));
    }

    fn insert(&self, key: MessageKey, ttl: Option<Duration>) {
        if let Ok(mut map) = self.inner.lock() {
            map.insert(
                key,
                MessageEntry {
                    added_at: Instant::now(),
                    ttl,
                },
            );
        }
    }

    /// Remove a key. Clearing a key that was never added is a no-op.
    pub fn clear(&self, key: MessageKey) {
        if let Ok(mut map) = self.inner.lock() {
            map.remove(&key);
        }
    }

    /// Catalog message if the key is active and unexpired, else None.
    /// Expired entries are dropped here.
    pub fn check(&self, key: MessageKey) -> Option<&'static str> {
        let mut map = self.inner.lock().ok()?;

        match map.get(&key) {
            Some(entry) if entry.is_expired(Instant::now()) => {
                map.remove(&key);
                None
            }
            Some(_) => Some(key.message()),
            None => None,
        }
    }

    #[inline]
    pub fn is_active(&self, key: MessageKey) -> bool {
        self.check(key).is_some()
    }

    /// All currently active messages, in catalog order, as problems.
    pub fn active_problems(&self) -> Vec<Problem> {
        MessageKey::ALL
            .into_iter()
            .filter_map(|key| self.check(key).map(|msg| Problem::new(key.as_str(), msg)))
            .collect()
    }

    pub fn active_len(&self) -> usize {
        MessageKey::ALL
            .into_iter()
            .filter(|k| self.is_active(*k))
            .count()
    }
}
