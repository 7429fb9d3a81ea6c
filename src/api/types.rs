use crate::cache::messages::MessageKey;
use crate::probes::types::{Problem, ProblemReport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct ProblemRow {
    pub check: String,
    pub message: String,
}

impl From<Problem> for ProblemRow {
    fn from(p: Problem) -> Self {
        Self {
            check: p.check,
            message: p.message,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProblemsResp {
    pub scanned_at: DateTime<Utc>,
    pub count: usize,
    pub problems: Vec<ProblemRow>,
}

impl From<ProblemReport> for ProblemsResp {
    fn from(r: ProblemReport) -> Self {
        let problems: Vec<ProblemRow> = r.problems.into_iter().map(ProblemRow::from).collect();
        Self {
            scanned_at: r.scanned_at,
            count: problems.len(),
            problems,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResp {
    pub ok: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageStateResp {
    pub key: MessageKey,
    pub active: bool,
    pub message: Option<String>,
}

/// Query for POST /messages/{key}: omit `expire_after_secs` for a message
/// that stays until cleared.
#[derive(Debug, Clone, Deserialize)]
pub struct AddMessageQuery {
    pub expire_after_secs: Option<u64>,
}
