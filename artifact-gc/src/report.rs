//! Run report emitted once per invocation

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::Result;

/// Outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Usage was at or below the limit; nothing was touched
    Nominal,
    /// Usage was above the limit and the purge walk ran
    Purged,
    /// The target directory was unusable
    Error,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Nominal => write!(f, "Nominal"),
            RunStatus::Purged => write!(f, "Purged"),
            RunStatus::Error => write!(f, "Error"),
        }
    }
}

/// Machine-readable result of one run
///
/// Sizes and timing are rounded to two decimals; `quota_limit_mb` is kept as
/// supplied. Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub status: RunStatus,
    pub directory: String,
    pub files_purged: usize,
    pub size_before_mb: f64,
    pub size_after_mb: f64,
    pub quota_limit_mb: f64,
    pub execution_time_ms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn elapsed_ms(elapsed: Duration) -> f64 {
    round2(elapsed.as_secs_f64() * 1000.0)
}

impl RunReport {
    pub fn nominal(directory: &Path, size_mb: f64, limit_mb: f64, elapsed: Duration) -> Self {
        RunReport {
            status: RunStatus::Nominal,
            directory: directory.display().to_string(),
            files_purged: 0,
            size_before_mb: round2(size_mb),
            size_after_mb: round2(size_mb),
            quota_limit_mb: limit_mb,
            execution_time_ms: elapsed_ms(elapsed),
            description: None,
        }
    }

    pub fn purged(
        directory: &Path,
        files_purged: usize,
        before_mb: f64,
        after_mb: f64,
        limit_mb: f64,
        elapsed: Duration,
    ) -> Self {
        RunReport {
            status: RunStatus::Purged,
            directory: directory.display().to_string(),
            files_purged,
            size_before_mb: round2(before_mb),
            size_after_mb: round2(after_mb),
            quota_limit_mb: limit_mb,
            execution_time_ms: elapsed_ms(elapsed),
            description: None,
        }
    }

    pub fn error(
        directory: &Path,
        limit_mb: f64,
        description: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        RunReport {
            status: RunStatus::Error,
            directory: directory.display().to_string(),
            files_purged: 0,
            size_before_mb: 0.0,
            size_after_mb: 0.0,
            quota_limit_mb: limit_mb,
            execution_time_ms: elapsed_ms(elapsed),
            description: Some(description.into()),
        }
    }

    /// Serialize as a single JSON line without trailing newline
    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
