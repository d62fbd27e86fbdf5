//! Quota decision and eviction ranking

use crate::accountant::{mb_to_bytes, FileEntry};
use crate::config::QuotaConfig;

/// Result of comparing measured usage against the ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    /// Usage is at or below the limit
    Nominal,
    /// Usage is strictly above the limit
    OverQuota,
}

/// Decide whether a purge is required
pub fn decide(current_mb: f64, quota: &QuotaConfig) -> QuotaDecision {
    if current_mb <= quota.limit_mb {
        QuotaDecision::Nominal
    } else {
        QuotaDecision::OverQuota
    }
}

/// Sort entries oldest-first by modification time
///
/// The sort is stable, so entries with identical timestamps stay in scan
/// order. No secondary key is applied.
pub fn rank_oldest_first(entries: &mut [FileEntry]) {
    entries.sort_by_key(|entry| entry.modified);
}

/// Ranked candidates plus the number of bytes the purge must recover
#[derive(Debug, Clone)]
pub struct EvictionPlan {
    candidates: Vec<FileEntry>,
    bytes_to_recover: f64,
}

impl EvictionPlan {
    /// Rank `entries` and compute how far usage must drop to reach `target_mb`
    ///
    /// `bytes_to_recover` is negative when usage is already below the target,
    /// in which case the plan is satisfied before the first candidate.
    pub fn new(mut entries: Vec<FileEntry>, current_mb: f64, target_mb: f64) -> Self {
        rank_oldest_first(&mut entries);
        Self {
            candidates: entries,
            bytes_to_recover: mb_to_bytes(current_mb - target_mb),
        }
    }

    /// Candidates in eviction order
    pub fn candidates(&self) -> &[FileEntry] {
        &self.candidates
    }

    pub fn bytes_to_recover(&self) -> f64 {
        self.bytes_to_recover
    }

    /// Whether `recovered` bytes already reach the goal
    pub fn is_satisfied(&self, recovered: u64) -> bool {
        recovered as f64 >= self.bytes_to_recover
    }

    /// True when no deletion can be required at all
    pub fn is_noop(&self) -> bool {
        self.is_satisfied(0)
    }
}
