//! Quota enforcement pipeline
//!
//! measure -> decide -> rank -> evict -> re-measure -> report
//!
//! A run is synchronous and keeps no state between invocations. Nothing
//! coordinates concurrent runs against the same directory; callers must run
//! at most one enforcer per target directory at a time.

use std::path::Path;
use std::time::Instant;
use tracing::debug;

use crate::accountant::{directory_size_mb, scan_files};
use crate::audit::AuditLog;
use crate::config::QuotaConfig;
use crate::error::Result;
use crate::evictor::{Evictor, FileRemover, FsRemover};
use crate::planner::{decide, EvictionPlan, QuotaDecision};
use crate::report::RunReport;

/// Enforces a storage quota on a directory by LRU eviction
pub struct QuotaEnforcer<R: FileRemover = FsRemover> {
    quota: QuotaConfig,
    remover: R,
}

impl QuotaEnforcer<FsRemover> {
    /// Create an enforcer that deletes from the local filesystem
    pub fn new(quota: QuotaConfig) -> Self {
        Self::with_remover(quota, FsRemover)
    }
}

impl<R: FileRemover> QuotaEnforcer<R> {
    pub fn with_remover(quota: QuotaConfig, remover: R) -> Self {
        Self { quota, remover }
    }

    pub fn quota(&self) -> &QuotaConfig {
        &self.quota
    }

    /// Run one enforcement pass over `dir`
    ///
    /// A missing target directory yields an `Error` report. Scan failures
    /// propagate; per-file deletion failures are audited and skipped.
    pub fn run(&self, dir: &Path, audit: &AuditLog) -> Result<RunReport> {
        let started = Instant::now();
        let limit_mb = self.quota.limit_mb;

        if self.quota.target_exceeds_limit() {
            audit.warn(format!(
                "Purge target {:.2} MB is above the limit {:.2} MB; purges delete nothing.",
                self.quota.target_mb, limit_mb
            ));
        }

        if self.quota.has_negative_threshold() {
            audit.warn(format!(
                "Negative quota threshold (limit {:.2} MB, target {:.2} MB).",
                limit_mb, self.quota.target_mb
            ));
        }

        if !dir.is_dir() {
            let description = if dir.exists() {
                "Target path is not a directory."
            } else {
                "Target directory not found."
            };
            audit.error(format!("{} ({})", description, dir.display()));
            return Ok(RunReport::error(dir, limit_mb, description, started.elapsed()));
        }

        let current_mb = directory_size_mb(dir)?;

        if decide(current_mb, &self.quota) == QuotaDecision::Nominal {
            audit.info(format!(
                "Storage nominal. Current: {:.2} MB / Limit: {:.2} MB.",
                current_mb, limit_mb
            ));
            return Ok(RunReport::nominal(dir, current_mb, limit_mb, started.elapsed()));
        }

        audit.info(format!(
            "Storage quota exceeded ({:.2} MB > {:.2} MB). Initiating purge.",
            current_mb, limit_mb
        ));

        let plan = EvictionPlan::new(scan_files(dir)?, current_mb, self.quota.target_mb);
        if plan.is_noop() {
            audit.warn(format!(
                "Usage {:.2} MB is already within target {:.2} MB; no files selected.",
                current_mb, self.quota.target_mb
            ));
        }
        debug!(
            "Eviction plan: {} candidates, {:.0} bytes to recover",
            plan.candidates().len(),
            plan.bytes_to_recover()
        );

        let outcome = Evictor::new(&self.remover, audit).execute(&plan);

        // Deletions may have failed or the tree may have changed underneath us.
        let after_mb = directory_size_mb(dir)?;

        audit.info(format!(
            "GC Complete. Purged {} files. New size: {:.2} MB.",
            outcome.files_deleted, after_mb
        ));

        Ok(RunReport::purged(
            dir,
            outcome.files_deleted,
            current_mb,
            after_mb,
            limit_mb,
            started.elapsed(),
        ))
    }
}
