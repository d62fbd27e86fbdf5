//! Deletion walk over an eviction plan

use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::audit::AuditLog;
use crate::planner::EvictionPlan;

/// Removes a single file from storage
pub trait FileRemover {
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// Removes files from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRemover;

impl FileRemover for FsRemover {
    fn remove(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

impl<R: FileRemover + ?Sized> FileRemover for &R {
    fn remove(&self, path: &Path) -> io::Result<()> {
        (**self).remove(path)
    }
}

/// A candidate that could not be deleted
#[derive(Debug)]
pub struct DeletionFailure {
    pub path: PathBuf,
    pub error: io::Error,
}

/// What the deletion walk actually achieved
#[derive(Debug, Default)]
pub struct EvictionOutcome {
    pub files_deleted: usize,
    pub bytes_recovered: u64,
    pub failures: Vec<DeletionFailure>,
}

/// Walks a plan oldest-first, deleting until the recovery goal is met
pub struct Evictor<'a, R: FileRemover + ?Sized> {
    remover: &'a R,
    audit: &'a AuditLog,
}

impl<'a, R: FileRemover + ?Sized> Evictor<'a, R> {
    pub fn new(remover: &'a R, audit: &'a AuditLog) -> Self {
        Self { remover, audit }
    }

    /// Delete candidates in ranked order
    ///
    /// The goal is checked before each candidate. A failed deletion is
    /// recorded and audited, and the walk moves on to the next candidate.
    pub fn execute(&self, plan: &EvictionPlan) -> EvictionOutcome {
        let mut outcome = EvictionOutcome::default();

        for candidate in plan.candidates() {
            if plan.is_satisfied(outcome.bytes_recovered) {
                break;
            }

            match self.remover.remove(&candidate.path) {
                Ok(()) => {
                    debug!(
                        "Deleted {} ({} bytes)",
                        candidate.path.display(),
                        candidate.size
                    );
                    outcome.bytes_recovered += candidate.size;
                    outcome.files_deleted += 1;
                }
                Err(e) => {
                    self.audit.error(format!(
                        "Failed to delete {}: {}",
                        display_name(&candidate.path),
                        e
                    ));
                    outcome.failures.push(DeletionFailure {
                        path: candidate.path.clone(),
                        error: e,
                    });
                }
            }
        }

        outcome
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
