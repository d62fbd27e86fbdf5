//! Append-only audit log
//!
//! The audit log is an explicit handle owned by the caller and passed into
//! the enforcer. Each record is one line:
//!
//! ```text
//! 2024-05-01 03:00:00,123 | INFO     | ArtifactManager | Storage nominal. ...
//! ```
//!
//! Writing is best effort: a failed write is reported through `tracing` and
//! otherwise ignored, so the audit trail can never change the outcome of a run.

use chrono::{DateTime, Local};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{error, info, warn};

use crate::error::Result;

/// File name of the audit log inside the log directory
pub const LOG_FILE_NAME: &str = "execution.log";

const LOGGER_NAME: &str = "ArtifactManager";

/// Severity of an audit record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditLevel {
    Info,
    Warning,
    Error,
}

impl AuditLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditLevel::Info => "INFO",
            AuditLevel::Warning => "WARNING",
            AuditLevel::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for AuditLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Handle to the audit log sink
pub struct AuditLog {
    sink: Mutex<Option<Box<dyn Write + Send>>>,
    path: Option<PathBuf>,
}

impl AuditLog {
    /// Open `<log_dir>/execution.log` for appending, creating the directory
    pub fn open(log_dir: &Path) -> Result<Self> {
        fs::create_dir_all(log_dir)?;
        let path = log_dir.join(LOG_FILE_NAME);
        // Append mode keeps concurrent writers from clobbering each other's lines.
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            sink: Mutex::new(Some(Box::new(file))),
            path: Some(path),
        })
    }

    /// Write audit records to an arbitrary sink
    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            sink: Mutex::new(Some(Box::new(writer))),
            path: None,
        }
    }

    /// An audit log that drops every record
    pub fn disabled() -> Self {
        Self {
            sink: Mutex::new(None),
            path: None,
        }
    }

    /// Path of the backing file, when file-backed
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.record(AuditLevel::Info, message.as_ref());
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.record(AuditLevel::Warning, message.as_ref());
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.record(AuditLevel::Error, message.as_ref());
    }

    /// Append one record and mirror it to the diagnostic log
    pub fn record(&self, level: AuditLevel, message: &str) {
        match level {
            AuditLevel::Info => info!("{}", message),
            AuditLevel::Warning => warn!("{}", message),
            AuditLevel::Error => error!("{}", message),
        }

        let mut sink = self.lock();
        if let Some(writer) = sink.as_mut() {
            let line = format_line(Local::now(), level, message);
            if let Err(e) = writer.write_all(line.as_bytes()).and_then(|_| writer.flush()) {
                warn!("Failed to write audit record: {}", e);
            }
        }
    }

    /// Flush buffered records; failures are logged and ignored
    pub fn flush(&self) {
        if let Some(writer) = self.lock().as_mut() {
            if let Err(e) = writer.flush() {
                warn!("Failed to flush audit log: {}", e);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Box<dyn Write + Send>>> {
        // A panic while holding the lock leaves the writer usable.
        self.sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for AuditLog {
    fn drop(&mut self) {
        self.flush();
    }
}

impl std::fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLog").field("path", &self.path).finish()
    }
}

/// Render one audit line, newline included
pub fn format_line(timestamp: DateTime<Local>, level: AuditLevel, message: &str) -> String {
    format!(
        "{} | {:<8} | {} | {}\n",
        timestamp.format("%Y-%m-%d %H:%M:%S,%3f"),
        level,
        LOGGER_NAME,
        message
    )
}
