//! artifact-gc: storage quota enforcement for generated artifacts
//!
//! Keeps a directory of generated files (renders, images, intermediate
//! outputs) under a size quota by deleting the least recently modified files.
//!
//! # Pipeline
//!
//! - [`accountant`]: recursive size measurement of regular files
//! - [`planner`]: ceiling check, oldest-first ranking, recovery goal
//! - [`evictor`]: deletion walk tolerant of per-file failures
//! - [`report`]: the single JSON record a run emits
//! - [`audit`]: append-only `execution.log` handle
//!
//! # Example Configuration
//!
//! ```toml
//! dir = "./output/images"
//! log_dir = "./logs"
//!
//! [quota]
//! limit_mb = 500.0
//! target_mb = 450.0
//! ```

pub mod accountant;
pub mod audit;
pub mod config;
pub mod enforcer;
pub mod error;
pub mod evictor;
pub mod planner;
pub mod report;

pub use audit::AuditLog;
pub use config::{GcConfig, QuotaConfig};
pub use enforcer::QuotaEnforcer;
pub use error::{GcError, Result};
pub use evictor::{FileRemover, FsRemover};
pub use report::{RunReport, RunStatus};
