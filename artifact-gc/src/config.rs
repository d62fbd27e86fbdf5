//! Configuration for artifact-gc

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{GcError, Result};

/// Quota thresholds, both in binary megabytes
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct QuotaConfig {
    /// Ceiling: a purge starts only when usage is strictly above this
    #[serde(default = "default_limit_mb")]
    pub limit_mb: f64,
    /// Floor: a purge deletes files until usage is at or below this
    #[serde(default = "default_target_mb")]
    pub target_mb: f64,
}

/// Main garbage collector configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GcConfig {
    /// Directory to enforce the quota on
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    /// Quota thresholds
    #[serde(default)]
    pub quota: QuotaConfig,
    /// Directory holding `execution.log`
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

fn default_limit_mb() -> f64 {
    500.0
}

fn default_target_mb() -> f64 {
    450.0
}

fn default_dir() -> PathBuf {
    PathBuf::from("./output/images")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("./logs")
}

impl QuotaConfig {
    pub fn new(limit_mb: f64, target_mb: f64) -> Self {
        Self {
            limit_mb,
            target_mb,
        }
    }

    /// Reject thresholds that cannot be compared against a measured size
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("limit", self.limit_mb), ("target", self.target_mb)] {
            if !value.is_finite() {
                return Err(GcError::Config(format!(
                    "Quota {} must be a finite number of MB, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Negative thresholds are accepted; a negative target purges everything
    pub fn has_negative_threshold(&self) -> bool {
        self.limit_mb < 0.0 || self.target_mb < 0.0
    }

    /// A floor above the ceiling is accepted but makes every purge a no-op
    pub fn target_exceeds_limit(&self) -> bool {
        self.target_mb > self.limit_mb
    }
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self::new(default_limit_mb(), default_target_mb())
    }
}

impl GcConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| GcError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| GcError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.dir.as_os_str().is_empty() {
            return Err(GcError::Config("Target directory is empty".to_string()));
        }
        self.quota.validate()
    }
}

impl Default for GcConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            quota: QuotaConfig::default(),
            log_dir: default_log_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GcConfig::default();
        assert_eq!(config.dir, PathBuf::from("./output/images"));
        assert_eq!(config.log_dir, PathBuf::from("./logs"));
        assert_eq!(config.quota.limit_mb, 500.0);
        assert_eq!(config.quota.target_mb, 450.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
dir = "/var/cache/renders"

[quota]
limit_mb = 2048.0
"#;
        let config: GcConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.dir, PathBuf::from("/var/cache/renders"));
        assert_eq!(config.quota.limit_mb, 2048.0);
        assert_eq!(config.quota.target_mb, 450.0);
        assert_eq!(config.log_dir, PathBuf::from("./logs"));
    }

    #[test]
    fn test_parse_empty_config() {
        let config: GcConfig = toml::from_str("").unwrap();
        assert_eq!(config.quota, QuotaConfig::default());
    }

    #[test]
    fn test_from_file_missing() {
        let err = GcConfig::from_file(Path::new("/nonexistent/artifact-gc.toml")).unwrap_err();
        assert!(matches!(err, GcError::Config(_)));
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(QuotaConfig::new(10.0, f64::NAN).validate().is_err());
        assert!(QuotaConfig::new(f64::INFINITY, 1.0).validate().is_err());
        assert!(QuotaConfig::new(0.0, 0.0).validate().is_ok());
    }

    #[test]
    fn test_negative_thresholds_are_flagged_not_rejected() {
        let quota = QuotaConfig::new(1.0, -1.0);
        assert!(quota.validate().is_ok());
        assert!(quota.has_negative_threshold());
        assert!(QuotaConfig::new(-5.0, 0.0).has_negative_threshold());
        assert!(!QuotaConfig::default().has_negative_threshold());
    }

    #[test]
    fn test_target_above_limit_is_flagged_not_rejected() {
        let quota = QuotaConfig::new(100.0, 150.0);
        assert!(quota.validate().is_ok());
        assert!(quota.target_exceeds_limit());
        assert!(!QuotaConfig::default().target_exceeds_limit());
    }
}
