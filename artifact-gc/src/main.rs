//! artifact-gc: Artifact Garbage Collection
//!
//! Enforces a storage quota on a directory of generated files and prints a
//! single JSON report line to stdout.
//!
//! # Usage
//!
//! ```bash
//! # Defaults: ./output/images, limit 500 MB, target 450 MB
//! artifact-gc
//!
//! # Explicit thresholds
//! artifact-gc --dir /srv/renders --limit 2048 --target 1536
//!
//! # Settings from a TOML file, with a flag override
//! artifact-gc --config gc.toml --limit 1024
//! ```

use anyhow::Context;
use artifact_gc::{AuditLog, GcConfig, QuotaEnforcer};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "artifact-gc", version)]
#[command(about = "Artifact Garbage Collection", long_about = None)]
struct Cli {
    /// Target directory for GC [default: ./output/images]
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Maximum storage threshold in MB [default: 500.0]
    #[arg(short, long, allow_negative_numbers = true)]
    limit: Option<f64>,

    /// Target storage size in MB after purge [default: 450.0]
    #[arg(short, long, allow_negative_numbers = true)]
    target: Option<f64>,

    /// TOML configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for execution.log [default: ./logs]
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<GcConfig> {
        let mut config = match &self.config {
            Some(path) => GcConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => GcConfig::default(),
        };

        if let Some(dir) = self.dir {
            config.dir = dir;
        }
        if let Some(limit) = self.limit {
            config.quota.limit_mb = limit;
        }
        if let Some(target) = self.target {
            config.quota.target_mb = target;
        }
        if let Some(log_dir) = self.log_dir {
            config.log_dir = log_dir;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr; stdout carries only the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "artifact_gc=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Cli::parse().into_config()?;
    info!(
        "Enforcing {:.2} MB limit (target {:.2} MB) on {}",
        config.quota.limit_mb,
        config.quota.target_mb,
        config.dir.display()
    );

    let audit = match AuditLog::open(&config.log_dir) {
        Ok(audit) => audit,
        Err(e) => {
            warn!(
                "Audit log unavailable at {}: {}",
                config.log_dir.display(),
                e
            );
            AuditLog::disabled()
        }
    };

    let enforcer = QuotaEnforcer::new(config.quota);
    let report = enforcer.run(&config.dir, &audit)?;
    audit.flush();

    println!("{}", report.to_json_line()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("artifact-gc").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).into_config().unwrap();
        assert_eq!(config.dir, PathBuf::from("./output/images"));
        assert_eq!(config.quota.limit_mb, 500.0);
        assert_eq!(config.quota.target_mb, 450.0);
        assert_eq!(config.log_dir, PathBuf::from("./logs"));
    }

    #[test]
    fn test_short_flags() {
        let config = parse(&["-d", "/tmp/renders", "-l", "10", "-t", "5.5"])
            .into_config()
            .unwrap();
        assert_eq!(config.dir, PathBuf::from("/tmp/renders"));
        assert_eq!(config.quota.limit_mb, 10.0);
        assert_eq!(config.quota.target_mb, 5.5);
    }

    #[test]
    fn test_flags_override_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gc.toml");
        fs::write(
            &path,
            "dir = \"/from/file\"\n[quota]\nlimit_mb = 100.0\ntarget_mb = 80.0\n",
        )
        .unwrap();

        let config = parse(&["--config", path.to_str().unwrap(), "--limit", "200"])
            .into_config()
            .unwrap();
        assert_eq!(config.dir, PathBuf::from("/from/file"));
        assert_eq!(config.quota.limit_mb, 200.0);
        assert_eq!(config.quota.target_mb, 80.0);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        assert!(parse(&["--limit", "NaN"]).into_config().is_err());
    }

    #[test]
    fn test_negative_thresholds_parse() {
        let config = parse(&["-d", "img", "-l", "1", "-t", "-1"])
            .into_config()
            .unwrap();
        assert_eq!(config.quota.limit_mb, 1.0);
        assert_eq!(config.quota.target_mb, -1.0);

        let config = parse(&["--target=-2.5", "--limit", "-3"]).into_config().unwrap();
        assert_eq!(config.quota.target_mb, -2.5);
        assert_eq!(config.quota.limit_mb, -3.0);
    }
}
