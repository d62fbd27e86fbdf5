//! Size accounting for a target directory
//!
//! Every measurement walks the whole tree from scratch. Regular files and
//! symlinks resolving to regular files are counted; directory entries,
//! dangling links and special files never contribute to usage. Symlinked
//! directories are not descended into.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::Result;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// A regular file found during a scan
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
}

/// Convert a byte count to binary megabytes
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// Convert binary megabytes to a (possibly negative) byte count
pub fn mb_to_bytes(mb: f64) -> f64 {
    mb * BYTES_PER_MB
}

/// Collect every regular file below `root`, in walk order
///
/// A symlink is an entry when its target is a regular file; size and mtime
/// come from the target, while `path` stays the link so eviction removes the
/// link itself. The root must exist; callers check that first. Walk and
/// metadata errors on non-link entries propagate.
pub fn scan_files(root: &Path) -> Result<Vec<FileEntry>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = entry?;

        let metadata = if entry.path_is_symlink() {
            // Dangling or looping links resolve to nothing
            match fs::metadata(entry.path()) {
                Ok(metadata) if metadata.is_file() => metadata,
                _ => continue,
            }
        } else if entry.file_type().is_file() {
            entry.metadata()?
        } else {
            continue;
        };

        files.push(FileEntry {
            path: entry.into_path(),
            size: metadata.len(),
            modified: metadata.modified()?,
        });
    }

    debug!("Scanned {} files under {}", files.len(), root.display());
    Ok(files)
}

/// Total content length of all regular files below `root`
pub fn directory_size_bytes(root: &Path) -> Result<u64> {
    Ok(scan_files(root)?.iter().map(|f| f.size).sum())
}

/// Total usage below `root` in binary megabytes
pub fn directory_size_mb(root: &Path) -> Result<f64> {
    directory_size_bytes(root).map(bytes_to_mb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_empty_directory_is_zero() {
        let dir = TempDir::new().unwrap();
        assert!(scan_files(dir.path()).unwrap().is_empty());
        assert_eq!(directory_size_mb(dir.path()).unwrap(), 0.0);
    }

    #[test]
    fn test_counts_nested_files_only() {
        let dir = TempDir::new().unwrap();
        let deep = dir.path().join("a/b/c/d");
        fs::create_dir_all(&deep).unwrap();
        fs::create_dir_all(dir.path().join("empty")).unwrap();
        fs::write(dir.path().join("top.png"), vec![0u8; 1000]).unwrap();
        fs::write(deep.join("deep.png"), vec![0u8; 24]).unwrap();

        let files = scan_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(directory_size_bytes(dir.path()).unwrap(), 1024);
    }

    #[test]
    fn test_size_is_deterministic() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("x.bin"), vec![1u8; 2048]).unwrap();

        let first = directory_size_mb(dir.path()).unwrap();
        let second = directory_size_mb(dir.path()).unwrap();
        assert_eq!(first, second);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_symlinks_count_and_dangling_links_do_not() {
        let outside = TempDir::new().unwrap();
        let real = outside.path().join("real.bin");
        fs::write(&real, vec![0u8; 3000]).unwrap();

        let dir = TempDir::new().unwrap();
        let link = dir.path().join("link.bin");
        std::os::unix::fs::symlink(&real, &link).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling")).unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("dir-link")).unwrap();

        let files = scan_files(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, link);
        assert_eq!(files[0].size, 3000);
        assert_eq!(directory_size_bytes(dir.path()).unwrap(), 3000);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(scan_files(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_mb_conversions() {
        assert_eq!(bytes_to_mb(1024 * 1024), 1.0);
        assert_eq!(bytes_to_mb(0), 0.0);
        assert_eq!(mb_to_bytes(-0.5), -524288.0);
    }
}
