//! Filesystem utilities.
//!
//! Crash-tolerant writes for course documents and settings. A partial write
//! must never leave a draft unreadable.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::core::{CoreError, CoreResult};

/// Validates a course directory argument.
///
/// Rejects empty paths and URLs; the directory itself may not exist yet.
pub fn validate_course_dir(path: &str, label: &str) -> Result<PathBuf, String> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(format!("{label} is empty"));
    }
    if trimmed.contains("://") {
        return Err(format!("{label} must be a local directory, not a URL"));
    }
    let pb = PathBuf::from(trimmed);
    if pb.exists() && !pb.is_dir() {
        return Err(format!("{label} is not a directory: {}", pb.display()));
    }
    Ok(pb)
}

/// Write bytes to `path` using an atomic replace.
///
/// The bytes go to a sibling `.tmp` file which is synced and then renamed over
/// the destination. An existing destination is moved aside to `.bak` first and
/// restored if the final rename fails.
pub fn atomic_write_bytes(path: &Path, bytes: &[u8]) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let tmp_path = sibling_with_suffix(path, "tmp");
    {
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(bytes)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }

    replace_with(path, &tmp_path)
}

/// Write a JSON file atomically with pretty formatting.
pub fn atomic_write_json_pretty<T: serde::Serialize>(path: &Path, value: &T) -> CoreResult<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    atomic_write_bytes(path, &bytes)
}

/// Reads and decodes a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> CoreResult<T> {
    let file = File::open(path)?;
    let value = serde_json::from_reader(BufReader::new(file))?;
    Ok(value)
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| suffix.to_string());
    path.with_file_name(format!("{file_name}.{suffix}"))
}

fn replace_with(dest: &Path, src_tmp: &Path) -> CoreResult<()> {
    if !dest.exists() {
        std::fs::rename(src_tmp, dest)?;
        return Ok(());
    }

    // rename-over-existing is not portable; swap through a backup.
    let bak = sibling_with_suffix(dest, "bak");
    if bak.exists() {
        let _ = std::fs::remove_file(&bak);
    }

    std::fs::rename(dest, &bak)?;
    match std::fs::rename(src_tmp, dest) {
        Ok(()) => {
            let _ = std::fs::remove_file(&bak);
            Ok(())
        }
        Err(e) => {
            let _ = std::fs::rename(&bak, dest);
            let _ = std::fs::remove_file(src_tmp);
            Err(CoreError::IoError(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_bytes_creates_and_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("draft.json");

        atomic_write_bytes(&path, b"one").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one");

        atomic_write_bytes(&path, b"two").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "two");
        assert!(!dir.path().join("nested").join("draft.json.bak").exists());
        assert!(!dir.path().join("nested").join("draft.json.tmp").exists());
    }

    #[test]
    fn json_roundtrip_through_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("value.json");
        atomic_write_json_pretty(&path, &serde_json::json!({ "a": 1 })).unwrap();

        let value: serde_json::Value = read_json(&path).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_validate_course_dir() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();

        assert!(validate_course_dir("", "course").is_err());
        assert!(validate_course_dir("https://example.com/c", "course").is_err());
        assert!(validate_course_dir(file.to_str().unwrap(), "course").is_err());
        assert!(validate_course_dir(dir.path().to_str().unwrap(), "course").is_ok());
        assert!(validate_course_dir(dir.path().join("new").to_str().unwrap(), "course").is_ok());
    }
}
