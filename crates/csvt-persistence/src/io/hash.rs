//! Source file hashing for change detection.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{PersistenceError, Result};
use crate::types::SourceSnapshot;

/// Compute the SHA-256 of a file as lowercase hex.
pub fn compute_file_hash(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| PersistenceError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut hasher = Sha256::new();
    io::copy(&mut BufReader::new(file), &mut hasher).map_err(|e| PersistenceError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(hex::encode(hasher.finalize()))
}

/// Whether a file still hashes to `expected_hash`.
pub fn verify_file_hash(path: &Path, expected_hash: &str) -> Result<bool> {
    Ok(compute_file_hash(path)? == expected_hash)
}

/// State of a session's source file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    Unchanged,
    Changed,
    Missing,
}

impl SourceSnapshot {
    /// Compare the file on disk with the recorded hash.
    pub fn status(&self) -> Result<SourceStatus> {
        let path = Path::new(&self.path);
        if !path.exists() {
            return Ok(SourceStatus::Missing);
        }
        Ok(if verify_file_hash(path, &self.sha256)? {
            SourceStatus::Unchanged
        } else {
            SourceStatus::Changed
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csvt_ingest::CsvOptions;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_compute_file_hash() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        fs::write(&path, b"Hello, World!").unwrap();

        assert_eq!(
            compute_file_hash(&path).unwrap(),
            "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
        );
    }

    #[test]
    fn test_source_status() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("statement.csv");
        fs::write(&path, "desc\nbread\n").unwrap();

        let hash = compute_file_hash(&path).unwrap();
        let source = SourceSnapshot::new(&path, hash, CsvOptions::default());
        assert_eq!(source.status().unwrap(), SourceStatus::Unchanged);

        fs::write(&path, "desc\nbread\nrent\n").unwrap();
        assert_eq!(source.status().unwrap(), SourceStatus::Changed);
        assert!(!verify_file_hash(&path, &source.sha256).unwrap());

        fs::remove_file(&path).unwrap();
        assert_eq!(source.status().unwrap(), SourceStatus::Missing);
    }
}
