//! Session saving operations.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::codec::{SessionDocument, encode};
use crate::error::{PersistenceError, Result};

/// Save a session to a `.csvt` file.
///
/// Updates the saved timestamp, then writes atomically.
pub fn save_session(document: &mut SessionDocument, path: &Path) -> Result<()> {
    document.touch();
    let bytes = encode(document)?;
    write_atomic(path, &bytes)?;

    tracing::info!(
        path = %path.display(),
        records = document.state.len(),
        "saved session"
    );
    Ok(())
}

/// Replace `path` with `bytes`.
///
/// The bytes go to a temp file next to the target, which is synced and then
/// renamed over it. On failure the previous file is left untouched and the
/// temp file is removed.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PersistenceError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let temp_path = temp_path_for(path);
    let result = write_temp(&temp_path, bytes).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|e| PersistenceError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: path.to_path_buf(),
            source: e,
        })
    });
    if result.is_err() {
        // Best effort cleanup.
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("session"));
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_temp(temp_path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(temp_path).map_err(|e| PersistenceError::Io {
        operation: "create",
        path: temp_path.to_path_buf(),
        source: e,
    })?;

    file.write_all(bytes).map_err(|e| PersistenceError::Io {
        operation: "write",
        path: temp_path.to_path_buf(),
        source: e,
    })?;

    file.sync_all().map_err(|e| PersistenceError::Io {
        operation: "sync",
        path: temp_path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_atomic_replaces_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "old").unwrap();

        write_atomic(&path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(!dir.path().join("out.csv.tmp").exists());
    }

    #[test]
    fn test_write_atomic_creates_parent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        write_atomic(&path, b"x").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_failed_rename_leaves_target_untouched() {
        let dir = tempdir().unwrap();
        // A non-empty directory cannot be replaced by a file.
        let target = dir.path().join("taken");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep.txt"), "keep").unwrap();

        let err = write_atomic(&target, b"new").unwrap_err();

        assert!(matches!(err, PersistenceError::AtomicWriteFailed { .. }));
        assert_eq!(fs::read_to_string(target.join("keep.txt")).unwrap(), "keep");
        assert!(!dir.path().join("taken.tmp").exists());
    }

    #[test]
    fn test_temp_path_is_a_sibling() {
        assert_eq!(
            temp_path_for(Path::new("/data/statement.csvt")),
            PathBuf::from("/data/statement.csvt.tmp")
        );
    }
}
