use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{path:?} has no parent directory")]
    NoParent { path: PathBuf },
    #[error("parent of {path:?} is not a directory")]
    NotADirectory { path: PathBuf },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Replaces `path` with `content` through a sibling temp file, so readers see
/// either the old or the new document and never a partial one.
pub fn write_atomically(path: &Path, content: &str) -> Result<(), PersistError> {
    let parent = match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
        Some(parent) => parent,
        None => {
            return Err(PersistError::NoParent {
                path: path.to_path_buf(),
            })
        }
    };
    if parent.exists() && !parent.is_dir() {
        return Err(PersistError::NotADirectory {
            path: path.to_path_buf(),
        });
    }
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;

    // Rename does not overwrite on every platform.
    if path.exists() {
        fs::remove_file(path)?;
    }
    tmp.persist(path).map_err(|e| PersistError::Io(e.error))?;
    Ok(())
}
