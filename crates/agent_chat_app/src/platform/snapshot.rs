use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum SnapshotError {
    #[error("snapshot path has no parent directory: {0:?}")]
    NoParent(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Atomically replace `target` by writing a sibling temp file then renaming.
pub(crate) fn write_atomically(target: &Path, content: &str) -> Result<(), SnapshotError> {
    let dir = match target.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
        Some(parent) => parent,
        None => return Err(SnapshotError::NoParent(target.to_path_buf())),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(target).map_err(|e| SnapshotError::Io(e.error))?;
    Ok(())
}
