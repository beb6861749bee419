use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("destination {0} exists and is not a directory")]
    NotADirectory(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Materialize `base/segments[0]/segments[1]/...`, creating only the pieces
/// that do not already exist, and return the innermost directory.
///
/// Idempotent: pre-existing directories are never an error, so re-running
/// over the same destination tree always succeeds.
pub fn ensure_dir_tree(base: &Path, segments: &[String]) -> Result<PathBuf, PersistError> {
    fs::create_dir_all(base)?;
    let mut dir = base.to_path_buf();
    for segment in segments {
        dir.push(segment);
        match fs::create_dir(&dir) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                if !dir.is_dir() {
                    return Err(PersistError::NotADirectory(dir));
                }
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(dir)
}

/// Write `content` to `{dir}/{filename}` by writing a temp file then
/// renaming, replacing any previous file at that path. An interrupted run
/// never leaves a half-written file behind.
pub fn write_atomic(dir: &Path, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
    let target = dir.join(filename);
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;

    // Remove first so the rename also succeeds on Windows.
    if target.exists() {
        fs::remove_file(&target)?;
    }
    tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
    Ok(target)
}
