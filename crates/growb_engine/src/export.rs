use std::path::{Path, PathBuf};

use crate::dest::DestinationPath;
use crate::persist::{ensure_dir_tree, write_atomic, PersistError};
use crate::types::ExtractedPage;

/// Well-known directory name for backups under the user's home.
const DEFAULT_DIR_NAME: &str = "GrowB";

/// Default backup destination for a given home directory: `<home>/GrowB`.
///
/// Pure function of the injected home path; the caller decides where "home"
/// is and creates the directory if absent.
pub fn default_backup_dir(home: &Path) -> PathBuf {
    home.join(DEFAULT_DIR_NAME)
}

/// Writes extracted pages under a base directory and counts what it wrote.
///
/// Re-running over the same destination replaces files one by one; the
/// export is never additive.
pub struct Exporter {
    base_dir: PathBuf,
    pages_written: usize,
}

impl Exporter {
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            pages_written: 0,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Running count of files written so far.
    pub fn pages_written(&self) -> usize {
        self.pages_written
    }

    /// Materialize the destination directories and write the page content,
    /// overwriting any previous snapshot of the same page.
    pub fn export(
        &mut self,
        page: &ExtractedPage,
        dest: &DestinationPath,
    ) -> Result<PathBuf, PersistError> {
        let dir = ensure_dir_tree(&self.base_dir, &dest.directory_segments)?;
        let path = write_atomic(&dir, &dest.filename, &page.content)?;
        self.pages_written += 1;
        log::debug!("wrote {}", path.display());
        Ok(path)
    }
}
