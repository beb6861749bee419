use std::path::PathBuf;

use thiserror::Error;

use crate::dashboard::PageLinks;
use crate::dest::{derive_destination, PathDerivationError};
use crate::export::Exporter;
use crate::page::fetch_and_extract;
use crate::persist::PersistError;
use crate::session::WikiSession;
use crate::types::OutputFormat;

/// Failures that abort a backup run. Per-page fetch and extraction problems
/// never end up here; they are converted to skips inside the loop.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error(transparent)]
    Path(#[from] PathDerivationError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Options for one backup run.
#[derive(Debug, Clone)]
pub struct BackupOptions {
    pub format: OutputFormat,
    pub base_dir: PathBuf,
}

/// What a finished, non-fatal run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupSummary {
    pub pages_written: usize,
    pub pages_skipped: usize,
    pub base_dir: PathBuf,
}

/// Drive the crawl: one page at a time, in dashboard order.
///
/// Each link is fetched, extracted, mapped to a destination path and written
/// out before the next link is touched. A page without readable content (or
/// that fails to fetch) is logged and skipped. A page URL outside the wiki
/// root, or a filesystem failure, aborts the run.
pub fn run_backup(
    session: &WikiSession,
    links: PageLinks,
    options: &BackupOptions,
) -> Result<BackupSummary, BackupError> {
    let mut exporter = Exporter::new(options.base_dir.clone());
    let mut pages_skipped = 0usize;

    for link in links {
        let page = match fetch_and_extract(session, &link, options.format) {
            Ok(page) => page,
            Err(err) => {
                log::warn!("skipping {link}: {err}");
                pages_skipped += 1;
                continue;
            }
        };

        let dest = match derive_destination(session.root_url(), &page.resolved_url, options.format)
        {
            Ok(dest) => dest,
            Err(err @ PathDerivationError::OutsideRoot { .. }) => return Err(err.into()),
            Err(err) => {
                // A link to the instance root has no filename to derive.
                log::warn!("skipping {link}: {err}");
                pages_skipped += 1;
                continue;
            }
        };

        exporter.export(&page, &dest)?;
    }

    let summary = BackupSummary {
        pages_written: exporter.pages_written(),
        pages_skipped,
        base_dir: exporter.base_dir().to_path_buf(),
    };
    log::info!(
        "wrote {} wikis in {} ({} skipped)",
        summary.pages_written,
        summary.base_dir.display(),
        summary.pages_skipped
    );
    Ok(summary)
}
