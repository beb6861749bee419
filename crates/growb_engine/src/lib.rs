//! GrowB engine: authenticated crawl-and-export pipeline for GROWI wikis.
mod backup;
mod creds;
mod dashboard;
mod dest;
mod export;
mod page;
mod persist;
mod session;
mod types;

pub use backup::{run_backup, BackupError, BackupOptions, BackupSummary};
pub use creds::{Credentials, CredentialsError};
pub use dashboard::{enumerate_links, DashboardError, PageLinks};
pub use dest::{derive_destination, DestinationPath, PathDerivationError};
pub use export::{default_backup_dir, Exporter};
pub use page::{fetch_and_extract, PageError};
pub use persist::{ensure_dir_tree, write_atomic, PersistError};
pub use session::{FetchedDocument, LoginOutcome, SessionError, SessionSettings, WikiSession};
pub use types::{ExtractedPage, OutputFormat};
