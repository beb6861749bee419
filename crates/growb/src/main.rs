//! GrowB command line: backs up the wiki pages of a GROWI instance into a
//! local file tree mirroring the page URL hierarchy.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use growb_engine::{
    default_backup_dir, enumerate_links, run_backup, BackupOptions, Credentials, LoginOutcome,
    OutputFormat, SessionSettings, WikiSession,
};
use growb_logging::LogDestination;

/// GrowB backs up wiki pages of a GROWI instance into the local file
/// directory. Output defaults to plain text files unless --to-md is given.
#[derive(Debug, Parser)]
#[command(name = "growb", version)]
struct Cli {
    /// URL of the GROWI instance
    url: String,

    /// Destination directory for the exported files (defaults to ~/GrowB)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Write raw page markup as .md files instead of rendered text
    #[arg(long)]
    to_md: bool,

    /// Place the snapshot in a dated subdirectory (MMddyy) of the destination
    #[arg(long)]
    dated: bool,

    /// Also write logs to growb.log in the working directory
    #[arg(long)]
    log_file: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    growb_logging::initialize(if cli.log_file {
        LogDestination::Both(Path::new("./growb.log"))
    } else {
        LogDestination::Terminal
    });

    let format = if cli.to_md {
        OutputFormat::Markup
    } else {
        OutputFormat::Text
    };

    let mut session = WikiSession::connect(&cli.url, SessionSettings::from_env())
        .with_context(|| format!("cannot open a session against {}", cli.url))?;

    let mut creds = acquire_credentials()?;
    loop {
        match session
            .authenticate(&creds)
            .context("login attempt failed")?
        {
            LoginOutcome::Success => break,
            LoginOutcome::Rejected => {
                eprintln!("Login was rejected; check your credentials and try again.");
                creds = prompt_credentials()?;
            }
        }
    }

    let links = enumerate_links(&session).context("could not enumerate wiki pages")?;
    let base_dir = resolve_base_dir(cli.path, cli.dated)?;
    log::info!("exporting into {}", base_dir.display());
    let options = BackupOptions { format, base_dir };
    let summary = run_backup(&session, links, &options).context("backup run failed")?;

    println!(
        "Wrote {} wikis in {}",
        summary.pages_written,
        summary.base_dir.display()
    );
    if summary.pages_skipped > 0 {
        println!(
            "Skipped {} pages without readable content",
            summary.pages_skipped
        );
    }
    Ok(())
}

/// Destination base directory: `-p` override, else `<home>/GrowB`, with an
/// optional dated subdirectory. Created if absent.
fn resolve_base_dir(override_path: Option<PathBuf>, dated: bool) -> Result<PathBuf> {
    let mut base = match override_path {
        Some(path) => path,
        None => {
            let dirs =
                directories::BaseDirs::new().context("cannot determine the home directory")?;
            default_backup_dir(dirs.home_dir())
        }
    };
    if dated {
        base.push(chrono::Local::now().format("%m%d%y").to_string());
    }
    std::fs::create_dir_all(&base)
        .with_context(|| format!("cannot create destination directory {}", base.display()))?;
    Ok(base)
}

/// Credentials from GROWB_USERNAME/GROWB_PASSWORD (a .env file works), or an
/// interactive prompt when either is unset.
fn acquire_credentials() -> Result<Credentials> {
    let username = std::env::var("GROWB_USERNAME")
        .ok()
        .filter(|value| !value.trim().is_empty());
    let password = std::env::var("GROWB_PASSWORD")
        .ok()
        .filter(|value| !value.is_empty());
    match (username, password) {
        (Some(username), Some(password)) => {
            Credentials::new(username, password).map_err(Into::into)
        }
        _ => prompt_credentials(),
    }
}

fn prompt_credentials() -> Result<Credentials> {
    loop {
        let username = prompt_line("username: ")?;
        let password = prompt_line("password: ")?;
        match Credentials::new(username, password) {
            Ok(creds) => return Ok(creds),
            Err(err) => eprintln!("{err}"),
        }
    }
}

fn prompt_line(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
