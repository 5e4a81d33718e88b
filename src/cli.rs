use anyhow::{Context, Result, bail};
use clap::Parser;
use clap::error::ErrorKind;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// Terminal hex editor.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// File to edit
    pub path: PathBuf,

    /// Append logs to this file instead of discarding them
    #[arg(long, value_name = "FILE", env = "HEXPAD_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Milliseconds to wait for input before the loop comes round again
    #[arg(long, value_name = "MS", env = "HEXPAD_POLL_MS", default_value_t = 100)]
    pub poll_ms: u64,
}

impl Args {
    pub fn config(&self) -> hexpad_client::Config {
        hexpad_client::Config {
            poll_timeout: Duration::from_millis(self.poll_ms),
        }
    }
}

/// How the target file can be accessed.
#[derive(Debug, PartialEq, Eq)]
pub enum Access {
    ReadWrite,
    /// Exists but cannot be opened for both reading and writing.
    Limited,
}

/// Fail if `path` does not exist; otherwise report how it can be opened.
pub fn check_path(path: &Path) -> Result<Access> {
    if !path.exists() {
        bail!("File not found at '{}'", path.display());
    }
    // The handle is dropped immediately; opening for write does not truncate.
    match OpenOptions::new().read(true).write(true).open(path) {
        Ok(_) => Ok(Access::ReadWrite),
        Err(_) => Ok(Access::Limited),
    }
}

/// Install the global tracing subscriber.
///
/// The terminal belongs to the editor, so logs only go to `log_file` when one
/// is given and are dropped otherwise.
pub fn init_logging(log_file: Option<&Path>) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file '{}'", path.display()))?;
            let subscriber = fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .finish();
            let _ = tracing::subscriber::set_global_default(subscriber);
        }
        None => {
            let subscriber = fmt()
                .with_env_filter(filter)
                .with_writer(std::io::sink)
                .finish();
            let _ = tracing::subscriber::set_global_default(subscriber);
        }
    }
    Ok(())
}

/// Parse arguments, exiting with status 1 on a usage error.
pub fn parse_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let _ = err.print();
            std::process::exit(1);
        }
    }
}

pub fn run() -> Result<()> {
    run_with_args(parse_args())
}

fn run_with_args(args: Args) -> Result<()> {
    init_logging(args.log_file.as_deref())?;
    if check_path(&args.path)? == Access::Limited {
        eprintln!(
            "Warning: '{}' is not readable and writable; saving may fail.",
            args.path.display()
        );
        tracing::warn!(path = %args.path.display(), "file not readable and writable");
    }
    tracing::info!(path = %args.path.display(), poll_ms = args.poll_ms, "starting editor");
    hexpad_client::run(&args.path, args.config())
}
