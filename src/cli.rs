//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use fetchqueue::DEFAULT_CONCURRENCY;

/// Download files concurrently with live progress.
///
/// fetchqueue streams each URL to disk through a bounded worker pool and
/// reports per-file progress, failures, and overall completion.
#[derive(Parser, Debug)]
#[command(name = "fetchqueue")]
#[command(author, version, about)]
pub struct Args {
    /// URLs to download (reads stdin, one per line, when omitted)
    pub urls: Vec<String>,

    /// Maximum concurrent downloads (1-100)
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY as u8, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: u8,

    /// Destination directory (defaults to ./downloads)
    #[arg(short = 'd', long)]
    pub directory: Option<PathBuf>,

    /// Emit progress and errors as JSON lines instead of progress bars
    #[arg(long)]
    pub json: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
