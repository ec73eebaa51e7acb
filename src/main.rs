//! CLI entry point for the fetchqueue tool.

use std::collections::HashMap;
use std::io::{self, IsTerminal, Read};
use std::process::ExitCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use clap::Parser;
use fetchqueue::{DownloadManager, DownloadProgress, DownloadRequest};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tokio::sync::Notify;
use tracing::{debug, info, warn};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // Logs go to stderr; stdout carries the --json event lines.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    // Read input: from positional args or stdin
    let urls = if args.urls.is_empty() {
        read_urls_from_stdin()?
    } else {
        Some(args.urls.clone())
    };

    let Some(urls) = urls else {
        info!("No input provided. Pipe URLs via stdin or pass as arguments.");
        info!("Example: echo 'https://example.com/file.pdf' | fetchqueue");
        return Ok(ExitCode::SUCCESS);
    };

    if urls.is_empty() {
        info!("No URLs found in input");
        return Ok(ExitCode::SUCCESS);
    }

    let total = urls.len();
    info!(urls = total, concurrency = args.concurrency, "starting downloads");

    let manager = DownloadManager::new(usize::from(args.concurrency));
    let failed = Arc::new(AtomicUsize::new(0));
    let drained = Arc::new(Notify::new());

    register_progress_output(&manager, &args);
    register_error_output(&manager, &args, Arc::clone(&failed));

    let drained_tx = Arc::clone(&drained);
    manager.on_complete(move || drained_tx.notify_one());

    for url in urls {
        let mut request = DownloadRequest::new(url);
        if let Some(directory) = &args.directory {
            request = request.directory(directory);
        }
        manager.enqueue(request);
    }

    manager.start();
    drained.notified().await;

    let failed = failed.load(Ordering::SeqCst);
    let completed = total - failed;
    info!(completed, failed, total, "download complete");

    Ok(exit_code(completed, failed))
}

/// Reads newline-separated URLs from stdin when it is piped.
///
/// Returns `None` when stdin is a terminal (nothing to read).
fn read_urls_from_stdin() -> Result<Option<Vec<String>>> {
    if io::stdin().is_terminal() {
        return Ok(None);
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    let urls = buffer
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();
    Ok(Some(urls))
}

/// Maps completion/failure counts to the process exit code:
/// 0 when nothing failed, 1 when everything failed, 2 on partial failure.
fn exit_code(completed: usize, failed: usize) -> ExitCode {
    if failed == 0 {
        ExitCode::SUCCESS
    } else if completed > 0 {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}

/// Wires progress events to the selected output mode: JSON lines, progress
/// bars, or nothing under --quiet.
fn register_progress_output(manager: &DownloadManager, args: &Args) {
    if args.quiet {
        return;
    }

    if args.json {
        manager.on_progress(|progress| {
            if let Ok(line) = serde_json::to_string(&ProgressEvent::from(progress)) {
                println!("{line}");
            }
        });
        return;
    }

    // One bar per file, keyed by file name, created lazily on the first
    // progress event for that file.
    let bars = MultiProgress::new();
    let by_name: Mutex<HashMap<String, ProgressBar>> = Mutex::new(HashMap::new());
    manager.on_progress(move |progress| {
        let mut by_name = by_name.lock().unwrap_or_else(PoisonError::into_inner);
        let bar = by_name
            .entry(progress.file_name.clone())
            .or_insert_with(|| {
                let bar = bars.add(ProgressBar::new(100));
                bar.set_style(
                    ProgressStyle::with_template("{prefix:.bold} [{bar:30}] {pos:>3}% {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );
                bar.set_prefix(progress.file_name.clone());
                bar
            });
        // The percentage itself is unclamped; only the bar position saturates.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        bar.set_position((progress.percentage.min(100.0)) as u64);
        bar.set_message(progress.speed.to_string());
        if progress.percentage >= 100.0 {
            bar.finish();
        }
    });
}

/// Wires error events: a JSON line in --json mode, a warning otherwise, and
/// a failure count for the exit code in every mode.
fn register_error_output(manager: &DownloadManager, args: &Args, failed: Arc<AtomicUsize>) {
    let json = args.json;
    manager.on_error(move |error, request| {
        failed.fetch_add(1, Ordering::SeqCst);
        if json {
            let event = serde_json::json!({
                "event": "error",
                "url": request.url,
                "error": error.to_string(),
            });
            println!("{event}");
        } else {
            warn!(url = %request.url, error = %error, "download failed");
        }
    });
}

/// Shape of a `--json` progress line.
#[derive(serde::Serialize)]
struct ProgressEvent<'a> {
    event: &'static str,
    #[serde(flatten)]
    progress: &'a DownloadProgress,
}

impl<'a> From<&'a DownloadProgress> for ProgressEvent<'a> {
    fn from(progress: &'a DownloadProgress) -> Self {
        Self {
            event: "progress",
            progress,
        }
    }
}
