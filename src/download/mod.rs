//! HTTP download pipeline: client, request resolution, streaming execution.
//!
//! This module provides functionality for downloading files from HTTP/HTTPS
//! URLs with streaming support to handle large files efficiently.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large files)
//! - File name derivation from the URL path (query stripped, percent-decoded)
//! - Configurable timeouts (30s connect, 5min read by default)
//! - Structured error types with full context
//! - Per-chunk progress with formatted transfer rates
//!
//! # Example
//!
//! ```
//! use fetchqueue::download::format_speed;
//!
//! let speed = format_speed(1536.0);
//! assert_eq!(speed.to_string(), "1.50 KB/s");
//! ```

mod client;
mod constants;
mod error;
mod executor;
mod progress;
mod resolver;
mod speed;

pub use client::{FetchedResource, HttpClient};
pub use constants::DEFAULT_DIRECTORY;
pub use error::{DownloadError, ErrorCategory};
pub use progress::DownloadProgress;
pub use speed::{Speed, SpeedUnit, format_speed};

pub(crate) use executor::TransferExecutor;
pub(crate) use resolver::resolve;

// Note: we do NOT define module-local Result aliases here.
// Use `Result<T, DownloadError>` explicitly in function signatures.
