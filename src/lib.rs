//! fetchqueue — a concurrency-bounded download queue.
//!
//! This library downloads files over HTTP with a bounded number of
//! concurrent transfers, streaming each response body to disk and reporting
//! progress, per-item errors, and queue-drain completion through registered
//! observer callbacks.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`download`] - HTTP client, request resolution, streaming execution
//! - [`queue`] - request/item types and the aggregate queue status
//! - [`manager`] - the public [`DownloadManager`]: bounded FIFO dispatch,
//!   lifecycle operations, observer registry
//!
//! # Example
//!
//! ```no_run
//! use fetchqueue::{DownloadManager, DownloadRequest};
//!
//! # async fn example() {
//! let manager = DownloadManager::new(3);
//! manager.on_complete(|| println!("all done"));
//! manager.enqueue(DownloadRequest::new("https://example.com/report.pdf"));
//! manager.start();
//! # }
//! ```

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod manager;
pub mod queue;

// Re-export commonly used types
pub use download::{
    DownloadError, DownloadProgress, ErrorCategory, HttpClient, Speed, SpeedUnit, format_speed,
};
pub use manager::{DEFAULT_CONCURRENCY, DownloadManager};
pub use queue::{DownloadRequest, QueueStatus};
