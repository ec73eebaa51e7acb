//! Queue types: requests, items, and aggregate status.
//!
//! The queue itself is in-memory FIFO state owned by the manager; this
//! module holds the data types that flow through it.
//!
//! # Overview
//!
//! - [`DownloadRequest`] - what callers enqueue
//! - [`QueueStatus`] - aggregate queue status label
//! - `QueueItem` / `ItemState` - crate-internal per-item tracking
//!
//! # Example
//!
//! ```
//! use fetchqueue::queue::DownloadRequest;
//!
//! let request = DownloadRequest::new("https://example.com/report.pdf")
//!     .directory("/tmp/reports")
//!     .file_name("q3.pdf");
//! assert_eq!(request.file_name.as_deref(), Some("q3.pdf"));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

mod item;

pub use item::DownloadRequest;
pub(crate) use item::{ItemState, QueueItem, ResolvedRequest};

/// Aggregate status of the download queue.
///
/// This is a label describing the most recent queue-level event, not a
/// per-item state: a failed item sets `Failed`, and the drain that follows
/// overwrites it with `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    /// Created, not started yet.
    Queued,
    /// Admission is open and items have been dispatched.
    Downloading,
    /// Admission suspended; in-flight items keep running.
    Paused,
    /// The queue drained (all admitted items reached a terminal state).
    Completed,
    /// An item failed since the last drain.
    Failed,
    /// The queue was canceled and pending items discarded.
    Canceled,
}

impl QueueStatus {
    /// Returns the status label string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Downloading => "downloading",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
        }
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
