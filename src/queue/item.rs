//! Queue item types and per-item lifecycle states.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A download request accepted by the queue.
///
/// Only the URL is required. The directory defaults to `./downloads` and the
/// file name is derived from the URL path when not given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    /// Source URL to fetch.
    pub url: String,
    /// Destination directory; created recursively when missing.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    /// Destination file name; overrides URL-based derivation.
    #[serde(default)]
    pub file_name: Option<String>,
}

impl DownloadRequest {
    /// Creates a request for `url` with default directory and derived name.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            directory: None,
            file_name: None,
        }
    }

    /// Sets the destination directory.
    #[must_use]
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Sets an explicit destination file name.
    #[must_use]
    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

/// A request whose destination directory and file name are fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedRequest {
    /// Source URL, unchanged from the request.
    pub(crate) url: String,
    /// Concrete destination directory (already created).
    pub(crate) directory: PathBuf,
    /// Concrete file name.
    pub(crate) file_name: String,
}

impl ResolvedRequest {
    /// Full destination path for the transfer.
    pub(crate) fn destination(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

/// Lifecycle state of a single queue item.
///
/// Legal transitions: `Queued → Resolved → Transferring → Completed`,
/// with `Failed` reachable from `Queued` (resolution failure) and from
/// `Transferring` (transfer failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ItemState {
    /// Accepted, not yet admitted for processing.
    Queued,
    /// Destination directory and file name fixed.
    Resolved,
    /// Body streaming to disk.
    Transferring,
    /// Transfer finished and flushed.
    Completed,
    /// Resolution or transfer failed.
    Failed,
}

impl ItemState {
    /// Returns the log string representation.
    #[must_use]
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Resolved => "resolved",
            Self::Transferring => "transferring",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// True once the item can no longer change state.
    #[must_use]
    pub(crate) fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether `next` is a legal successor of this state.
    pub(crate) fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Queued, Self::Resolved)
                | (Self::Queued, Self::Failed)
                | (Self::Resolved, Self::Transferring)
                | (Self::Transferring, Self::Completed)
                | (Self::Transferring, Self::Failed)
        )
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single request tracked through the queue, with a process-local id used
/// for log correlation.
#[derive(Debug)]
pub(crate) struct QueueItem {
    pub(crate) id: u64,
    pub(crate) request: DownloadRequest,
    state: ItemState,
}

impl QueueItem {
    pub(crate) fn new(id: u64, request: DownloadRequest) -> Self {
        Self {
            id,
            request,
            state: ItemState::Queued,
        }
    }

    pub(crate) fn state(&self) -> ItemState {
        self.state
    }

    /// Advances the lifecycle state. The transition table is asserted in
    /// debug builds.
    pub(crate) fn advance(&mut self, next: ItemState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal item transition {} -> {}",
            self.state,
            next
        );
        self.state = next;
    }
}
