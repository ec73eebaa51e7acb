//! Progress reporting types for in-flight transfers.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::download::speed::Speed;

/// Progress snapshot for a single transfer, updated after every chunk.
///
/// `percentage` is measured against the declared size from the server. When
/// no size was declared the sentinel size of one byte applies, so the value
/// is not clamped and exceeds 100 freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadProgress {
    /// Full destination path (directory joined with the file name).
    pub path: PathBuf,
    /// Resolved file name being written.
    pub file_name: String,
    /// Received share of the declared size, in percent.
    pub percentage: f64,
    /// Average throughput since the transfer began.
    pub speed: Speed,
}

impl DownloadProgress {
    pub(crate) fn new(path: PathBuf, file_name: String) -> Self {
        Self {
            path,
            file_name,
            percentage: 0.0,
            speed: Speed::zero(),
        }
    }
}
