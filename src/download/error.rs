//! Error types for the download pipeline.
//!
//! This module defines structured errors for request resolution and transfer
//! execution, providing context-rich messages for debugging and user
//! feedback, plus a coarse category used when reporting failures.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a [`DownloadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request could not be resolved to a destination.
    InvalidRequest,
    /// The destination directory could not be created.
    Directory,
    /// The transfer failed while contacting the server or writing to disk.
    Transfer,
}

/// Errors that can occur while resolving or executing a download.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// No file name was given and none could be derived from the URL path.
    #[error("no file name derivable from {url}")]
    NoFileName {
        /// The URL whose path yields no final segment.
        url: String,
    },

    /// The destination directory could not be created.
    #[error("cannot create directory {path}: {source}")]
    Directory {
        /// The directory that failed to be created.
        path: PathBuf,
        /// The underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors,
    /// mid-stream disconnects, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error while writing the downloaded bytes.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a missing file name error.
    pub fn no_file_name(url: impl Into<String>) -> Self {
        Self::NoFileName { url: url.into() }
    }

    /// Creates a directory creation error.
    pub fn directory(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Directory {
            path: path.into(),
            source,
        }
    }

    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the coarse category this error belongs to.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidUrl { .. } | Self::NoFileName { .. } => ErrorCategory::InvalidRequest,
            Self::Directory { .. } => ErrorCategory::Directory,
            Self::Network { .. } | Self::Timeout { .. } | Self::HttpStatus { .. } | Self::Io { .. } => {
                ErrorCategory::Transfer
            }
        }
    }
}

// Note on From trait implementations:
// We intentionally do NOT implement `From<reqwest::Error>` or `From<std::io::Error>`
// because our error variants require context (url, path) that the source errors
// don't provide. The helper constructor methods (network(), io(), etc.) are the
// correct pattern here as they allow callers to provide necessary context.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_display() {
        let error = DownloadError::invalid_url("not-a-url");
        let msg = error.to_string();
        assert!(
            msg.contains("invalid URL"),
            "Expected 'invalid URL' in: {msg}"
        );
        assert!(msg.contains("not-a-url"), "Expected URL in: {msg}");
    }

    #[test]
    fn test_no_file_name_display() {
        let error = DownloadError::no_file_name("https://example.com/files/");
        let msg = error.to_string();
        assert!(
            msg.contains("no file name"),
            "Expected 'no file name' in: {msg}"
        );
        assert!(
            msg.contains("https://example.com/files/"),
            "Expected URL in: {msg}"
        );
    }

    #[test]
    fn test_directory_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error = DownloadError::directory(PathBuf::from("/var/denied"), io_error);
        let msg = error.to_string();
        assert!(msg.contains("/var/denied"), "Expected path in: {msg}");
        assert!(msg.contains("access denied"), "Expected source in: {msg}");
    }

    #[test]
    fn test_timeout_display() {
        let error = DownloadError::timeout("https://example.com/file.pdf");
        assert!(error.to_string().contains("timeout"));
        assert!(error.to_string().contains("https://example.com/file.pdf"));
    }

    #[test]
    fn test_http_status_display() {
        let error = DownloadError::http_status("https://example.com/file.pdf", 404);
        let msg = error.to_string();
        assert!(msg.contains("404"), "Expected '404' in: {msg}");
        assert!(
            msg.contains("https://example.com/file.pdf"),
            "Expected URL in: {msg}"
        );
    }

    #[test]
    fn test_io_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error = DownloadError::io(PathBuf::from("/tmp/test.pdf"), io_error);
        let msg = error.to_string();
        assert!(msg.contains("/tmp/test.pdf"), "Expected path in: {msg}");
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            DownloadError::invalid_url("x").category(),
            ErrorCategory::InvalidRequest
        );
        assert_eq!(
            DownloadError::no_file_name("https://example.com/").category(),
            ErrorCategory::InvalidRequest
        );
        assert_eq!(
            DownloadError::directory(
                PathBuf::from("/x"),
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied")
            )
            .category(),
            ErrorCategory::Directory
        );
        assert_eq!(
            DownloadError::timeout("https://example.com/a").category(),
            ErrorCategory::Transfer
        );
        assert_eq!(
            DownloadError::http_status("https://example.com/a", 500).category(),
            ErrorCategory::Transfer
        );
        assert_eq!(
            DownloadError::io(
                PathBuf::from("/x"),
                std::io::Error::new(std::io::ErrorKind::Other, "disk full")
            )
            .category(),
            ErrorCategory::Transfer
        );
    }
}
