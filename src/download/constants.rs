//! Constants for the download module (timeouts, defaults).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for large files).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Directory used when a request does not name one.
pub const DEFAULT_DIRECTORY: &str = "./downloads";

/// Declared size substituted when the server sends no usable Content-Length.
///
/// With this sentinel, the reported percentage is the raw received byte
/// count times 100 and is expected to exceed 100.
pub const UNKNOWN_SIZE_SENTINEL: u64 = 1;
