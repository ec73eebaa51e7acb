//! Request resolution: destination directory and file name derivation.
//!
//! A request enters the queue with only a URL required. Resolution fixes the
//! concrete destination before any network work: an explicit file name wins,
//! otherwise the last URL path segment is used (query stripped,
//! percent-decoded); the directory defaults to `./downloads` and is created
//! recursively.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use url::Url;

use super::constants::DEFAULT_DIRECTORY;
use super::error::DownloadError;
use crate::queue::{DownloadRequest, ResolvedRequest};

/// Resolves a request into a concrete destination, creating the target
/// directory if needed.
///
/// # Errors
///
/// Returns [`DownloadError::InvalidUrl`] for an unparseable URL,
/// [`DownloadError::NoFileName`] when no explicit file name was given and
/// the URL path has no final segment, and [`DownloadError::Directory`] when
/// the target directory cannot be created.
pub(crate) async fn resolve(request: &DownloadRequest) -> Result<ResolvedRequest, DownloadError> {
    let file_name = match request.file_name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => file_name_from_url(&request.url)?,
    };

    let directory = target_directory(request);
    ensure_directory(&directory).await?;

    Ok(ResolvedRequest {
        url: request.url.clone(),
        directory,
        file_name,
    })
}

/// Returns the requested directory, falling back to [`DEFAULT_DIRECTORY`].
fn target_directory(request: &DownloadRequest) -> PathBuf {
    request
        .directory
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DIRECTORY))
}

/// Derives a file name from the last path segment of the URL.
///
/// The query string never participates (it is not part of the path), and
/// percent-encoded segments are decoded so files land under their display
/// name. Decoding failures keep the raw segment.
fn file_name_from_url(url: &str) -> Result<String, DownloadError> {
    let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

    let last_segment = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty());

    match last_segment {
        Some(segment) => {
            let decoded = urlencoding::decode(segment).map_or_else(
                |_| {
                    debug!(segment = %segment, "file name segment is not valid UTF-8 after decoding, keeping raw");
                    segment.to_string()
                },
                std::borrow::Cow::into_owned,
            );
            Ok(decoded)
        }
        None => Err(DownloadError::no_file_name(url)),
    }
}

/// Creates the directory (and any missing parents), treating an
/// already-existing path as success.
///
/// A file occupying the path is also accepted here; it surfaces later as a
/// write error rather than a directory error.
async fn ensure_directory(directory: &Path) -> Result<(), DownloadError> {
    match tokio::fs::create_dir_all(directory).await {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(error) => Err(DownloadError::directory(directory.to_path_buf(), error)),
    }
}
