//! Transfer execution: streaming a fetched resource to disk.
//!
//! The executor owns the per-transfer loop: fetch, create the destination
//! file, write chunks through a buffered writer, and report progress after
//! every chunk. Each call produces exactly one terminal outcome.

use std::path::Path;
use std::time::Instant;

use futures_util::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info};

use super::client::{FetchedResource, HttpClient};
use super::constants::UNKNOWN_SIZE_SENTINEL;
use super::error::DownloadError;
use super::progress::DownloadProgress;
use super::speed::{Speed, format_speed};
use crate::queue::ResolvedRequest;

/// Executes transfers against a shared HTTP client.
#[derive(Debug, Clone)]
pub(crate) struct TransferExecutor {
    client: HttpClient,
}

impl TransferExecutor {
    pub(crate) fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Fetches the resource and streams it to the resolved destination,
    /// invoking `on_progress` after every chunk written.
    ///
    /// The progress percentage is measured against the declared size, or the
    /// one-byte sentinel when the server declared none, and is not clamped.
    /// A failure mid-stream removes the partial file (best effort) before
    /// the error is returned; no progress event follows the final chunk.
    pub(crate) async fn execute<F>(
        &self,
        resolved: &ResolvedRequest,
        mut on_progress: F,
    ) -> Result<(), DownloadError>
    where
        F: FnMut(&DownloadProgress),
    {
        let resource = self.client.fetch(&resolved.url).await?;
        let total_bytes = resource.content_length().unwrap_or(UNKNOWN_SIZE_SENTINEL);

        let destination = resolved.destination();
        let file = File::create(&destination)
            .await
            .map_err(|e| DownloadError::io(destination.clone(), e))?;

        debug!(path = %destination.display(), total_bytes, "streaming to destination");

        let result = stream_with_progress(
            file,
            resource,
            resolved,
            &destination,
            total_bytes,
            &mut on_progress,
        )
        .await;

        match result {
            Ok(bytes_written) => {
                info!(path = %destination.display(), bytes = bytes_written, "download complete");
                Ok(())
            }
            Err(error) => {
                debug!(path = %destination.display(), "cleaning up partial file after error");
                let _ = tokio::fs::remove_file(&destination).await;
                Err(error)
            }
        }
    }
}

/// Streams the response body to the file, returning bytes written.
///
/// Extracted so the caller can clean up the partial file on error.
async fn stream_with_progress<F>(
    file: File,
    resource: FetchedResource,
    resolved: &ResolvedRequest,
    destination: &Path,
    total_bytes: u64,
    on_progress: &mut F,
) -> Result<u64, DownloadError>
where
    F: FnMut(&DownloadProgress),
{
    let mut writer = BufWriter::new(file);
    let mut stream = resource.into_inner().bytes_stream();
    let mut progress =
        DownloadProgress::new(destination.to_path_buf(), resolved.file_name.clone());
    let mut received: u64 = 0;
    let started = Instant::now();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(&resolved.url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(destination.to_path_buf(), e))?;

        received += chunk.len() as u64;

        let elapsed = started.elapsed().as_secs_f64();
        progress.speed = if elapsed > 0.0 {
            format_speed(received as f64 / elapsed)
        } else {
            Speed::zero()
        };
        progress.percentage = received as f64 / total_bytes as f64 * 100.0;
        on_progress(&progress);
    }

    // Ensure all data is flushed to disk
    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(destination.to_path_buf(), e))?;

    Ok(received)
}
