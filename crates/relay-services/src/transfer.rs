//! Streamed object copy between two accounts.

use relay_storage::{StorageEndpoint, StorageResult};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    Completed,
    Failed,
}

/// Outcome of one transfer attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResult {
    pub status: TransferStatus,
    pub bytes_copied: u64,
    pub error: Option<String>,
}

impl TransferResult {
    pub fn completed(bytes_copied: u64) -> Self {
        Self {
            status: TransferStatus::Completed,
            bytes_copied,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: TransferStatus::Failed,
            bytes_copied: 0,
            error: Some(error.into()),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TransferStatus::Completed
    }
}

pub struct TransferExecutor;

impl TransferExecutor {
    /// Stream `container/key` from `source` into the same container and key
    /// on `destination`, replacing any existing object.
    ///
    /// Errors are captured in the result. The read stream is released on
    /// every exit path, including cancellation of the returned future.
    pub async fn copy(
        source: &StorageEndpoint,
        destination: &StorageEndpoint,
        container: &str,
        key: &str,
    ) -> TransferResult {
        let start = Instant::now();
        tracing::info!(
            source = %source.account(),
            destination = %destination.account(),
            container = %container,
            key = %key,
            "Blob copy started"
        );

        let result = match Self::stream(source, destination, container, key).await {
            Ok(bytes_copied) => {
                tracing::info!(
                    container = %container,
                    key = %key,
                    bytes_copied,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Blob copy completed successfully"
                );
                TransferResult::completed(bytes_copied)
            }
            Err(e) => {
                tracing::error!(
                    container = %container,
                    key = %key,
                    error = %e,
                    "Blob copy failed"
                );
                TransferResult::failed(e.to_string())
            }
        };

        tracing::info!(container = %container, key = %key, "Blob transfer finished");
        result
    }

    async fn stream(
        source: &StorageEndpoint,
        destination: &StorageEndpoint,
        container: &str,
        key: &str,
    ) -> StorageResult<u64> {
        let reader = source.client().open_read(container, key).await?;
        destination
            .client()
            .write_stream(container, key, reader)
            .await
    }
}
