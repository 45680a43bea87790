use crate::keys::{validate_container, validate_key};
use crate::traits::{BlobStore, ByteStream, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local filesystem client for one account.
///
/// Layout: `{root}/{account}/{container}/{key}`.
#[derive(Clone, Debug)]
pub struct LocalBlobStore {
    account: String,
    account_root: PathBuf,
}

impl LocalBlobStore {
    /// Create a client for `account` under `root`.
    ///
    /// Nothing is touched on disk until the first operation.
    pub fn new(root: impl Into<PathBuf>, account: impl Into<String>) -> Self {
        let account = account.into();
        let account_root = root.into().join(&account);
        LocalBlobStore {
            account,
            account_root,
        }
    }

    fn container_path(&self, container: &str) -> StorageResult<PathBuf> {
        validate_container(container)?;
        Ok(self.account_root.join(container))
    }

    fn object_path(&self, container: &str, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.container_path(container)?.join(key))
    }

    /// Sibling path used while an object is being written
    fn partial_path(path: &Path) -> PathBuf {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        path.with_file_name(format!(".{}.{}.partial", file_name, Uuid::new_v4()))
    }

    async fn write_file(path: &Path, mut data: ByteStream) -> StorageResult<u64> {
        let mut file = fs::File::create(path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        let mut written: u64 = 0;
        while let Some(chunk) = data.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await.map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to write file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            written += chunk.len() as u64;
        }

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        Ok(written)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn account(&self) -> &str {
        &self.account
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }

    fn object_url(&self, container: &str, key: &str) -> String {
        format!(
            "file://{}",
            self.account_root.join(container).join(key).display()
        )
    }

    async fn create_container_if_not_exists(&self, container: &str) -> StorageResult<bool> {
        let path = self.container_path(container)?;

        if fs::try_exists(&path).await.unwrap_or(false) {
            if !fs::metadata(&path).await?.is_dir() {
                return Err(StorageError::BackendError(format!(
                    "{} exists and is not a container",
                    path.display()
                )));
            }
            return Ok(false);
        }

        fs::create_dir_all(&path).await.map_err(|e| {
            StorageError::BackendError(format!(
                "Failed to create container directory {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(
            account = %self.account,
            container = %container,
            path = %path.display(),
            "Local container created"
        );

        Ok(true)
    }

    async fn open_read(&self, container: &str, key: &str) -> StorageResult<ByteStream> {
        let path = self.object_path(container, key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(format!("{}/{}", container, key)));
        }

        let file = fs::File::open(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to open file {}: {}", path.display(), e))
        })?;

        let path_display = path.display().to_string();
        let stream = tokio_util::io::ReaderStream::new(file).map(move |result| {
            result.map_err(|e| {
                tracing::error!(path = %path_display, error = %e, "Local read stream error");
                StorageError::DownloadFailed(format!("Failed to read chunk: {}", e))
            })
        });

        Ok(Box::pin(stream))
    }

    async fn write_stream(
        &self,
        container: &str,
        key: &str,
        data: ByteStream,
    ) -> StorageResult<u64> {
        let container_path = self.container_path(container)?;
        let path = self.object_path(container, key)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&container_path).await.unwrap_or(false) {
            return Err(StorageError::ContainerNotFound(container.to_string()));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let partial = Self::partial_path(&path);
        let written = match Self::write_file(&partial, data).await {
            Ok(written) => written,
            Err(e) => {
                let _ = fs::remove_file(&partial).await;
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(&partial, &path).await {
            let _ = fs::remove_file(&partial).await;
            return Err(StorageError::UploadFailed(format!(
                "Failed to move {} into place: {}",
                path.display(),
                e
            )));
        }

        tracing::info!(
            account = %self.account,
            path = %path.display(),
            size_bytes = written,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local stream write successful"
        );

        Ok(written)
    }
}
