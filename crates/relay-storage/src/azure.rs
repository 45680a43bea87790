//! Azure Blob Storage client for one account.
//!
//! Object reads and writes go through `object_store`'s Azure implementation.
//! Container creation is not covered by `object_store`, so it is issued as a
//! Shared Key signed `PUT ?restype=container` request.

use crate::connection::ConnectionDescriptor;
use crate::keys::{validate_container, validate_key};
use crate::traits::{BlobStore, ByteStream, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use futures::StreamExt;
use hmac::{Hmac, Mac};
use object_store::azure::{MicrosoftAzure, MicrosoftAzureBuilder};
use object_store::buffered::BufWriter;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::ObjectStoreExt;
use reqwest::StatusCode;
use sha2::Sha256;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// Azure REST API version used for container requests.
const AZURE_API_VERSION: &str = "2023-11-03";

/// Error code returned with 409 when the container is already there.
const CONTAINER_ALREADY_EXISTS: &str = "ContainerAlreadyExists";

type HmacSha256 = Hmac<Sha256>;

/// Azure Blob Storage client bound to a single account.
#[derive(Clone)]
pub struct AzureBlobStore {
    descriptor: ConnectionDescriptor,
    key_bytes: Vec<u8>,
    http: reqwest::Client,
}

impl AzureBlobStore {
    /// Create a client from a connection descriptor.
    ///
    /// The account key must be base64, as issued by the storage service.
    pub fn new(descriptor: ConnectionDescriptor) -> StorageResult<Self> {
        let key_bytes = BASE64_STANDARD
            .decode(descriptor.account_key.trim())
            .map_err(|e| {
                StorageError::InvalidCredential(format!(
                    "account key for '{}' is not valid base64: {}",
                    descriptor.account_name, e
                ))
            })?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(AzureBlobStore {
            descriptor,
            key_bytes,
            http,
        })
    }

    /// `object_store` client scoped to one container of this account.
    fn container_store(&self, container: &str) -> StorageResult<MicrosoftAzure> {
        let endpoint = self.descriptor.blob_endpoint();
        let allow_http = endpoint.starts_with("http://");

        MicrosoftAzureBuilder::new()
            .with_account(self.descriptor.account_name.clone())
            .with_access_key(self.descriptor.account_key.clone())
            .with_container_name(container)
            .with_endpoint(endpoint)
            .with_allow_http(allow_http)
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))
    }

    fn container_url(&self, container: &str) -> String {
        format!(
            "{}/{}?restype=container",
            self.descriptor.blob_endpoint(),
            container
        )
    }

    /// Canonicalized resource for a request URL path.
    ///
    /// Path-style (emulator) URLs already carry the account in the path, so
    /// the account name appears twice, as the emulator expects.
    fn canonicalized_resource(&self, url_path: &str, query: &[(&str, &str)]) -> String {
        let mut resource = format!("/{}{}", self.descriptor.account_name, url_path);
        let mut params: Vec<_> = query.to_vec();
        params.sort_by(|a, b| a.0.cmp(b.0));
        for (k, v) in params {
            resource.push_str(&format!("\n{}:{}", k.to_lowercase(), v));
        }
        resource
    }

    /// Shared Key string-to-sign for a request without body or content headers.
    fn string_to_sign(method: &str, date: &str, canonicalized_resource: &str) -> String {
        let canonicalized_headers = format!("x-ms-date:{}\nx-ms-version:{}", date, AZURE_API_VERSION);
        format!(
            "{}\n\n\n\n\n\n\n\n\n\n\n\n{}\n{}",
            method, canonicalized_headers, canonicalized_resource
        )
    }

    fn sign(&self, string_to_sign: &str) -> StorageResult<String> {
        let mut mac = HmacSha256::new_from_slice(&self.key_bytes)
            .map_err(|e| StorageError::InvalidCredential(format!("HMAC key error: {}", e)))?;
        mac.update(string_to_sign.as_bytes());
        let signature = BASE64_STANDARD.encode(mac.finalize().into_bytes());
        Ok(format!(
            "SharedKey {}:{}",
            self.descriptor.account_name, signature
        ))
    }

    fn rfc1123_date() -> String {
        chrono::Utc::now()
            .format("%a, %d %b %Y %H:%M:%S GMT")
            .to_string()
    }

    /// Discard any staged blocks of an upload that will not be committed.
    async fn abort_upload(writer: &mut BufWriter, key: &str) {
        if let Err(e) = writer.abort().await {
            tracing::warn!(key = %key, error = %e, "Failed to abort Azure upload");
        }
    }
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    fn account(&self) -> &str {
        &self.descriptor.account_name
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Azure
    }

    fn object_url(&self, container: &str, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.descriptor.blob_endpoint(),
            container,
            urlencoding::encode(key).replace("%2F", "/")
        )
    }

    async fn create_container_if_not_exists(&self, container: &str) -> StorageResult<bool> {
        validate_container(container)?;
        let start = std::time::Instant::now();

        let url = reqwest::Url::parse(&self.container_url(container))
            .map_err(|e| StorageError::ConfigError(format!("Invalid container URL: {}", e)))?;
        let date = Self::rfc1123_date();
        let resource = self.canonicalized_resource(url.path(), &[("restype", "container")]);
        let authorization = self.sign(&Self::string_to_sign("PUT", &date, &resource))?;

        let response = self
            .http
            .put(url)
            .header("x-ms-date", &date)
            .header("x-ms-version", AZURE_API_VERSION)
            .header("Authorization", authorization)
            .header("Content-Length", "0")
            .send()
            .await
            .map_err(|e| StorageError::BackendError(format!("Create container request failed: {}", e)))?;

        let status = response.status();
        let error_code = response
            .headers()
            .get("x-ms-error-code")
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        match status {
            StatusCode::CREATED => {
                tracing::info!(
                    account = %self.descriptor.account_name,
                    container = %container,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Azure container created"
                );
                Ok(true)
            }
            StatusCode::CONFLICT if error_code.as_deref() == Some(CONTAINER_ALREADY_EXISTS) => {
                tracing::debug!(
                    account = %self.descriptor.account_name,
                    container = %container,
                    "Azure container already exists"
                );
                Ok(false)
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(StorageError::BackendError(format!(
                    "Create container '{}' returned HTTP {} ({}): {}",
                    container,
                    status,
                    error_code.unwrap_or_else(|| "no error code".to_string()),
                    body
                )))
            }
        }
    }

    async fn open_read(&self, container: &str, key: &str) -> StorageResult<ByteStream> {
        validate_container(container)?;
        validate_key(key)?;

        let store = self.container_store(container)?;
        let location = Path::from(key);

        let result = store.get(&location).await.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => {
                StorageError::NotFound(format!("{}/{}", container, key))
            }
            other => StorageError::DownloadFailed(other.to_string()),
        })?;

        let account = self.descriptor.account_name.clone();
        let object = format!("{}/{}", container, key);
        let stream = result.into_stream().map(move |res| {
            res.map_err(|e| {
                tracing::error!(
                    account = %account,
                    object = %object,
                    error = %e,
                    "Azure read stream error"
                );
                StorageError::DownloadFailed(e.to_string())
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
        validate_container(container)?;
        validate_key(key)?;
        let start = std::time::Instant::now();

        let store: Arc<dyn object_store::ObjectStore> = Arc::new(self.container_store(container)?);
        let mut writer = BufWriter::new(store, Path::from(key));
        let mut reader =
            tokio_util::io::StreamReader::new(data.map(|chunk| chunk.map_err(std::io::Error::other)));

        let written = match tokio::io::copy(&mut reader, &mut writer).await {
            Ok(written) => written,
            Err(e) => {
                Self::abort_upload(&mut writer, key).await;
                return Err(StorageError::UploadFailed(format!("Stream copy failed: {}", e)));
            }
        };

        if let Err(e) = writer.shutdown().await {
            Self::abort_upload(&mut writer, key).await;
            return Err(StorageError::UploadFailed(format!("Failed to commit upload: {}", e)));
        }

        tracing::info!(
            account = %self.descriptor.account_name,
            container = %container,
            key = %key,
            size_bytes = written,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Azure stream upload successful"
        );

        Ok(written)
    }
}
