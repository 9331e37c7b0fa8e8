use crate::asset_data::resolve_asset_data;
use crate::limiter::{buffer_stream, SizeLimiter};
use crate::traits::{AssetClient, AssetStream, UploadError, UploadResult};
use crate::AssetBackend;
use async_trait::async_trait;
use holdall_core::{AssetData, AssetInfoFallback};
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem implementation
///
/// The development fallback when no cloud backend is configured. Asset
/// names are storage keys, not paths; names may contain `/` to nest below
/// the root directory.
#[derive(Clone)]
pub struct FsClient {
    file_directory: PathBuf,
    max_upload_size: u64,
}

impl FsClient {
    /// Create a new FsClient instance rooted at `file_directory`.
    ///
    /// The directory is created lazily on first write, so construction has
    /// no side effects.
    pub fn new(file_directory: impl Into<PathBuf>, max_upload_size: u64) -> Self {
        FsClient {
            file_directory: file_directory.into(),
            max_upload_size,
        }
    }

    /// Convert an asset name to a filesystem path with security validation
    ///
    /// Names must not contain path traversal sequences that could escape
    /// the upload directory.
    fn asset_path(&self, name: &str) -> UploadResult<PathBuf> {
        if name.contains("..") || name.starts_with('/') {
            return Err(UploadError::UploadFailed {
                name: name.to_string(),
                reason: "asset name contains path traversal characters".to_string(),
            });
        }

        Ok(self.file_directory.join(name))
    }
}

#[async_trait]
impl AssetClient for FsClient {
    async fn upload_file(
        &self,
        name: &str,
        content_type: &str,
        data: AssetStream,
        info_fallback: Option<AssetInfoFallback>,
    ) -> UploadResult<AssetData> {
        let path = self.asset_path(name)?;

        let limited = SizeLimiter::new(data, self.max_upload_size, name);
        let data = buffer_stream(limited).await?;

        let start = std::time::Instant::now();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                UploadError::UploadFailed {
                    name: name.to_string(),
                    reason: format!("failed to create directory {}: {}", parent.display(), e),
                }
            })?;
        }

        let mut file = fs::File::create(&path).await.map_err(|e| {
            UploadError::UploadFailed {
                name: name.to_string(),
                reason: format!("failed to create file {}: {}", path.display(), e),
            }
        })?;

        file.write_all(&data).await.map_err(|e| {
            UploadError::UploadFailed {
                name: name.to_string(),
                reason: format!("failed to write file {}: {}", path.display(), e),
            }
        })?;

        file.sync_all().await.map_err(|e| {
            UploadError::UploadFailed {
                name: name.to_string(),
                reason: format!("failed to sync file {}: {}", path.display(), e),
            }
        })?;

        tracing::info!(
            path = %path.display(),
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Filesystem upload successful"
        );

        resolve_asset_data(name, content_type, &data, info_fallback.as_ref())
    }

    fn backend(&self) -> AssetBackend {
        AssetBackend::Fs
    }
}
