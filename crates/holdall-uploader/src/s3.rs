use crate::asset_data::resolve_asset_data;
use crate::limiter::{buffer_stream, SizeLimiter};
use crate::traits::{AssetClient, AssetStream, UploadError, UploadResult};
use crate::AssetBackend;
use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use holdall_core::{AssetData, AssetInfoFallback};

/// Options for the S3-compatible backend.
#[derive(Debug, Clone)]
pub struct S3Options {
    pub endpoint: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    pub acl: Option<String>,
    pub max_upload_size: u64,
}

/// S3-compatible storage implementation
///
/// Works against AWS S3 and S3-compatible providers (MinIO, DigitalOcean
/// Spaces, Cloudflare R2) through an explicit endpoint URL. Path-style
/// addressing is forced for provider compatibility.
#[derive(Clone)]
pub struct S3Client {
    client: aws_sdk_s3::Client,
    bucket: String,
    acl: Option<ObjectCannedAcl>,
    max_upload_size: u64,
}

impl S3Client {
    /// Create a new S3Client instance. No network traffic at construction.
    pub fn new(options: S3Options) -> Self {
        let credentials = Credentials::new(
            options.access_key_id,
            options.secret_access_key,
            None,
            None,
            "holdall-config",
        );

        let config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(options.region))
            .endpoint_url(options.endpoint)
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        S3Client {
            client: aws_sdk_s3::Client::from_conf(config),
            bucket: options.bucket,
            acl: options.acl.map(|acl| ObjectCannedAcl::from(acl.as_str())),
            max_upload_size: options.max_upload_size,
        }
    }
}

#[async_trait]
impl AssetClient for S3Client {
    async fn upload_file(
        &self,
        name: &str,
        content_type: &str,
        data: AssetStream,
        info_fallback: Option<AssetInfoFallback>,
    ) -> UploadResult<AssetData> {
        let limited = SizeLimiter::new(data, self.max_upload_size, name);
        let data = buffer_stream(limited).await?;
        let size = data.len();

        let start = std::time::Instant::now();

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(name)
            .content_type(content_type)
            .body(ByteStream::from(data.clone()));

        if let Some(acl) = &self.acl {
            request = request.acl(acl.clone());
        }

        request.send().await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %name,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            UploadError::UploadFailed {
                name: name.to_string(),
                reason: format!("S3 put_object failed: {}", e),
            }
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %name,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        resolve_asset_data(name, content_type, &data, info_fallback.as_ref())
    }

    fn backend(&self) -> AssetBackend {
        AssetBackend::S3
    }
}
