use crate::fs::FsClient;
#[cfg(feature = "backend-s3")]
use crate::s3::{S3Client, S3Options};
#[cfg(feature = "backend-supabase")]
use crate::supabase::SupabaseClient;
use crate::traits::{AssetClient, UploadError, UploadResult};
use holdall_core::{AssetBackend, Config};
use std::sync::Arc;

/// Create the upload client selected by configuration
///
/// Called once at startup; the returned client is shared for the process
/// lifetime. Selection prefers Supabase, then S3, then the filesystem
/// fallback, and a partially configured backend falls through silently
/// (see `Config::backend`). Construction performs no I/O.
pub fn create_asset_client(config: &Config) -> UploadResult<Arc<dyn AssetClient>> {
    let backend = config.backend();

    let client: Arc<dyn AssetClient> = match backend {
        #[cfg(feature = "backend-supabase")]
        AssetBackend::Supabase => {
            let project_url = config
                .supabase_url
                .clone()
                .ok_or_else(|| UploadError::Config("SUPABASE_URL not configured".to_string()))?;
            let service_role_key = config.supabase_service_role_key.clone().ok_or_else(|| {
                UploadError::Config("SUPABASE_SERVICE_ROLE_KEY not configured".to_string())
            })?;
            let bucket = config.supabase_bucket.clone().ok_or_else(|| {
                UploadError::Config("SUPABASE_STORAGE_BUCKET not configured".to_string())
            })?;

            Arc::new(SupabaseClient::new(
                &project_url,
                service_role_key,
                bucket,
                config.max_upload_size,
            )?)
        }

        #[cfg(not(feature = "backend-supabase"))]
        AssetBackend::Supabase => {
            return Err(UploadError::Config(
                "Supabase backend not available (backend-supabase feature not enabled)".to_string(),
            ))
        }

        #[cfg(feature = "backend-s3")]
        AssetBackend::S3 => {
            let endpoint = config
                .s3_endpoint
                .clone()
                .ok_or_else(|| UploadError::Config("S3_ENDPOINT not configured".to_string()))?;
            let region = config
                .s3_region
                .clone()
                .ok_or_else(|| UploadError::Config("S3_REGION not configured".to_string()))?;
            let access_key_id = config.s3_access_key_id.clone().ok_or_else(|| {
                UploadError::Config("S3_ACCESS_KEY_ID not configured".to_string())
            })?;
            let secret_access_key = config.s3_secret_access_key.clone().ok_or_else(|| {
                UploadError::Config("S3_SECRET_ACCESS_KEY not configured".to_string())
            })?;
            let bucket = config
                .s3_bucket
                .clone()
                .ok_or_else(|| UploadError::Config("S3_BUCKET not configured".to_string()))?;

            Arc::new(S3Client::new(S3Options {
                endpoint,
                region,
                access_key_id,
                secret_access_key,
                bucket,
                acl: config.s3_acl.clone(),
                max_upload_size: config.max_upload_size,
            }))
        }

        #[cfg(not(feature = "backend-s3"))]
        AssetBackend::S3 => {
            return Err(UploadError::Config(
                "S3 backend not available (backend-s3 feature not enabled)".to_string(),
            ))
        }

        AssetBackend::Fs => Arc::new(FsClient::new(
            config.file_directory.clone(),
            config.max_upload_size,
        )),
    };

    tracing::info!(
        backend = %backend,
        max_upload_size_bytes = config.max_upload_size,
        "Asset client created"
    );

    Ok(client)
}
