//! Configuration module
//!
//! Environment-driven configuration for the upload pipeline. Backend
//! selection is presence-based: the first backend whose variables are all
//! set wins, and a partially configured backend is skipped, not rejected.

use std::env;
use std::path::PathBuf;

use crate::backend::AssetBackend;
use crate::constants;

/// Upload pipeline configuration
///
/// Read once at process start and immutable afterwards. `max_upload_size`
/// is bytes; the `MAX_UPLOAD_SIZE` environment variable is megabytes.
#[derive(Clone, Debug)]
pub struct Config {
    // Supabase Storage (preferred backend)
    pub supabase_url: Option<String>,
    pub supabase_service_role_key: Option<String>,
    pub supabase_bucket: Option<String>,
    // S3-compatible storage
    pub s3_endpoint: Option<String>,
    pub s3_region: Option<String>,
    pub s3_access_key_id: Option<String>,
    pub s3_secret_access_key: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_acl: Option<String>,
    // Filesystem fallback
    pub file_directory: PathBuf,
    // Global size cap in bytes, enforced by every backend
    pub max_upload_size: u64,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// Absent backend variables are fine (selection falls through); a
    /// present but invalid `MAX_UPLOAD_SIZE` is a load error.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let max_upload_size = parse_max_upload_size(env::var("MAX_UPLOAD_SIZE").ok().as_deref())?;

        let file_directory = match env::var("FILE_UPLOAD_PATH") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => env::current_dir()?.join(constants::DEFAULT_FILE_DIRECTORY),
        };

        Ok(Config {
            supabase_url: env::var("SUPABASE_URL").ok(),
            supabase_service_role_key: env::var("SUPABASE_SERVICE_ROLE_KEY").ok(),
            supabase_bucket: env::var("SUPABASE_STORAGE_BUCKET").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_access_key_id: env::var("S3_ACCESS_KEY_ID").ok(),
            s3_secret_access_key: env::var("S3_SECRET_ACCESS_KEY").ok(),
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_acl: env::var("S3_ACL").ok(),
            file_directory,
            max_upload_size,
        })
    }

    /// Backend selected by this configuration.
    ///
    /// Ordered presence checks encode an explicit preference: Supabase when
    /// its three variables are all set, then S3 when its five are, then the
    /// always-available filesystem fallback. A backend with only some of
    /// its variables set is treated as absent.
    pub fn backend(&self) -> AssetBackend {
        if self.supabase_url.is_some()
            && self.supabase_service_role_key.is_some()
            && self.supabase_bucket.is_some()
        {
            return AssetBackend::Supabase;
        }

        if self.s3_endpoint.is_some()
            && self.s3_region.is_some()
            && self.s3_access_key_id.is_some()
            && self.s3_secret_access_key.is_some()
            && self.s3_bucket.is_some()
        {
            return AssetBackend::S3;
        }

        AssetBackend::Fs
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            supabase_url: None,
            supabase_service_role_key: None,
            supabase_bucket: None,
            s3_endpoint: None,
            s3_region: None,
            s3_access_key_id: None,
            s3_secret_access_key: None,
            s3_bucket: None,
            s3_acl: None,
            file_directory: PathBuf::from(constants::DEFAULT_FILE_DIRECTORY),
            max_upload_size: constants::DEFAULT_MAX_UPLOAD_SIZE_MB * 1024 * 1024,
        }
    }
}

fn parse_max_upload_size(raw: Option<&str>) -> Result<u64, anyhow::Error> {
    let megabytes = match raw {
        Some(value) => value.trim().parse::<u64>().map_err(|_| {
            anyhow::anyhow!(
                "MAX_UPLOAD_SIZE must be a whole number of megabytes, got {:?}",
                value
            )
        })?,
        None => constants::DEFAULT_MAX_UPLOAD_SIZE_MB,
    };

    if megabytes == 0 {
        return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE must be greater than zero"));
    }

    megabytes.checked_mul(1024 * 1024).ok_or_else(|| {
        anyhow::anyhow!(
            "MAX_UPLOAD_SIZE is too large: {} megabytes does not fit in a u64 byte count",
            megabytes
        )
    })
}
