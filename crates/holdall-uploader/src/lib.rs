//! Holdall Uploader Library
//!
//! This crate provides the asset-upload abstraction and its backend
//! implementations. It includes the AssetClient trait plus clients for
//! Supabase Storage, S3-compatible object storage, and the local
//! filesystem.
//!
//! # Backend selection
//!
//! `create_asset_client` constructs exactly one client per process from
//! configuration, preferring Supabase, then S3, then the always-available
//! filesystem fallback. A backend with only some of its settings present is
//! skipped, not rejected. See [`holdall_core::Config::backend`].
//!
//! # Upload semantics
//!
//! Every upload is capped by the configured maximum size before any bytes
//! are written, and every write is an upsert: re-uploading a name replaces
//! the stored content, and concurrent uploads to the same name resolve to
//! last write wins at the storage layer.

pub mod asset_data;
pub mod factory;
pub mod fs;
pub mod limiter;
#[cfg(feature = "backend-s3")]
pub mod s3;
#[cfg(feature = "backend-supabase")]
pub mod supabase;
pub mod traits;

// Re-export commonly used types
pub use asset_data::{get_asset_data, resolve_asset_data, AssetKind};
pub use factory::create_asset_client;
pub use fs::FsClient;
pub use holdall_core::AssetBackend;
pub use limiter::{buffer_stream, SizeLimiter};
#[cfg(feature = "backend-s3")]
pub use s3::{S3Client, S3Options};
#[cfg(feature = "backend-supabase")]
pub use supabase::SupabaseClient;
pub use traits::{
    stream_from_buffer, stream_from_reader, AssetClient, AssetStream, UploadError, UploadResult,
};
