//! Upload abstraction trait
//!
//! This module defines the AssetClient trait that all upload backends
//! implement, the byte-stream type they consume, and the error taxonomy of
//! the pipeline.

use crate::AssetBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use holdall_core::{AssetData, AssetInfoFallback};
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Upload operation errors
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Cannot upload file {name}: exceeds maximum size of {max_size} bytes")]
    TooLarge { name: String, max_size: u64 },

    #[error("Cannot upload file {name}: {reason}")]
    UploadFailed { name: String, reason: String },

    #[error("Cannot read asset data for {name}: {reason}")]
    AssetData { name: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for upload operations
pub type UploadResult<T> = Result<T, UploadError>;

/// Byte stream consumed by `upload_file`.
///
/// Chunks arrive as the transport delivers them; the pipeline caps the
/// running total incrementally before any bytes reach a backend write.
pub type AssetStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send>>;

/// Build an `AssetStream` from an in-memory buffer (a single chunk).
pub fn stream_from_buffer(data: impl Into<Bytes>) -> AssetStream {
    let chunk: std::io::Result<Bytes> = Ok(data.into());
    Box::pin(futures::stream::iter([chunk]))
}

/// Build an `AssetStream` from an async reader.
pub fn stream_from_reader(reader: impl AsyncRead + Send + 'static) -> AssetStream {
    Box::pin(tokio_util::io::ReaderStream::new(reader))
}

/// Upload abstraction trait
///
/// All upload backends (Supabase Storage, S3-compatible, local filesystem)
/// implement this trait. Exactly one shared instance exists per process; it
/// holds backend configuration only, never per-upload state, so concurrent
/// calls need no locking.
#[async_trait]
pub trait AssetClient: Send + Sync {
    /// Upload an asset and return the metadata derived from its bytes.
    ///
    /// The stream is size-capped before anything is written, and the write
    /// is an upsert keyed on `name`. `info_fallback` is honored only for
    /// video content types, which are stored without server-side probing;
    /// for everything else the bytes are probed after the write.
    async fn upload_file(
        &self,
        name: &str,
        content_type: &str,
        data: AssetStream,
        info_fallback: Option<AssetInfoFallback>,
    ) -> UploadResult<AssetData>;

    /// Get the backend type serving this client
    fn backend(&self) -> AssetBackend;
}
