//! Result models for the upload pipeline.

use serde::{Deserialize, Serialize};

/// Structural metadata of a stored asset.
///
/// `width` and `height` are set for visual media and omitted for formats
/// without spatial dimensions (fonts).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl AssetMeta {
    pub fn new(width: u32, height: u32) -> Self {
        AssetMeta {
            width: Some(width),
            height: Some(height),
        }
    }
}

/// Result of a successful upload.
///
/// `size` is the number of bytes actually written, `format` the concrete
/// encoding of the asset (e.g. "png", "woff2", "mp4"). Produced once per
/// upload call and owned by the caller afterwards; callers typically persist
/// it alongside their own asset record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetData {
    pub size: u64,
    pub format: String,
    pub meta: AssetMeta,
}

/// Caller-supplied metadata for video uploads.
///
/// Videos are stored without server-side probing; the caller, which may have
/// probed the media client-side, passes dimensions and container format
/// directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInfoFallback {
    pub width: u32,
    pub height: u32,
    pub format: String,
}
