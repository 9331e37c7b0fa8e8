//! Asset metadata extraction.
//!
//! Uploaded bytes are probed for their concrete format and dimensions:
//! images through a header read (no full decode), fonts through their magic
//! numbers. Videos are never probed here; callers supply fallback metadata
//! instead (see `resolve_asset_data`).

use std::io::Cursor;

use holdall_core::{AssetData, AssetInfoFallback, AssetMeta};
use image::ImageReader;

use crate::traits::{UploadError, UploadResult};

/// Classification driving the metadata probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Font,
}

impl AssetKind {
    /// Anything not declared as an image is probed as a font.
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.starts_with("image") {
            AssetKind::Image
        } else {
            AssetKind::Font
        }
    }
}

/// Extract structural metadata from uploaded bytes.
///
/// Image dimensions come from the container header, so arbitrarily large
/// images are probed without decoding pixel data.
pub fn get_asset_data(
    kind: AssetKind,
    size: u64,
    data: &[u8],
    name: &str,
) -> UploadResult<AssetData> {
    match kind {
        AssetKind::Image => {
            let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
            let format = reader.format().ok_or_else(|| UploadError::AssetData {
                name: name.to_string(),
                reason: "unrecognized image format".to_string(),
            })?;
            let (width, height) = reader.into_dimensions().map_err(|e| UploadError::AssetData {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

            Ok(AssetData {
                size,
                format: format_name(format),
                meta: AssetMeta::new(width, height),
            })
        }
        AssetKind::Font => {
            let format = sniff_font_format(data).ok_or_else(|| UploadError::AssetData {
                name: name.to_string(),
                reason: "unrecognized font format".to_string(),
            })?;

            Ok(AssetData {
                size,
                format: format.to_string(),
                meta: AssetMeta::default(),
            })
        }
    }
}

/// Apply the metadata policy for an uploaded asset.
///
/// Video uploads with caller-supplied fallback info skip the probe
/// entirely; everything else is probed from its bytes, as an image when the
/// declared type says so and as a font otherwise. A video without fallback
/// info lands in the font branch and fails on unrecognizable bytes.
pub fn resolve_asset_data(
    name: &str,
    content_type: &str,
    data: &[u8],
    info_fallback: Option<&AssetInfoFallback>,
) -> UploadResult<AssetData> {
    if content_type.starts_with("video") {
        if let Some(info) = info_fallback {
            return Ok(AssetData {
                size: data.len() as u64,
                format: info.format.clone(),
                meta: AssetMeta::new(info.width, info.height),
            });
        }
    }

    get_asset_data(
        AssetKind::from_content_type(content_type),
        data.len() as u64,
        data,
        name,
    )
}

fn format_name(format: image::ImageFormat) -> String {
    format
        .extensions_str()
        .first()
        .map(|ext| ext.to_string())
        .unwrap_or_else(|| format!("{:?}", format).to_lowercase())
}

/// Identify a font container from its magic number.
fn sniff_font_format(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(b"wOFF") {
        Some("woff")
    } else if data.starts_with(b"wOF2") {
        Some("woff2")
    } else if data.starts_with(&[0x00, 0x01, 0x00, 0x00]) {
        Some("ttf")
    } else if data.starts_with(b"OTTO") {
        Some("otf")
    } else if data.starts_with(b"ttcf") {
        Some("ttc")
    } else {
        None
    }
}
