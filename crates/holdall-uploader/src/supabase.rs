use crate::asset_data::resolve_asset_data;
use crate::limiter::{buffer_stream, SizeLimiter};
use crate::traits::{AssetClient, AssetStream, UploadError, UploadResult};
use crate::AssetBackend;
use async_trait::async_trait;
use holdall_core::{AssetData, AssetInfoFallback};
use reqwest::header;

/// Cache directive applied to every stored object. Assets are named by
/// content hash upstream, so a stored object never changes.
const STORAGE_CACHE_CONTROL: &str = "public, max-age=31536004, immutable";

/// Supabase Storage implementation
///
/// Talks to the storage HTTP API directly, authenticated with the
/// project's service role key.
#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    project_url: String,
    service_role_key: String,
    bucket: String,
    max_upload_size: u64,
}

impl SupabaseClient {
    /// Create a new SupabaseClient instance. No network traffic at
    /// construction.
    pub fn new(
        project_url: &str,
        service_role_key: String,
        bucket: String,
        max_upload_size: u64,
    ) -> UploadResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| UploadError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(SupabaseClient {
            http,
            project_url: project_url.trim_end_matches('/').to_string(),
            service_role_key,
            bucket,
            max_upload_size,
        })
    }

    /// URL of an object in the storage API. Slashes in names are path
    /// separators and stay unencoded.
    fn object_url(&self, name: &str) -> String {
        let encoded = urlencoding::encode(name).replace("%2F", "/");
        format!(
            "{}/storage/v1/object/{}/{}",
            self.project_url, self.bucket, encoded
        )
    }
}

#[async_trait]
impl AssetClient for SupabaseClient {
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

        let response = self
            .http
            .post(self.object_url(name))
            .bearer_auth(&self.service_role_key)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CACHE_CONTROL, STORAGE_CACHE_CONTROL)
            .header("x-upsert", "true")
            .body(data.clone())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %name,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Supabase upload failed"
                );
                UploadError::UploadFailed {
                    name: name.to_string(),
                    reason: e.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                bucket = %self.bucket,
                key = %name,
                status = %status,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Supabase upload failed"
            );
            return Err(UploadError::UploadFailed {
                name: name.to_string(),
                reason: format!("{}: {}", status, detail),
            });
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %name,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Supabase upload successful"
        );

        resolve_asset_data(name, content_type, &data, info_fallback.as_ref())
    }

    fn backend(&self) -> AssetBackend {
        AssetBackend::Supabase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::stream_from_buffer;
    use holdall_core::AssetMeta;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn test_client(project_url: &str, max_upload_size: u64) -> SupabaseClient {
        SupabaseClient::new(
            project_url,
            "service-role-key".to_string(),
            "assets".to_string(),
            max_upload_size,
        )
        .unwrap()
    }

    #[test]
    fn test_object_url_encodes_names() {
        let client = test_client("https://project.supabase.co/", 1024);

        assert_eq!(
            client.object_url("logo.png"),
            "https://project.supabase.co/storage/v1/object/assets/logo.png"
        );
        assert_eq!(
            client.object_url("brand assets/logo@2x.png"),
            "https://project.supabase.co/storage/v1/object/assets/brand%20assets/logo%402x.png"
        );
    }

    #[tokio::test]
    async fn test_upload_posts_with_upsert_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/storage/v1/object/assets/logo.png")
            .match_header("authorization", "Bearer service-role-key")
            .match_header("content-type", "image/png")
            .match_header("cache-control", STORAGE_CACHE_CONTROL)
            .match_header("x-upsert", "true")
            .with_status(200)
            .with_body(r#"{"Key":"assets/logo.png"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url(), 1024 * 1024);

        let bytes = png_bytes(100, 50);
        let data = client
            .upload_file(
                "logo.png",
                "image/png",
                stream_from_buffer(bytes.clone()),
                None,
            )
            .await
            .unwrap();

        assert_eq!(data.size, bytes.len() as u64);
        assert_eq!(data.format, "png");
        assert_eq!(data.meta, AssetMeta::new(100, 50));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_oversize_upload_never_posts() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client = test_client(&server.url(), 8);

        let result = client
            .upload_file(
                "big.bin",
                "application/octet-stream",
                stream_from_buffer(vec![0u8; 64]),
                None,
            )
            .await;

        assert!(matches!(
            result,
            Err(UploadError::TooLarge { ref name, max_size: 8 }) if name == "big.bin"
        ));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_storage_error_surfaces_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/storage/v1/object/assets/logo.png")
            .with_status(400)
            .with_body(r#"{"statusCode":"400","error":"invalid signature"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url(), 1024 * 1024);

        let result = client
            .upload_file(
                "logo.png",
                "image/png",
                stream_from_buffer(png_bytes(1, 1)),
                None,
            )
            .await;

        match result {
            Err(UploadError::UploadFailed { name, reason }) => {
                assert_eq!(name, "logo.png");
                assert!(reason.contains("400"));
                assert!(reason.contains("invalid signature"));
            }
            other => panic!("expected UploadFailed, got {:?}", other),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_transport_error_surfaces_as_upload_failed() {
        // Bind then drop to get a local port with nothing listening.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let client = test_client(&format!("http://127.0.0.1:{}", port), 1024 * 1024);

        let result = client
            .upload_file(
                "logo.png",
                "image/png",
                stream_from_buffer(png_bytes(1, 1)),
                None,
            )
            .await;

        match result {
            Err(UploadError::UploadFailed { name, .. }) => assert_eq!(name, "logo.png"),
            other => panic!("expected UploadFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_metadata_failure_after_write_is_not_rolled_back() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/storage/v1/object/assets/broken.png")
            .with_status(200)
            .with_body(r#"{"Key":"assets/broken.png"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url(), 1024 * 1024);

        let result = client
            .upload_file(
                "broken.png",
                "image/png",
                stream_from_buffer(b"not an image".to_vec()),
                None,
            )
            .await;

        assert!(matches!(result, Err(UploadError::AssetData { .. })));
        // The write happened; only the probe failed afterwards.
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_video_fallback_bypasses_probe() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/storage/v1/object/assets/clip.mp4")
            .match_header("x-upsert", "true")
            .with_status(200)
            .with_body(r#"{"Key":"assets/clip.mp4"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url(), 1024 * 1024);

        let fallback = AssetInfoFallback {
            width: 1920,
            height: 1080,
            format: "mp4".to_string(),
        };
        let payload = b"\x00\x00\x00\x20ftypisom".to_vec();

        let data = client
            .upload_file(
                "clip.mp4",
                "video/mp4",
                stream_from_buffer(payload.clone()),
                Some(fallback),
            )
            .await
            .unwrap();

        assert_eq!(
            data,
            AssetData {
                size: payload.len() as u64,
                format: "mp4".to_string(),
                meta: AssetMeta::new(1920, 1080),
            }
        );
        mock.assert_async().await;
    }
}
