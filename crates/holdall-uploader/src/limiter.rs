//! Streaming size enforcement.
//!
//! `SizeLimiter` wraps an upload stream and fails the instant the running
//! byte count crosses the configured cap, without buffering. Backends apply
//! it before the physical write, so an oversize upload never commits.

use crate::traits::{AssetStream, UploadError, UploadResult};
use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};

/// Stream adapter enforcing a byte ceiling
///
/// Chunks pass through unchanged while the running total stays within the
/// cap. The first chunk that would cross it yields `UploadError::TooLarge`
/// carrying the asset name, and the stream fuses: the inner stream is not
/// polled again afterwards.
pub struct SizeLimiter {
    inner: AssetStream,
    max_size: u64,
    received: u64,
    name: String,
    done: bool,
}

impl SizeLimiter {
    pub fn new(inner: AssetStream, max_size: u64, name: &str) -> Self {
        SizeLimiter {
            inner,
            max_size,
            received: 0,
            name: name.to_string(),
            done: false,
        }
    }
}

impl Stream for SizeLimiter {
    type Item = UploadResult<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.done {
            return Poll::Ready(None);
        }

        match this.inner.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.received += chunk.len() as u64;
                if this.received > this.max_size {
                    this.done = true;
                    Poll::Ready(Some(Err(UploadError::TooLarge {
                        name: this.name.clone(),
                        max_size: this.max_size,
                    })))
                } else {
                    Poll::Ready(Some(Ok(chunk)))
                }
            }
            Poll::Ready(Some(Err(e))) => {
                this.done = true;
                Poll::Ready(Some(Err(UploadError::Io(e))))
            }
            Poll::Ready(None) => {
                this.done = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Materialize a limited stream into one contiguous buffer.
///
/// Backends are buffer-oriented at their write APIs. Short-circuits on the
/// first failure, so an oversize stream is abandoned instead of drained.
pub async fn buffer_stream<S>(mut stream: S) -> UploadResult<Bytes>
where
    S: Stream<Item = UploadResult<Bytes>> + Unpin,
{
    let mut buffer = BytesMut::new();

    while let Some(chunk) = stream.next().await {
        buffer.extend_from_slice(&chunk?);
    }

    Ok(buffer.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn chunked(chunks: Vec<&'static [u8]>) -> AssetStream {
        let items: Vec<std::io::Result<Bytes>> = chunks
            .into_iter()
            .map(|chunk| Ok(Bytes::from_static(chunk)))
            .collect();
        Box::pin(stream::iter(items))
    }

    #[tokio::test]
    async fn test_stream_under_limit_passes_through() {
        let limiter = SizeLimiter::new(chunked(vec![b"abc", b"def", b"gh"]), 100, "a.bin");

        let data = buffer_stream(limiter).await.unwrap();
        assert_eq!(data.as_ref(), b"abcdefgh");
    }

    #[tokio::test]
    async fn test_stream_at_exact_limit_passes() {
        let limiter = SizeLimiter::new(chunked(vec![b"abcd", b"efgh"]), 8, "a.bin");

        let data = buffer_stream(limiter).await.unwrap();
        assert_eq!(data.as_ref(), b"abcdefgh");
    }

    #[tokio::test]
    async fn test_oversize_upload_rejected() {
        let limiter = SizeLimiter::new(chunked(vec![b"aaaa", b"bbbb"]), 7, "big.png");

        let result = buffer_stream(limiter).await;
        assert!(matches!(
            result,
            Err(UploadError::TooLarge { ref name, max_size: 7 }) if name == "big.png"
        ));
    }

    #[tokio::test]
    async fn test_limit_crossed_mid_stream_fuses() {
        let mut limiter = SizeLimiter::new(chunked(vec![b"aaaa", b"bbbb", b"cccc"]), 6, "big.png");

        let first = limiter.next().await.unwrap().unwrap();
        assert_eq!(first.as_ref(), b"aaaa");

        let second = limiter.next().await.unwrap();
        assert!(matches!(
            second,
            Err(UploadError::TooLarge { ref name, max_size: 6 }) if name == "big.png"
        ));

        assert!(limiter.next().await.is_none());
    }

    #[tokio::test]
    async fn test_source_error_surfaces_as_io() {
        let source: AssetStream = Box::pin(stream::iter(vec![
            Ok(Bytes::from_static(b"ok")),
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "reset",
            )),
        ]));
        let limiter = SizeLimiter::new(source, 100, "a.bin");

        let result = buffer_stream(limiter).await;
        assert!(matches!(result, Err(UploadError::Io(_))));
    }

    #[tokio::test]
    async fn test_empty_stream_buffers_empty() {
        let limiter = SizeLimiter::new(chunked(vec![]), 10, "empty.bin");

        let data = buffer_stream(limiter).await.unwrap();
        assert!(data.is_empty());
    }
}
