//! Image source resolution for capture.
//!
//! An off-screen capture can only paint pixels it holds in memory. Data
//! URIs are used as they are; local files and remote URLs are read or
//! fetched and inlined as base64 data URIs.

use std::path::Path;
use std::time::Duration;

use base64::Engine;

use crate::error::{RenderError, RenderResult};

/// Where an image's pixels come from at capture time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Self-contained `data:` URI.
    Inline(String),
    /// Remote URL left unfetched.
    Remote(String),
}

/// Upper bound on fetching one remote image.
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Resolve an element's image source for capture.
///
/// Accepts `data:` URIs, `http(s)://` URLs, `file://` URLs and plain paths.
/// Remote URLs are fetched only when `fetch_remote` is set; otherwise they
/// come back as [`ImageSource::Remote`].
///
/// Fetching blocks the calling thread. Call from a worker thread, not
/// from inside an async task.
///
/// # Errors
///
/// Returns [`RenderError::Resource`] if a file cannot be read, a fetch
/// fails or returns an error status, the bytes are not a recognized image
/// format, or a data URI is malformed.
pub fn resolve(src: &str, fetch_remote: bool) -> RenderResult<ImageSource> {
    if let Some(rest) = src.strip_prefix("data:") {
        validate_data_uri(rest)?;
        return Ok(ImageSource::Inline(src.to_string()));
    }
    if src.starts_with("http://") || src.starts_with("https://") {
        if !fetch_remote {
            return Ok(ImageSource::Remote(src.to_string()));
        }
        let bytes = fetch(src)?;
        return Ok(ImageSource::Inline(data_uri(&bytes)?));
    }

    let path = src.strip_prefix("file://").unwrap_or(src);
    let bytes = std::fs::read(Path::new(path))
        .map_err(|e| RenderError::Resource(format!("Cannot read image {path}: {e}")))?;
    Ok(ImageSource::Inline(data_uri(&bytes)?))
}

/// Download a remote image.
fn fetch(url: &str) -> RenderResult<Vec<u8>> {
    tracing::debug!("Fetching image {}", url);
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| RenderError::Resource(format!("Cannot create HTTP client: {e}")))?;
    let response = client
        .get(url)
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .map_err(|e| RenderError::Resource(format!("Cannot fetch image {url}: {e}")))?;
    let bytes = response
        .bytes()
        .map_err(|e| RenderError::Resource(format!("Cannot read image {url}: {e}")))?;
    Ok(bytes.to_vec())
}

/// Encode image bytes as a base64 data URI, sniffing the MIME type.
///
/// # Errors
///
/// Returns [`RenderError::Resource`] if the bytes are not a known image format.
pub fn data_uri(bytes: &[u8]) -> RenderResult<String> {
    let format = image::guess_format(bytes)
        .map_err(|e| RenderError::Resource(format!("Unrecognized image data: {e}")))?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{};base64,{encoded}", format.to_mime_type()))
}

/// Check the metadata/payload split of a data URI and decode base64 payloads.
fn validate_data_uri(rest: &str) -> RenderResult<()> {
    let (metadata, payload) = rest
        .split_once(',')
        .ok_or_else(|| RenderError::Resource("Invalid data URI: missing comma".to_string()))?;

    if metadata.ends_with(";base64") {
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| RenderError::Resource(format!("Failed to decode base64: {e}")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 PNG.
    const PIXEL_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    /// Serve one canned HTTP response on a loopback port; returns the base URL.
    fn serve_once(status: &'static str, body: Vec<u8>) -> String {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).expect("read");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let head = format!(
                "HTTP/1.1 {status}\r\nContent-Type: image/png\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).expect("write head");
            stream.write_all(&body).expect("write body");
        });
        format!("http://{addr}")
    }

    fn pixel_png() -> Vec<u8> {
        base64::engine::general_purpose::STANDARD
            .decode(PIXEL_PNG)
            .expect("decode fixture")
    }

    #[test]
    fn test_remote_url_left_alone_when_fetching_disabled() {
        let src = "https://images.example.com/photo.jpg";
        assert_eq!(
            resolve(src, false).expect("resolve"),
            ImageSource::Remote(src.to_string())
        );
    }

    #[test]
    fn test_remote_image_is_fetched_and_inlined() {
        let base = serve_once("200 OK", pixel_png());
        let url = format!("{base}/photo.png");
        match resolve(&url, true).expect("resolve") {
            ImageSource::Inline(uri) => {
                assert_eq!(uri, format!("data:image/png;base64,{PIXEL_PNG}"));
            }
            ImageSource::Remote(_) => panic!("expected inline"),
        }
    }

    #[test]
    fn test_remote_error_status_is_a_resource_error() {
        let base = serve_once("404 Not Found", Vec::new());
        let err = resolve(&format!("{base}/gone.png"), true).expect_err("404");
        assert!(matches!(err, RenderError::Resource(_)));
    }

    #[test]
    fn test_data_uri_passes_through() {
        let src = format!("data:image/png;base64,{PIXEL_PNG}");
        assert_eq!(resolve(&src, true).expect("resolve"), ImageSource::Inline(src.clone()));
    }

    #[test]
    fn test_bad_data_uri_is_rejected() {
        assert!(resolve("data:image/png;base64", true).is_err());
        assert!(resolve("data:image/png;base64,@@@", true).is_err());
    }

    #[test]
    fn test_local_file_is_inlined() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("pixel.png");
        std::fs::write(&path, pixel_png()).expect("write fixture");

        let url = format!("file://{}", path.display());
        match resolve(&url, false).expect("resolve") {
            ImageSource::Inline(uri) => assert!(uri.starts_with("data:image/png;base64,")),
            ImageSource::Remote(_) => panic!("expected inline"),
        }
    }

    #[test]
    fn test_missing_file_is_a_resource_error() {
        let err = resolve("/definitely/not/here.png", false).expect_err("missing");
        assert!(matches!(err, RenderError::Resource(_)));
    }
}
