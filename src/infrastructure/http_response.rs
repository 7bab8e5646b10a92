// HTTP response utilities for files that must never be cached
use axum::{
    body::Body,
    http::{HeaderValue, Response, StatusCode, header},
};
use std::path::Path;

/// Serve a file with headers that force the browser to re-fetch it every time.
pub async fn no_cache_file_response(path: &Path) -> Result<Response<Body>, StatusCode> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Failed to read file");
        StatusCode::NOT_FOUND
    })?;

    let content_length = HeaderValue::from_str(&bytes.len().to_string())
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, image_mime_type(path))
        .header(header::CONTENT_LENGTH, content_length)
        .header(header::CACHE_CONTROL, "no-cache, no-store, must-revalidate")
        .header(header::PRAGMA, "no-cache")
        .header(header::EXPIRES, "0")
        .body(Body::from(bytes))
        .map_err(|e| {
            tracing::error!(error = %e, "Response build error");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// Guess an image MIME type from the extension, assuming PNG when unknown.
pub fn image_mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        _ => "image/png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_mime_type() {
        assert_eq!(image_mime_type(Path::new("/tmp/wp.png")), "image/png");
        assert_eq!(image_mime_type(Path::new("/tmp/wp.JPG")), "image/jpeg");
        assert_eq!(image_mime_type(Path::new("/tmp/wp")), "image/png");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = no_cache_file_response(&dir.path().join("wp.png")).await;
        assert_eq!(result.unwrap_err(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_file_response_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wp.webp");
        std::fs::write(&path, b"RIFF").unwrap();

        let response = no_cache_file_response(&path).await.unwrap();
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "image/webp");
        assert_eq!(headers[header::CONTENT_LENGTH], "4");
        assert_eq!(headers[header::CACHE_CONTROL], "no-cache, no-store, must-revalidate");
        assert_eq!(headers[header::EXPIRES], "0");
    }
}
