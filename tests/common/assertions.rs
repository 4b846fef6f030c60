//! Helpers for inspecting HTTP responses and ZIP payloads

use axum::body::Body;
use axum::http::{Request, Response};
use std::io::{Cursor, Read};
use tower::ServiceExt;

/// GET `uri` through `app` with the given API key
pub async fn get(app: axum::Router, uri: &str, api_key: Option<&str>) -> Response<Body> {
    let mut request = Request::builder().uri(uri);
    if let Some(key) = api_key {
        request = request.header("X-Api-Key", key);
    }
    app.oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Collect a response body
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

/// Value of a response header, or "" if absent
pub fn header_value(response: &Response<Body>, name: &str) -> String {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Read every entry of a ZIP archive as (name, UTF-8 contents), in archive order
pub fn zip_entries(bytes: Vec<u8>) -> Vec<(String, String)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut contents = String::new();
            file.read_to_string(&mut contents).unwrap();
            (file.name().to_string(), contents)
        })
        .collect()
}
