//! Shared test harness for integration tests.
//!
//! Builds the full router over an in-memory database, with the external
//! transcoder swappable for a stub script so audio/video paths are testable
//! without ffmpeg installed.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;
use tower::ServiceExt;

use mediamorph::config::Config;
use mediamorph::server::{create_router, AppContext};
use mediamorph_db::pool::{init_memory_pool, DbPool};
use mediamorph_db::store::SessionStore;

pub const MULTIPART_BOUNDARY: &str = "mediamorph-test-boundary";

/// Test harness wrapping a router backed by an in-memory database.
pub struct TestHarness {
    pub router: Router,
    pub pool: DbPool,
}

impl TestHarness {
    /// Default harness: 600s session timeout, transcoder left as ffmpeg
    /// (image-only tests never spawn it).
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Harness with a custom config over a fresh in-memory pool.
    pub fn with_config(config: Config) -> Self {
        let pool = init_memory_pool().expect("failed to create in-memory pool");
        Self::with_config_and_pool(config, pool)
    }

    /// Harness reusing an existing pool, for tests that need two router
    /// instances over the same persisted state.
    pub fn with_config_and_pool(config: Config, pool: DbPool) -> Self {
        let store = SessionStore::new(pool.clone(), config.sessions.timeout_secs);
        let ctx = AppContext::new(config, store);
        Self {
            router: create_router(ctx),
            pool,
        }
    }

    /// Rewind a session's last activity by `secs`.
    pub fn age_session(&self, session_id: &str, secs: i64) {
        let conn = self.pool.get().unwrap();
        conn.execute(
            "UPDATE sessions SET last_activity = last_activity - ? WHERE session_id = ?",
            rusqlite::params![secs, session_id],
        )
        .unwrap();
    }
}

/// Write an executable shell stub standing in for the transcoder.
/// Invoked as: `tool -nostdin -y -i INPUT OUTPUT`.
pub fn stub_transcoder(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("transcoder");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "#!/bin/sh\n{body}").unwrap();
    drop(file);
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A tiny valid PNG with an alpha channel.
pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(3, 3, image::Rgba([0, 0, 255, 200]));
    let mut buf = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// Build a multipart request uploading one file.
pub fn upload_request(session_token: &str, filename: &str, contents: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(format!("/upload?session_id={session_token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Send a request and return the status with the raw body bytes.
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

/// Send a request and parse the response body as JSON.
pub async fn send_json(router: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let (status, body) = send(router, request).await;
    let json = serde_json::from_slice(&body)
        .unwrap_or_else(|_| panic!("non-JSON body: {}", String::from_utf8_lossy(&body)));
    (status, json)
}

/// Shorthand for an empty-bodied request.
pub fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}
