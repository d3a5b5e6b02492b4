//! HTTP handlers: thin translation between requests and dispatcher calls.

use axum::{
    extract::{Multipart, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use mediamorph_common::{Error, SessionId};
use serde::Deserialize;
use serde_json::json;

use super::{error::ApiError, AppContext};
use crate::convert::ConvertOptions;

/// Header carrying the display name on download responses.
pub const FILE_NAME_HEADER: &str = "file-name";

pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/health", get(health))
        .route("/upload", post(upload))
        .route("/convert", patch(convert))
        .route("/download", get(download))
        .route("/formats", get(list_formats))
        .route("/formats/conversions", get(list_conversions))
        .route("/formats/normalize", get(normalize_format))
        .route("/formats/check", get(check_conversion))
}

// ============================================================================
// Request types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SessionQuery {
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct ConvertQuery {
    session_id: String,
    to_format: String,
    #[serde(default)]
    optimise: bool,
}

#[derive(Debug, Deserialize)]
struct FormatQuery {
    format: String,
}

#[derive(Debug, Deserialize)]
struct ConversionPairQuery {
    from: String,
    to: String,
}

fn parse_session(token: &str) -> Result<SessionId, ApiError> {
    token
        .parse()
        .map_err(|_| ApiError(Error::session_not_found(token)))
}

// ============================================================================
// Handlers
// ============================================================================

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Accept a multipart upload and store it under the resolved session.
async fn upload(
    State(ctx): State<AppContext>,
    Query(query): Query<SessionQuery>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError(Error::corrupt_input(format!("malformed multipart body: {e}"))))?
    {
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };

        let contents = field
            .bytes()
            .await
            .map_err(|e| ApiError(Error::corrupt_input(format!("failed to read upload: {e}"))))?;

        let outcome = ctx
            .dispatcher
            .upload(&query.session_id, &filename, contents.to_vec())?;

        return Ok(Json(json!({
            "file_name": outcome.display_name,
            "session_id": outcome.session_id.to_string(),
        })));
    }

    Err(ApiError(Error::corrupt_input("no file field in upload")))
}

async fn convert(
    State(ctx): State<AppContext>,
    Query(query): Query<ConvertQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let session_id = parse_session(&query.session_id)?;
    let options = ConvertOptions {
        optimise: query.optimise,
    };

    let new_name = ctx
        .dispatcher
        .convert(session_id, &query.to_format, &options)
        .await?;

    Ok(Json(json!({ "new_file_name": new_name })))
}

async fn download(
    State(ctx): State<AppContext>,
    Query(query): Query<SessionQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let session_id = parse_session(&query.session_id)?;
    let file = ctx.dispatcher.download(session_id)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&file.media_type)
            .unwrap_or(HeaderValue::from_static("application/octet-stream")),
    );
    if let Ok(value) = HeaderValue::from_str(&file.display_name) {
        headers.insert(FILE_NAME_HEADER, value);
    }

    Ok((StatusCode::OK, headers, file.contents))
}

async fn list_formats(State(ctx): State<AppContext>) -> impl IntoResponse {
    Json(ctx.dispatcher.registry().all_formats())
}

async fn list_conversions(
    State(ctx): State<AppContext>,
    Query(query): Query<FormatQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let targets = ctx.dispatcher.registry().valid_targets(&query.format)?;
    Ok(Json(targets))
}

async fn normalize_format(
    State(ctx): State<AppContext>,
    Query(query): Query<FormatQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let registry = ctx.dispatcher.registry();
    let canonical = registry.resolve(&query.format);
    if !registry.is_supported(&canonical) {
        return Err(ApiError(Error::unsupported_format(canonical)));
    }
    Ok(Json(canonical))
}

async fn check_conversion(
    State(ctx): State<AppContext>,
    Query(query): Query<ConversionPairQuery>,
) -> impl IntoResponse {
    Json(
        ctx.dispatcher
            .registry()
            .is_valid_conversion(&query.from, &query.to),
    )
}
