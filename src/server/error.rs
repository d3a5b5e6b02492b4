//! Mapping from the service error taxonomy to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mediamorph_common::Error;
use serde_json::json;

/// Wrapper giving [`Error`] an HTTP representation.
///
/// Every variant maps to a distinct, user-actionable status; backend and
/// storage failures are 500s whose detail still reaches the client.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Error::UnsupportedFormat(_) | Error::InvalidConversion { .. } => {
                StatusCode::BAD_REQUEST
            }
            Error::AlreadyConverted(_) => StatusCode::CONFLICT,
            Error::CorruptInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::ConversionFailed { .. } | Error::Storage(_) | Error::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: Error) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(Error::session_not_found("x")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(Error::unsupported_format("DOCX")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(Error::invalid_conversion("PNG", "SVG")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(Error::already_converted("x")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(Error::corrupt_input("bad bytes")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(Error::conversion_failed("ffmpeg", "timed out")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(status_of(Error::storage("oops")), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
