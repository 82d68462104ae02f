//! API error type and its HTTP mapping.
//!
//! Two failure kinds only: bad uploads are rejected before any
//! processing with a 400 and a short message; anything that goes
//! wrong during processing is logged at the call site and surfaced
//! as a generic 500 with no detail leaked.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// JSON error payload: `{"error": "..."}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Errors surfaced to HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The upload was malformed or disallowed; rejected before any
    /// processing. The message is shown to the client.
    #[error("{0}")]
    BadRequest(String),

    /// Decoding or processing failed. The detail is logged where the
    /// failure happened, never sent to the client.
    #[error("image processing failed")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_maps_to_400() {
        let response = ApiError::BadRequest("no file provided".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_maps_to_500_with_generic_message() {
        let err = ApiError::Internal;
        assert_eq!(err.to_string(), "image processing failed");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
