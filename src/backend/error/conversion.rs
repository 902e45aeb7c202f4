//! Error-to-Response Conversion
//!
//! REST failures are returned as structured JSON with a human-readable
//! message: `{"error": "..."}`, plus a machine-readable `code` for
//! authentication failures (used by the channel handshake refusal).

use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::types::ApiError;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            // Full detail goes to the log, never to the client.
            tracing::error!("internal error: {self}");
        }

        let body = match &self {
            ApiError::Auth(err) => json!({
                "error": self.public_message(),
                "code": err.code(),
            }),
            _ => json!({ "error": self.public_message() }),
        };

        let mut response = (status, Json(body)).into_response();
        response.headers_mut().insert(
            header::CACHE_CONTROL,
            header::HeaderValue::from_static("no-store"),
        );
        response
    }
}
