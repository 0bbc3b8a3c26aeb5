use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::encode::EncodeError;
use crate::llm::LlmError;

/// Structured API error that serializes to JSON.
///
/// The body always carries a human-readable `error` message and a stable
/// `code`, plus `geminiMove: null` so move-endpoint clients can read the
/// same field on success and failure.
#[derive(Debug)]
pub enum ApiError {
    InvalidBoard(EncodeError),
    MissingInput(String),
    LlmUnavailable(String),
    Upstream(LlmError),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    error: String,
    code: String,
    gemini_move: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::InvalidBoard(err) => (
                StatusCode::BAD_REQUEST,
                "INVALID_BOARD",
                format!("Invalid board state: {err}"),
            ),
            ApiError::MissingInput(field) => (
                StatusCode::BAD_REQUEST,
                "MISSING_INPUT",
                format!("Missing required field: {field}"),
            ),
            ApiError::LlmUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "LLM_UNAVAILABLE",
                format!("No language model configured: {msg}"),
            ),
            ApiError::Upstream(err) => (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_FAILED",
                format!("AI move generation failed: {err}"),
            ),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            gemini_move: None,
        };

        (status, Json(body)).into_response()
    }
}

impl From<EncodeError> for ApiError {
    fn from(err: EncodeError) -> Self {
        ApiError::InvalidBoard(err)
    }
}

impl From<LlmError> for ApiError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey(_) | LlmError::UnsupportedProvider(_) => {
                ApiError::LlmUnavailable(err.to_string())
            }
            other => ApiError::Upstream(other),
        }
    }
}
