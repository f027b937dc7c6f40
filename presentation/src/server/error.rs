use super::signature::SignatureError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use triage_application::TokenError;

/// Private sentinel carrying an explicit 400 through the `anyhow::Error` chain.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }

    fn status(&self) -> StatusCode {
        if self.0.downcast_ref::<BadRequestError>().is_some()
            || self.0.downcast_ref::<serde_json::Error>().is_some()
        {
            return StatusCode::BAD_REQUEST;
        }
        if self.0.downcast_ref::<SignatureError>().is_some() {
            return StatusCode::UNAUTHORIZED;
        }
        match self.0.downcast_ref::<TokenError>() {
            Some(TokenError::InvalidState) => StatusCode::BAD_REQUEST,
            Some(TokenError::AuthExchange(_)) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
