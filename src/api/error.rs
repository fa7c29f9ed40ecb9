use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// An error returned to an HTTP client as a JSON body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    message: String,
    details: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
    code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: "ValidationError",
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: "InternalServerError",
            message: message.into(),
            details,
        }
    }

    /// Maps a service error onto a response; the error text is only exposed for
    /// server-side failures when `expose_details` is set.
    #[must_use]
    pub fn from_error(err: &Error, expose_details: bool) -> Self {
        if err.is_validation() {
            return Self::bad_request(err.to_string());
        }

        tracing::error!(error = %err, "Request failed");
        Self::internal(
            "Failed to calculate product prices",
            expose_details.then(|| err.to_string()),
        )
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = ErrorResponse {
            error: self.error,
            message: self.message,
            code: self.status.as_u16(),
            details: self.details,
        };

        (self.status, Json(payload)).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
