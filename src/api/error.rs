//! Error to HTTP response mapping
//!
//! Every handler returns `Result<T, ApiError>`. Failures become a
//! `{"error": "..."}` body with a status picked from the [`AdminError`]
//! variant found in the error chain.

use crate::error::AdminError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// A failed request: status code plus the message sent to the client
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        match e.downcast_ref::<AdminError>() {
            Some(AdminError::InvalidRequest(msg)) => Self::bad_request(msg.clone()),
            Some(AdminError::StoreUnavailable(_)) => {
                tracing::warn!(error = %e, "store unavailable");
                Self::new(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
            }
            _ => {
                tracing::error!(error = ?e, "request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }
}

impl From<AdminError> for ApiError {
    fn from(e: AdminError) -> Self {
        anyhow::Error::from(e).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_request_is_bad_request_without_prefix() {
        let err: ApiError = AdminError::InvalidRequest("Invalid action: upgrade".into()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Invalid action: upgrade");
    }

    #[test]
    fn test_store_unavailable_is_503() {
        let err: ApiError = AdminError::StoreUnavailable("closed".into()).into();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_relay_error_is_500_with_diagnostic() {
        let err: ApiError = AdminError::Relay {
            program: "marubot".into(),
            status: "exit code 1".into(),
            stderr: "no provider".into(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message().contains("no provider"));
    }

    #[test]
    fn test_context_wrapped_admin_error_keeps_status() {
        use anyhow::Context;
        let result: crate::error::Result<()> =
            Err(AdminError::InvalidRequest("bad pin".into())).context("saving layout");
        let err: ApiError = result.unwrap_err().into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_plain_anyhow_error_is_500() {
        let err: ApiError = anyhow::anyhow!("boom").into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "boom");
    }
}
