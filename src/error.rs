use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Error taxonomy for the routing core. Every non-2xx HTTP response is shaped
/// from one of these variants via [`IntoResponse`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("no location strategy resolved this postal code")]
    CodeNotFound,

    #[error("facility store error: {0}")]
    StoreError(String),

    #[error("request deadline exceeded")]
    Deadline,

    #[error("service temporarily unavailable")]
    ServiceUnavailable,
}

impl AppError {
    fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::CodeNotFound => "CodeNotFound",
            AppError::StoreError(_) => "StoreError",
            AppError::Deadline => "Deadline",
            AppError::ServiceUnavailable => "ServiceUnavailable",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::CodeNotFound => StatusCode::NOT_FOUND,
            AppError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Deadline => StatusCode::GATEWAY_TIMEOUT,
            AppError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }));
        tracing::warn!(kind = self.kind(), "request failed");
        (status, body).into_response()
    }
}
