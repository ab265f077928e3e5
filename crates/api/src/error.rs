//! HTTP error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use tally_core::dashboard::DashboardError;
use tally_shared::AppError;

/// Generic message for 5xx bodies; the cause goes in `error`.
const SERVER_ERROR_MESSAGE: &str = "Server Error";

/// An [`AppError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.0.is_server_error() {
            error!(error = %self.0, code = self.0.error_code(), "Request failed");
            (
                status,
                Json(json!({
                    "message": SERVER_ERROR_MESSAGE,
                    "error": self.0.message()
                })),
            )
                .into_response()
        } else {
            (status, Json(json!({ "message": self.0.message() }))).into_response()
        }
    }
}
