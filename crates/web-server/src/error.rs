use api_client::error::ApiError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use export::ExportError;
use scenario_store::StoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Metrics provider error: {0}")]
    Provider(#[from] ApiError),
    #[error("Scenario store error: {0}")]
    Store(#[from] StoreError),
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Provider(ApiError::NotConfigured) => {
                tracing::warn!("Metrics requested but Shopify credentials are not configured.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": ApiError::NotConfigured.to_string() }),
                )
            }
            AppError::Provider(api_err) => {
                tracing::error!(error = ?api_err, "Error fetching Shopify metrics.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Failed to fetch metrics", "details": api_err.to_string() }),
                )
            }
            AppError::Store(StoreError::NoMetrics) => (
                StatusCode::CONFLICT,
                json!({ "error": StoreError::NoMetrics.to_string() }),
            ),
            AppError::Store(StoreError::NotFound(id)) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("Scenario '{}' not found", id) }),
            ),
            AppError::Export(ExportError::NoScenarios) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": ExportError::NoScenarios.to_string() }),
            ),
            AppError::Export(export_err) => {
                tracing::error!(error = ?export_err, "Export error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An error occurred while exporting scenarios" }),
                )
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
            AppError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, json!({ "error": message })),
            AppError::Forbidden(message) => (StatusCode::FORBIDDEN, json!({ "error": message })),
        };

        (status, Json(body)).into_response()
    }
}
