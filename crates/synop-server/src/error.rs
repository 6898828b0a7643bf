//! Server-specific error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ingest::IngestError;
use crate::store::StoreError;

/// Application error types
///
/// Every error a handler can surface. "Not found" is not represented here:
/// lookups report absence through the structured sentinel payloads, not
/// through the error path.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Ingestion failed: {0}")]
    Ingest(#[from] IngestError),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Store(ref e) => {
                tracing::error!("Store error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Ingest(ref e) => {
                tracing::error!("Ingestion failed: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Validation(ref message) => (StatusCode::BAD_REQUEST, message.clone()),
        };

        let body = Json(json!({ "error": error_message }));

        (status, body).into_response()
    }
}

impl From<synop_common::schema::CountryCodeError> for AppError {
    fn from(err: synop_common::schema::CountryCodeError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<synop_common::schema::FieldValidationError> for AppError {
    fn from(err: synop_common::schema::FieldValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}
