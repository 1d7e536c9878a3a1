//! API Error Handling
//!
//! Unified error types and conversion for API responses. Error bodies are
//! `{"detail": "<message>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::service::stock_service::StockError;

pub const INVALID_DATE: &str = "Invalid date format, please use YYYY-MM-DD format.";

/// API error type
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    UnprocessableEntity(String),
    DatabaseError(sqlx::Error),
    UpstreamError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::DatabaseError(err) => {
                tracing::error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database operation failed".to_string(),
                )
            }
            ApiError::UpstreamError(msg) => {
                tracing::error!("Market source error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "Failed to scrape market data".to_string(),
                )
            }
        };

        (status, Json(serde_json::json!({ "detail": message }))).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::DatabaseError(err)
    }
}

impl From<StockError> for ApiError {
    fn from(err: StockError) -> Self {
        match err {
            StockError::InvalidDate(_) => ApiError::BadRequest(INVALID_DATE.to_string()),
            StockError::ValidationError(msg) => ApiError::UnprocessableEntity(msg),
            StockError::NotFound(msg) => ApiError::NotFound(msg),
            StockError::DatabaseError(err) => ApiError::DatabaseError(err),
            StockError::MarketError(err) => ApiError::UpstreamError(err.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
