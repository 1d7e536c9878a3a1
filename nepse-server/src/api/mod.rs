//! API Module
//!
//! HTTP API layer for the price service.
//! Each submodule handles endpoints for a specific domain.

pub mod env;
pub mod error;
pub mod health;
pub mod stock;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/env", get(env::read_env))
        // Stored rows
        .route(
            "/stocks_data",
            post(stock::create_stock)
                .put(stock::update_stock)
                .delete(stock::delete_stock),
        )
        // Listings with live fallback
        .route("/stocks_data_date", get(stock::stocks_by_date))
        .route(
            "/stocks_data_date_and_symbol",
            get(stock::stocks_by_date_and_symbol),
        )
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
