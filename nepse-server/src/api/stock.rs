//! Stock API Handlers
//!
//! HTTP endpoints for price rows. Inputs arrive as query parameters.

use axum::{
    Json,
    extract::{Query, State},
};
use nepse_core::domain::stock::StockRecord;
use nepse_core::dto::page::Listing;
use nepse_core::dto::stock::{DateQuery, DateSymbolQuery, StockForm, StockKey};
use serde::Serialize;

use crate::api::error::ApiResult;
use crate::service::stock_service;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /stocks_data
/// Store a new price row
pub async fn create_stock(
    State(state): State<AppState>,
    Query(form): Query<StockForm>,
) -> ApiResult<Json<StockRecord>> {
    tracing::info!("Creating stock row: {} on {}", form.symbol, form.close_date);

    let record = stock_service::create_stock(&state.pool, form).await?;

    Ok(Json(record))
}

/// PUT /stocks_data
/// Update the row of a symbol on a day
pub async fn update_stock(
    State(state): State<AppState>,
    Query(form): Query<StockForm>,
) -> ApiResult<Json<StockRecord>> {
    tracing::info!("Updating stock row: {} on {}", form.symbol, form.close_date);

    let record = stock_service::update_stock(&state.pool, form).await?;

    Ok(Json(record))
}

/// DELETE /stocks_data
/// Delete the rows of a symbol on a day
pub async fn delete_stock(
    State(state): State<AppState>,
    Query(key): Query<StockKey>,
) -> ApiResult<Json<MessageResponse>> {
    tracing::info!("Deleting stock rows: {} on {}", key.symbol, key.close_date);

    let message = stock_service::delete_stock(&state.pool, key).await?;

    Ok(Json(MessageResponse { message }))
}

/// GET /stocks_data_date
/// Page through a day's rows, scraping them when none are stored
pub async fn stocks_by_date(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<Listing>> {
    tracing::debug!("Listing stock rows for {:?}", query.date);

    let listing =
        stock_service::list_by_date(&state.pool, state.market.as_ref(), &query, state.listing)
            .await?;

    Ok(Json(listing))
}

/// GET /stocks_data_date_and_symbol
/// Page through a symbol's rows on a day, scraping them when none are stored
pub async fn stocks_by_date_and_symbol(
    State(state): State<AppState>,
    Query(query): Query<DateSymbolQuery>,
) -> ApiResult<Json<Listing>> {
    tracing::debug!(
        "Listing stock rows for {:?} on {:?}",
        query.symbol,
        query.date
    );

    let listing = stock_service::list_by_date_and_symbol(
        &state.pool,
        state.market.as_ref(),
        &query,
        state.listing,
    )
    .await?;

    Ok(Json(listing))
}
