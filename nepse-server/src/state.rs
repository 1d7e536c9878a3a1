//! Shared handler state

use std::sync::Arc;

use sqlx::PgPool;

use crate::service::market::MarketSource;
use crate::service::stock_service::ListingOptions;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub market: Arc<dyn MarketSource>,
    pub listing: ListingOptions,
}

impl AppState {
    pub fn new(pool: PgPool, market: Arc<dyn MarketSource>, listing: ListingOptions) -> Self {
        Self {
            pool,
            market,
            listing,
        }
    }
}
