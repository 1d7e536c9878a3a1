//! Listing responses

use serde::{Deserialize, Serialize};

use crate::domain::stock::{StockQuote, StockRecord};
use crate::pagination::Pagination;

/// One page of rows plus the size of the full result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPage<T> {
    pub data: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_records: u64,
}

impl<T> StockPage<T> {
    pub fn new(data: Vec<T>, pagination: Pagination, total_records: u64) -> Self {
        Self {
            data,
            page: pagination.page,
            page_size: pagination.page_size,
            total_records,
        }
    }
}

/// Result of a listing request
///
/// Stored rows carry their serial number, scraped rows do not. An empty
/// scrape is reported as a message rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Listing {
    Records(StockPage<StockRecord>),
    Quotes(StockPage<StockQuote>),
    Message { message: String },
}

impl Listing {
    pub fn message(message: impl Into<String>) -> Self {
        Listing::Message {
            message: message.into(),
        }
    }
}
