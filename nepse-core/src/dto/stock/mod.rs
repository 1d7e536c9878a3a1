//! Stock request DTOs

use serde::{Deserialize, Serialize};

use crate::dates::{DateError, parse_close_date};
use crate::domain::stock::StockQuote;
use crate::pagination::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, Pagination};

/// Fields of a price row as submitted for create and update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockForm {
    pub symbol: String,
    pub close_price_rs: f64,
    pub open_price_rs: f64,
    pub high_price_rs: f64,
    pub low_price_rs: f64,
    pub total_traded_quantity: i64,
    pub total_traded_value: f64,
    pub total_trades: i64,
    pub ltp: String,
    pub previous_day_close_price_rs: f64,
    pub average_traded_price_rs: f64,
    pub fifty_two_week_high_rs: f64,
    pub fifty_two_week_low_rs: f64,
    #[serde(
        rename = "market_capitalization_rs__amt_in_millions",
        alias = "market_capitalization_rs_amt_in_millions"
    )]
    pub market_capitalization_rs_amt_in_millions: f64,
    /// `YYYY-MM-DD`
    pub close_date: String,
}

impl StockForm {
    /// Build the quote this form describes
    pub fn to_quote(&self) -> Result<StockQuote, DateError> {
        let close_date = parse_close_date(&self.close_date)?;

        Ok(StockQuote {
            symbol: self.symbol.clone(),
            close_price_rs: self.close_price_rs,
            open_price_rs: self.open_price_rs,
            high_price_rs: self.high_price_rs,
            low_price_rs: self.low_price_rs,
            total_traded_quantity: self.total_traded_quantity,
            total_traded_value: self.total_traded_value,
            total_trades: self.total_trades,
            ltp: self.ltp.clone(),
            previous_day_close_price_rs: self.previous_day_close_price_rs,
            average_traded_price_rs: self.average_traded_price_rs,
            fifty_two_week_high_rs: self.fifty_two_week_high_rs,
            fifty_two_week_low_rs: self.fifty_two_week_low_rs,
            market_capitalization_rs_amt_in_millions: self.market_capitalization_rs_amt_in_millions,
            close_date,
        })
    }
}

/// Identifies the rows of one symbol on one trading day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockKey {
    pub symbol: String,
    /// `YYYY-MM-DD`
    pub close_date: String,
}

/// Listing by close date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

/// Listing by close date and symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateSymbolQuery {
    pub date: Option<String>,
    pub symbol: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl DateQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.page_size)
    }
}

impl DateSymbolQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.page_size)
    }
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}
