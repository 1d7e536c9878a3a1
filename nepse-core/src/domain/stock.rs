//! Stock price domain types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the daily price table
///
/// JSON keys follow the column headers of the exchange's table, which is
/// also the shape existing API consumers read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockQuote {
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Close_Price_Rs")]
    pub close_price_rs: f64,
    #[serde(rename = "Open_Price_Rs")]
    pub open_price_rs: f64,
    #[serde(rename = "High_Price_Rs")]
    pub high_price_rs: f64,
    #[serde(rename = "Low_Price_Rs")]
    pub low_price_rs: f64,
    #[serde(rename = "Total_Traded_Quantity")]
    pub total_traded_quantity: i64,
    #[serde(rename = "Total_Traded_Value")]
    pub total_traded_value: f64,
    #[serde(rename = "Total_Trades")]
    pub total_trades: i64,
    /// Last traded price, kept as the portal prints it
    #[serde(rename = "LTP")]
    pub ltp: String,
    #[serde(rename = "Previous_Day_Close_Price_Rs")]
    pub previous_day_close_price_rs: f64,
    #[serde(rename = "Average_Traded_Price_Rs")]
    pub average_traded_price_rs: f64,
    #[serde(rename = "Fifty_Two_Week_High_Rs")]
    pub fifty_two_week_high_rs: f64,
    #[serde(rename = "Fifty_Two_Week_Low_Rs")]
    pub fifty_two_week_low_rs: f64,
    #[serde(rename = "Market_Capitalization_Rs__Amt_in_Millions")]
    pub market_capitalization_rs_amt_in_millions: f64,
    #[serde(rename = "Close_Date")]
    pub close_date: NaiveDate,
}

/// A persisted quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    #[serde(rename = "Sn")]
    pub sn: i32,
    #[serde(flatten)]
    pub quote: StockQuote,
}
