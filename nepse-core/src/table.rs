//! Price table parsing
//!
//! Turns the HTML of the portal's "today price" table into quotes. Numeric
//! cells use thousands separators and print `-` for "no value".

use std::sync::LazyLock;

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};

use crate::domain::stock::StockQuote;

/// Cells in a data row: row counter followed by the 14 quote columns
pub const CELLS_PER_ROW: usize = 15;

static ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("valid row selector"));
static LARGE_TABLE_ROW: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("table.table__lg > tbody > tr").expect("valid large table selector")
});
static CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("valid cell selector"));

/// Where the data rows live in the fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableLayout {
    /// Every row after the first one in the fragment
    AllRows,
    /// Body rows of the `table__lg` table
    LargeTableBody,
}

/// Parse a numeric cell, falling back to 0.0
pub fn safe_float(value: &str) -> f64 {
    normalize_number(value)
        .map(|v| v.parse::<f64>().unwrap_or(0.0))
        .unwrap_or(0.0)
}

/// Parse an integral cell, falling back to 0
pub fn safe_int(value: &str) -> i64 {
    normalize_number(value)
        .map(|v| v.parse::<i64>().unwrap_or(0))
        .unwrap_or(0)
}

/// Strips separators. `None` means the cell holds no value.
fn normalize_number(value: &str) -> Option<String> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    Some(cleaned)
}

/// Extract quotes from a price table fragment
///
/// Rows that do not have exactly [`CELLS_PER_ROW`] cells are skipped, which
/// drops header and summary rows.
pub fn parse_price_rows(html: &str, close_date: NaiveDate, layout: TableLayout) -> Vec<StockQuote> {
    let fragment = Html::parse_fragment(html);

    let rows: Vec<ElementRef<'_>> = match layout {
        TableLayout::AllRows => fragment.select(&ROW).skip(1).collect(),
        TableLayout::LargeTableBody => fragment.select(&LARGE_TABLE_ROW).collect(),
    };

    rows.into_iter()
        .filter_map(|row| parse_row(row, close_date))
        .collect()
}

fn parse_row(row: ElementRef<'_>, close_date: NaiveDate) -> Option<StockQuote> {
    let cells: Vec<String> = row
        .select(&CELL)
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .collect();

    if cells.len() != CELLS_PER_ROW {
        return None;
    }

    Some(StockQuote {
        symbol: cells[1].clone(),
        close_price_rs: safe_float(&cells[2]),
        open_price_rs: safe_float(&cells[3]),
        high_price_rs: safe_float(&cells[4]),
        low_price_rs: safe_float(&cells[5]),
        total_traded_quantity: safe_int(&cells[6]),
        total_traded_value: safe_float(&cells[7]),
        total_trades: safe_int(&cells[8]),
        ltp: cells[9].clone(),
        previous_day_close_price_rs: safe_float(&cells[10]),
        average_traded_price_rs: safe_float(&cells[11]),
        fifty_two_week_high_rs: safe_float(&cells[12]),
        fifty_two_week_low_rs: safe_float(&cells[13]),
        market_capitalization_rs_amt_in_millions: safe_float(&cells[14]),
        close_date,
    })
}
