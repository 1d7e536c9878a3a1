//! Stock Repository
//!
//! Handles all database operations on the `nepse` price table.

use async_trait::async_trait;
use chrono::NaiveDate;
use nepse_core::domain::stock::{StockQuote, StockRecord};
use nepse_core::pagination::Pagination;
use sqlx::{PgPool, Postgres, QueryBuilder};

const COLUMNS: &str = r#"
    sn, symbol, close_price_rs, open_price_rs, high_price_rs, low_price_rs,
    total_traded_quantity, total_traded_value, total_trades, ltp,
    previous_day_close_price_rs, average_traded_price_rs,
    fifty_two_week_high_rs, fifty_two_week_low_rs,
    market_capitalization_rs_amt_in_millions, close_date
"#;

const INSERT_COLUMNS: &str = r#"
    symbol, close_price_rs, open_price_rs, high_price_rs, low_price_rs,
    total_traded_quantity, total_traded_value, total_trades, ltp,
    previous_day_close_price_rs, average_traded_price_rs,
    fifty_two_week_high_rs, fifty_two_week_low_rs,
    market_capitalization_rs_amt_in_millions, close_date
"#;

/// Insert a quote and return the stored row
pub async fn create(pool: &PgPool, quote: &StockQuote) -> Result<StockRecord, sqlx::Error> {
    let sql = format!(
        "INSERT INTO nepse ({INSERT_COLUMNS})
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
         RETURNING {COLUMNS}"
    );

    let row = sqlx::query_as::<_, StockRow>(&sql)
        .bind(&quote.symbol)
        .bind(quote.close_price_rs)
        .bind(quote.open_price_rs)
        .bind(quote.high_price_rs)
        .bind(quote.low_price_rs)
        .bind(quote.total_traded_quantity)
        .bind(quote.total_traded_value)
        .bind(quote.total_trades)
        .bind(&quote.ltp)
        .bind(quote.previous_day_close_price_rs)
        .bind(quote.average_traded_price_rs)
        .bind(quote.fifty_two_week_high_rs)
        .bind(quote.fifty_two_week_low_rs)
        .bind(quote.market_capitalization_rs_amt_in_millions)
        .bind(quote.close_date)
        .fetch_one(pool)
        .await?;

    Ok(row.into())
}

/// Insert many quotes in one transaction
pub async fn create_many(pool: &PgPool, quotes: &[StockQuote]) -> Result<u64, sqlx::Error> {
    if quotes.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    // Postgres caps bind parameters at 65535 per statement
    for chunk in quotes.chunks(1000) {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("INSERT INTO nepse ({INSERT_COLUMNS}) "));

        builder.push_values(chunk, |mut b, quote| {
            b.push_bind(&quote.symbol)
                .push_bind(quote.close_price_rs)
                .push_bind(quote.open_price_rs)
                .push_bind(quote.high_price_rs)
                .push_bind(quote.low_price_rs)
                .push_bind(quote.total_traded_quantity)
                .push_bind(quote.total_traded_value)
                .push_bind(quote.total_trades)
                .push_bind(&quote.ltp)
                .push_bind(quote.previous_day_close_price_rs)
                .push_bind(quote.average_traded_price_rs)
                .push_bind(quote.fifty_two_week_high_rs)
                .push_bind(quote.fifty_two_week_low_rs)
                .push_bind(quote.market_capitalization_rs_amt_in_millions)
                .push_bind(quote.close_date);
        });

        inserted += builder.build().execute(&mut *tx).await?.rows_affected();
    }

    tx.commit().await?;
    Ok(inserted)
}

/// Overwrite the lowest-numbered row of `symbol` on `close_date`
///
/// Returns `None` when no row matches.
pub async fn update_first(
    pool: &PgPool,
    symbol: &str,
    close_date: NaiveDate,
    quote: &StockQuote,
) -> Result<Option<StockRecord>, sqlx::Error> {
    let sql = format!(
        "UPDATE nepse
         SET close_price_rs = $1, open_price_rs = $2, high_price_rs = $3, low_price_rs = $4,
             total_traded_quantity = $5, total_traded_value = $6, total_trades = $7, ltp = $8,
             previous_day_close_price_rs = $9, average_traded_price_rs = $10,
             fifty_two_week_high_rs = $11, fifty_two_week_low_rs = $12,
             market_capitalization_rs_amt_in_millions = $13
         WHERE sn = (
             SELECT sn FROM nepse
             WHERE symbol = $14 AND close_date = $15
             ORDER BY sn
             LIMIT 1
         )
         RETURNING {COLUMNS}"
    );

    let row = sqlx::query_as::<_, StockRow>(&sql)
        .bind(quote.close_price_rs)
        .bind(quote.open_price_rs)
        .bind(quote.high_price_rs)
        .bind(quote.low_price_rs)
        .bind(quote.total_traded_quantity)
        .bind(quote.total_traded_value)
        .bind(quote.total_trades)
        .bind(&quote.ltp)
        .bind(quote.previous_day_close_price_rs)
        .bind(quote.average_traded_price_rs)
        .bind(quote.fifty_two_week_high_rs)
        .bind(quote.fifty_two_week_low_rs)
        .bind(quote.market_capitalization_rs_amt_in_millions)
        .bind(symbol)
        .bind(close_date)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| r.into()))
}

/// Delete every row of `symbol` on `close_date`
pub async fn delete(pool: &PgPool, symbol: &str, close_date: NaiveDate) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM nepse WHERE symbol = $1 AND close_date = $2")
        .bind(symbol)
        .bind(close_date)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// One page of rows for a day, optionally narrowed to a symbol
pub async fn find_page(
    pool: &PgPool,
    close_date: NaiveDate,
    symbol: Option<&str>,
    pagination: Pagination,
) -> Result<Vec<StockRecord>, sqlx::Error> {
    let sql = format!(
        "SELECT {COLUMNS}
         FROM nepse
         WHERE close_date = $1 AND ($2::TEXT IS NULL OR symbol = $2)
         ORDER BY sn
         OFFSET $3
         LIMIT $4"
    );

    let rows = sqlx::query_as::<_, StockRow>(&sql)
        .bind(close_date)
        .bind(symbol)
        .bind(pagination.offset() as i64)
        .bind(pagination.limit() as i64)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Count rows for a day, optionally narrowed to a symbol
pub async fn count(
    pool: &PgPool,
    close_date: NaiveDate,
    symbol: Option<&str>,
) -> Result<u64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM nepse WHERE close_date = $1 AND ($2::TEXT IS NULL OR symbol = $2)",
    )
    .bind(close_date)
    .bind(symbol)
    .fetch_one(pool)
    .await?;

    Ok(count.max(0) as u64)
}

// =============================================================================
// Listing Store
// =============================================================================

/// The reads and bulk insert behind the listing endpoints
#[async_trait]
pub trait QuoteStore: Send + Sync {
    async fn find_page(
        &self,
        close_date: NaiveDate,
        symbol: Option<&str>,
        pagination: Pagination,
    ) -> Result<Vec<StockRecord>, sqlx::Error>;

    async fn count(&self, close_date: NaiveDate, symbol: Option<&str>) -> Result<u64, sqlx::Error>;

    async fn create_many(&self, quotes: &[StockQuote]) -> Result<u64, sqlx::Error>;
}

#[async_trait]
impl QuoteStore for PgPool {
    async fn find_page(
        &self,
        close_date: NaiveDate,
        symbol: Option<&str>,
        pagination: Pagination,
    ) -> Result<Vec<StockRecord>, sqlx::Error> {
        find_page(self, close_date, symbol, pagination).await
    }

    async fn count(&self, close_date: NaiveDate, symbol: Option<&str>) -> Result<u64, sqlx::Error> {
        count(self, close_date, symbol).await
    }

    async fn create_many(&self, quotes: &[StockQuote]) -> Result<u64, sqlx::Error> {
        create_many(self, quotes).await
    }
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct StockRow {
    sn: i32,
    symbol: Option<String>,
    close_price_rs: Option<f64>,
    open_price_rs: Option<f64>,
    high_price_rs: Option<f64>,
    low_price_rs: Option<f64>,
    total_traded_quantity: Option<i64>,
    total_traded_value: Option<f64>,
    total_trades: Option<i64>,
    ltp: Option<String>,
    previous_day_close_price_rs: Option<f64>,
    average_traded_price_rs: Option<f64>,
    fifty_two_week_high_rs: Option<f64>,
    fifty_two_week_low_rs: Option<f64>,
    market_capitalization_rs_amt_in_millions: Option<f64>,
    close_date: Option<NaiveDate>,
}

impl From<StockRow> for StockRecord {
    fn from(row: StockRow) -> Self {
        StockRecord {
            sn: row.sn,
            quote: StockQuote {
                symbol: row.symbol.unwrap_or_default(),
                close_price_rs: row.close_price_rs.unwrap_or_default(),
                open_price_rs: row.open_price_rs.unwrap_or_default(),
                high_price_rs: row.high_price_rs.unwrap_or_default(),
                low_price_rs: row.low_price_rs.unwrap_or_default(),
                total_traded_quantity: row.total_traded_quantity.unwrap_or_default(),
                total_traded_value: row.total_traded_value.unwrap_or_default(),
                total_trades: row.total_trades.unwrap_or_default(),
                ltp: row.ltp.unwrap_or_default(),
                previous_day_close_price_rs: row.previous_day_close_price_rs.unwrap_or_default(),
                average_traded_price_rs: row.average_traded_price_rs.unwrap_or_default(),
                fifty_two_week_high_rs: row.fifty_two_week_high_rs.unwrap_or_default(),
                fifty_two_week_low_rs: row.fifty_two_week_low_rs.unwrap_or_default(),
                market_capitalization_rs_amt_in_millions: row
                    .market_capitalization_rs_amt_in_millions
                    .unwrap_or_default(),
                close_date: row.close_date.unwrap_or_default(),
            },
        }
    }
}
