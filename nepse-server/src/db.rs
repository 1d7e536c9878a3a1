use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Daily price rows. Columns are nullable like the table they replace.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS nepse (
            sn SERIAL PRIMARY KEY,
            symbol TEXT,
            close_price_rs DOUBLE PRECISION,
            open_price_rs DOUBLE PRECISION,
            high_price_rs DOUBLE PRECISION,
            low_price_rs DOUBLE PRECISION,
            total_traded_quantity BIGINT,
            total_traded_value DOUBLE PRECISION,
            total_trades BIGINT,
            ltp TEXT,
            previous_day_close_price_rs DOUBLE PRECISION,
            average_traded_price_rs DOUBLE PRECISION,
            fifty_two_week_high_rs DOUBLE PRECISION,
            fifty_two_week_low_rs DOUBLE PRECISION,
            market_capitalization_rs_amt_in_millions DOUBLE PRECISION,
            close_date DATE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_nepse_close_date ON nepse(close_date, sn)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_nepse_close_date_symbol ON nepse(close_date, symbol)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}
