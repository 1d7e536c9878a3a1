//! Market Source
//!
//! Live price rows scraped from the exchange's "today price" page. The page
//! is rendered client-side, so it is driven through a headless Firefox over
//! WebDriver rather than fetched directly.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::NaiveDate;
use nepse_core::dates::to_portal_date;
use nepse_core::domain::stock::StockQuote;
use nepse_core::table::{TableLayout, parse_price_rows};
use nepse_webdriver::{
    Capabilities, GeckoDriver, Session, WebDriverClient, WebDriverError, free_local_port, keys,
};
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

// Absolute paths into the portal's Angular view
const PAGE_SIZE_SELECT: &str =
    "/html/body/app-root/div/main/div/app-today-price/div/div[2]/div[1]/div[3]/select";
const DATE_INPUT: &str =
    "/html/body/app-root/div/main/div/app-today-price/div/div[2]/div[1]/div[1]/div/input";
const SYMBOL_INPUT: &str =
    "/html/body/app-root/div/main/div/app-today-price/div/div[2]/div[1]/div[2]/input";
const FILTER_BUTTON: &str =
    "/html/body/app-root/div/main/div/app-today-price/div/div[2]/div[1]/div[4]/button[1]";
const RESULT_TABLE: &str = "/html/body/app-root/div/main/div/app-today-price/div/div[3]";

/// Largest page size the portal offers
const PORTAL_PAGE_SIZE: &str = "500";

const DRIVER_READY_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on closing the session once the scrape itself is over
const CLEANUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Source error type
#[derive(Debug)]
pub enum MarketError {
    Driver(WebDriverError),
    Timeout(Duration),
    MissingContent,
    /// The scrape task panicked or was cancelled by runtime shutdown
    Interrupted,
}

impl fmt::Display for MarketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketError::Driver(err) => write!(f, "WebDriver error: {}", err),
            MarketError::Timeout(limit) => write!(f, "scrape did not finish within {:?}", limit),
            MarketError::MissingContent => write!(f, "price table has no content"),
            MarketError::Interrupted => write!(f, "scrape task stopped before finishing"),
        }
    }
}

impl From<WebDriverError> for MarketError {
    fn from(err: WebDriverError) -> Self {
        MarketError::Driver(err)
    }
}

/// Where live rows come from when the database has none
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// All rows of the trading day
    async fn quotes_by_date(&self, date: NaiveDate) -> Result<Vec<StockQuote>, MarketError>;

    /// Rows of one symbol on the trading day
    async fn quotes_by_date_and_symbol(
        &self,
        date: NaiveDate,
        symbol: &str,
    ) -> Result<Vec<StockQuote>, MarketError>;
}

/// Browser settings for [`GeckoMarketSource`]
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    pub portal_url: String,
    pub geckodriver_path: PathBuf,
    /// Existing WebDriver endpoint; when unset a geckodriver is started per scrape
    pub webdriver_url: Option<String>,
    pub settle: Duration,
    /// Deadline for starting the driver, opening the session and reading the table
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
enum PortalFilter {
    Date(NaiveDate),
    DateAndSymbol(NaiveDate, String),
}

impl PortalFilter {
    fn date(&self) -> NaiveDate {
        match self {
            PortalFilter::Date(date) | PortalFilter::DateAndSymbol(date, _) => *date,
        }
    }

    fn layout(&self) -> TableLayout {
        match self {
            PortalFilter::Date(_) => TableLayout::AllRows,
            PortalFilter::DateAndSymbol(..) => TableLayout::LargeTableBody,
        }
    }
}

/// Scrapes the portal through headless Firefox
pub struct GeckoMarketSource {
    settings: Arc<BrowserSettings>,
    permits: Arc<Semaphore>,
}

impl GeckoMarketSource {
    pub fn new(settings: BrowserSettings, max_sessions: usize) -> Self {
        Self {
            settings: Arc::new(settings),
            permits: Arc::new(Semaphore::new(max_sessions.max(1))),
        }
    }

    async fn scrape(&self, filter: PortalFilter) -> Result<Vec<StockQuote>, MarketError> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .expect("scrape semaphore is never closed");

        let started = Instant::now();
        info!("Scraping portal with {:?}", filter);

        // Detached from the request so a dropped connection still closes the browser
        let settings = self.settings.clone();
        let task = tokio::spawn(async move {
            let _permit = permit;
            let scrape = Scrape {
                settings: &settings,
                filter: &filter,
            };
            let html = scrape.run().await?;
            Ok::<_, MarketError>(parse_price_rows(&html, filter.date(), filter.layout()))
        });

        let quotes = match task.await {
            Ok(result) => result?,
            Err(e) => {
                error!("Scrape task failed: {}", e);
                return Err(MarketError::Interrupted);
            }
        };

        info!("Scraped {} rows in {:?}", quotes.len(), started.elapsed());

        Ok(quotes)
    }
}

/// One pass over the portal
struct Scrape<'a> {
    settings: &'a BrowserSettings,
    filter: &'a PortalFilter,
}

impl Scrape<'_> {
    /// Open, drive and close; whatever was opened is closed on every outcome
    async fn run(&self) -> Result<String, MarketError> {
        let mut driver = None;
        let mut session = None;

        let limit = self.settings.timeout;
        let outcome = tokio::time::timeout(limit, self.open_and_drive(&mut driver, &mut session))
            .await
            .unwrap_or(Err(MarketError::Timeout(limit)));

        if let Err(e) = &outcome {
            warn!("Scrape with {:?} failed: {}", self.filter, e);
        }

        close(driver, session).await;
        outcome
    }

    async fn open_and_drive(
        &self,
        driver: &mut Option<GeckoDriver>,
        session: &mut Option<Session>,
    ) -> Result<String, MarketError> {
        let client = match &self.settings.webdriver_url {
            Some(url) => WebDriverClient::new(url.clone()),
            None => {
                let port = free_local_port()?;
                let spawned = GeckoDriver::spawn(
                    &self.settings.geckodriver_path,
                    port,
                    DRIVER_READY_TIMEOUT,
                )
                .await?;
                driver.insert(spawned).client().clone()
            }
        };

        let opened = client.new_session(Capabilities::firefox_headless()).await?;
        self.drive(session.insert(opened)).await
    }

    async fn drive(&self, session: &Session) -> Result<String, MarketError> {
        session.goto(&self.settings.portal_url).await?;
        self.settle().await;

        match self.filter {
            PortalFilter::Date(date) => {
                let select = session.find_xpath(PAGE_SIZE_SELECT).await?;
                session
                    .select_by_visible_text(&select, PORTAL_PAGE_SIZE)
                    .await?;
                self.settle().await;

                self.enter_text(session, DATE_INPUT, &to_portal_date(*date))
                    .await?;
            }
            PortalFilter::DateAndSymbol(date, symbol) => {
                self.enter_text(session, DATE_INPUT, &to_portal_date(*date))
                    .await?;
                self.enter_text(session, SYMBOL_INPUT, symbol).await?;
            }
        }

        let filter_button = session.find_xpath(FILTER_BUTTON).await?;
        session.click(&filter_button).await?;
        self.settle().await;

        let table = session.find_xpath(RESULT_TABLE).await?;
        session
            .property(&table, "innerHTML")
            .await?
            .ok_or(MarketError::MissingContent)
    }

    async fn enter_text(&self, session: &Session, xpath: &str, text: &str) -> Result<(), MarketError> {
        let input = session.find_xpath(xpath).await?;
        session.clear(&input).await?;
        session.send_keys(&input, text).await?;
        session.send_keys(&input, keys::ENTER).await?;
        self.settle().await;
        Ok(())
    }

    async fn settle(&self) {
        if !self.settings.settle.is_zero() {
            tokio::time::sleep(self.settings.settle).await;
        }
    }
}

async fn close(driver: Option<GeckoDriver>, session: Option<Session>) {
    if let Some(session) = session {
        match tokio::time::timeout(CLEANUP_TIMEOUT, session.quit()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to close browser session: {}", e),
            Err(_) => warn!("Timed out closing browser session"),
        }
    }

    if let Some(driver) = driver {
        if let Err(e) = driver.shutdown().await {
            warn!("Failed to stop geckodriver: {}", e);
        }
    }
}

#[async_trait]
impl MarketSource for GeckoMarketSource {
    async fn quotes_by_date(&self, date: NaiveDate) -> Result<Vec<StockQuote>, MarketError> {
        self.scrape(PortalFilter::Date(date)).await
    }

    async fn quotes_by_date_and_symbol(
        &self,
        date: NaiveDate,
        symbol: &str,
    ) -> Result<Vec<StockQuote>, MarketError> {
        self.scrape(PortalFilter::DateAndSymbol(date, symbol.to_string()))
            .await
    }
}

/// Serves a fixed set of quotes and records what was asked for
#[cfg(test)]
pub(crate) struct StaticMarket {
    pub quotes: Vec<StockQuote>,
    pub requests: std::sync::Mutex<Vec<(NaiveDate, Option<String>)>>,
}

#[cfg(test)]
impl StaticMarket {
    pub fn new(quotes: Vec<StockQuote>) -> Self {
        Self {
            quotes,
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl MarketSource for StaticMarket {
    async fn quotes_by_date(&self, date: NaiveDate) -> Result<Vec<StockQuote>, MarketError> {
        self.requests.lock().unwrap().push((date, None));
        Ok(self.quotes.clone())
    }

    async fn quotes_by_date_and_symbol(
        &self,
        date: NaiveDate,
        symbol: &str,
    ) -> Result<Vec<StockQuote>, MarketError> {
        self.requests
            .lock()
            .unwrap()
            .push((date, Some(symbol.to_string())));
        Ok(self
            .quotes
            .iter()
            .filter(|q| q.symbol == symbol)
            .cloned()
            .collect())
    }
}
