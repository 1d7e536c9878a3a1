//! geckodriver process supervision
//!
//! Starts a local geckodriver, waits until it accepts sessions and stops it
//! again. The child is killed when the handle is dropped, so a driver never
//! outlives the scrape that started it.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::WebDriverClient;
use crate::error::{Result, WebDriverError};

const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A running geckodriver process
#[derive(Debug)]
pub struct GeckoDriver {
    child: Child,
    client: WebDriverClient,
}

impl GeckoDriver {
    /// Start geckodriver on `127.0.0.1:port` and wait until it is ready
    ///
    /// # Arguments
    /// * `path` - geckodriver executable
    /// * `port` - Port for the driver's HTTP endpoint
    /// * `ready_timeout` - How long to wait for `/status` to report ready
    pub async fn spawn(path: impl AsRef<Path>, port: u16, ready_timeout: Duration) -> Result<Self> {
        let path = path.as_ref();
        info!("Starting geckodriver {} on port {}", path.display(), port);

        let child = Command::new(path)
            .arg("--host")
            .arg("127.0.0.1")
            .arg("--port")
            .arg(port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let mut driver = Self {
            child,
            client: WebDriverClient::new(format!("http://127.0.0.1:{}", port)),
        };

        driver.wait_ready(ready_timeout).await?;
        Ok(driver)
    }

    /// Client bound to this driver
    pub fn client(&self) -> &WebDriverClient {
        &self.client
    }

    pub fn url(&self) -> &str {
        self.client.base_url()
    }

    /// Stop the driver process
    pub async fn shutdown(mut self) -> Result<()> {
        if self.child.try_wait()?.is_none() {
            self.child.kill().await?;
        }
        debug!("geckodriver at {} stopped", self.client.base_url());
        Ok(())
    }

    async fn wait_ready(&mut self, timeout: Duration) -> Result<()> {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            if let Some(status) = self.child.try_wait()? {
                return Err(WebDriverError::Spawn(std::io::Error::other(format!(
                    "geckodriver exited early with {}",
                    status
                ))));
            }

            match self.client.status().await {
                Ok(true) => {
                    debug!("geckodriver ready at {}", self.client.base_url());
                    return Ok(());
                }
                Ok(false) => debug!("geckodriver not ready yet"),
                Err(WebDriverError::Request(_)) => {}
                Err(e) => warn!("Unexpected geckodriver status response: {}", e),
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(WebDriverError::NotReady(timeout));
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
    }
}

/// Ask the OS for a currently unused local port
pub fn free_local_port() -> Result<u16> {
    let listener = std::net::TcpListener::bind(("127.0.0.1", 0))?;
    Ok(listener.local_addr()?.port())
}
