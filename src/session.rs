//! Browser session used to render store-locator pages.
//!
//! The scraping engine never touches WebDriver directly. It talks to a
//! [`PageSession`], a narrow navigate/fill/click/read contract, so the
//! pagination and parsing logic can run against a scripted session in
//! tests and against a real browser in production.
//!
//! # Architecture
//!
//! - [`PageSession`]: the contract the engine drives
//! - [`WebDriverSession`]: `fantoccini`-backed implementation
//! - [`BrowserOptions`]: Chrome capabilities used when the session starts
//!
//! # Waiting
//!
//! All waits go through [`PageSession::settle`], a fixed pause. Swapping it
//! for a condition wait only means overriding that one method.

use fantoccini::{Client, ClientBuilder, Locator};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

use crate::error::{Result, ScrapeError};

/// The operations the scraping engine needs from a rendered page.
pub trait PageSession {
    /// Load `url` in the current window.
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Type `text` into the first element matching `selector`.
    async fn fill(&mut self, selector: &str, text: &str) -> Result<()>;

    /// Click the first element matching `selector`.
    async fn click(&mut self, selector: &str) -> Result<()>;

    /// Click the `index`-th element matching `selector`.
    ///
    /// Fails with [`ScrapeError::MissingElement`] when fewer elements match.
    async fn click_nth(&mut self, selector: &str, index: usize) -> Result<()>;

    /// Current rendered markup of the page.
    async fn content(&mut self) -> Result<String>;

    /// Attribute `name` of the first element matching `selector`.
    async fn attribute(&mut self, selector: &str, name: &str) -> Result<Option<String>>;

    /// Visible text of the first element matching `selector`.
    async fn text(&mut self, selector: &str) -> Result<String>;

    /// Wait for the page to finish rendering.
    async fn settle(&mut self, pause: Duration) {
        sleep(pause).await;
    }
}

/// Chrome options applied when a WebDriver session is created.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BrowserOptions {
    pub headless: bool,
    pub window_size: String,
    pub disable_gpu: bool,
    pub user_agent: String,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            window_size: "1920x1080".to_string(),
            disable_gpu: true,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/94.0.4606.61 Safari/537.36"
                .to_string(),
        }
    }
}

impl BrowserOptions {
    /// Command-line arguments handed to Chrome.
    pub fn chrome_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.headless {
            args.push("--headless=old".to_string());
        }
        args.push(format!("--window-size={}", self.window_size));
        if self.disable_gpu {
            args.push("--disable-gpu".to_string());
        }
        args.push(format!("user-agent={}", self.user_agent));
        args
    }

    /// W3C capabilities for a new Chrome session.
    pub fn capabilities(&self) -> serde_json::Map<String, serde_json::Value> {
        let caps = json!({
            "browserName": "chrome",
            "goog:chromeOptions": {
                "args": self.chrome_args(),
            }
        });
        match caps {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        }
    }
}

/// [`PageSession`] backed by a WebDriver server (chromedriver).
#[derive(Debug)]
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    /// Start a new browser session on the WebDriver server at `webdriver_url`.
    #[instrument(level = "info", skip(options))]
    pub async fn connect(webdriver_url: &str, options: &BrowserOptions) -> Result<Self> {
        let client = ClientBuilder::native()
            .capabilities(options.capabilities())
            .connect(webdriver_url)
            .await?;
        info!(headless = options.headless, "WebDriver session started");
        Ok(Self { client })
    }

    /// End the browser session.
    #[instrument(level = "info", skip_all)]
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        info!("WebDriver session closed");
        Ok(())
    }
}

impl PageSession for WebDriverSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        debug!(%url, "navigate");
        self.client.goto(url).await?;
        Ok(())
    }

    async fn fill(&mut self, selector: &str, text: &str) -> Result<()> {
        let input = self.client.find(Locator::Css(selector)).await?;
        input.send_keys(text).await?;
        Ok(())
    }

    async fn click(&mut self, selector: &str) -> Result<()> {
        debug!(%selector, "click");
        let element = self.client.find(Locator::Css(selector)).await?;
        element.click().await?;
        Ok(())
    }

    async fn click_nth(&mut self, selector: &str, index: usize) -> Result<()> {
        debug!(%selector, index, "click nth");
        let elements = self.client.find_all(Locator::Css(selector)).await?;
        let count = elements.len();
        let element = elements.into_iter().nth(index).ok_or_else(|| {
            ScrapeError::missing(
                "page-number control",
                format!("{selector} has {count} matches, wanted index {index}"),
            )
        })?;
        element.click().await?;
        Ok(())
    }

    async fn content(&mut self) -> Result<String> {
        Ok(self.client.source().await?)
    }

    async fn attribute(&mut self, selector: &str, name: &str) -> Result<Option<String>> {
        let element = self.client.find(Locator::Css(selector)).await?;
        Ok(element.attr(name).await?)
    }

    async fn text(&mut self, selector: &str) -> Result<String> {
        let element = self.client.find(Locator::Css(selector)).await?;
        Ok(element.text().await?)
    }
}
