use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;

use crate::core::locate::visible_text_lines;
use crate::domain::model::{PageKind, RawPage};
use crate::domain::ports::PageFetcher;
use crate::utils::error::{ExtractError, Result};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Pages whose visible body text is shorter than this are treated as JS
/// bootstrap shells: the markup only carries script tags and the content
/// arrives after script execution.
const SHELL_TEXT_THRESHOLD: usize = 200;

/// Returns true when the markup is evidently a JS bootstrap shell that needs
/// the rendering fallback to produce its content.
pub fn is_bootstrap_shell(html: &str) -> bool {
    let text_len: usize = visible_text_lines(html).iter().map(|l| l.len()).sum();
    text_len < SHELL_TEXT_THRESHOLD
}

/// Obtains page content either as served markup or as a script-rendered DOM
/// snapshot. Pure I/O boundary; holds no parsing logic.
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let timeout = Duration::from_secs(timeout_secs);
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client, timeout })
    }
}

fn fetch_failed(url: &str, reason: impl std::fmt::Display) -> ExtractError {
    ExtractError::FetchError {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_static(&self, url: &str) -> Result<RawPage> {
        tracing::debug!("Fetching static markup from: {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_failed(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_failed(url, format!("HTTP status {}", status)));
        }

        let body = response.text().await.map_err(|e| fetch_failed(url, e))?;
        tracing::debug!("Retrieved {} bytes of static markup", body.len());
        Ok(RawPage::new(PageKind::Static, body, url))
    }

    async fn fetch_rendered(&self, url: &str) -> Result<RawPage> {
        tracing::info!("Rendering page scripts for: {}", url);
        let config = BrowserConfig::builder()
            .request_timeout(self.timeout)
            .build()
            .map_err(|reason| fetch_failed(url, reason))?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| fetch_failed(url, e))?;
        let events = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let outcome = render_dom(&browser, url).await;

        // The browser session is scoped to this single call; tear it down on
        // every exit path before looking at the outcome.
        if let Err(e) = browser.close().await {
            tracing::warn!("Failed to close browser session: {}", e);
        }
        events.abort();

        let content = outcome?;
        tracing::debug!("Rendered DOM is {} bytes", content.len());
        Ok(RawPage::new(PageKind::Rendered, content, url))
    }
}

async fn render_dom(browser: &Browser, url: &str) -> Result<String> {
    let page = browser
        .new_page(url)
        .await
        .map_err(|e| fetch_failed(url, e))?;
    page.wait_for_navigation()
        .await
        .map_err(|e| fetch_failed(url, e))?;
    page.content().await.map_err(|e| fetch_failed(url, e))
}
