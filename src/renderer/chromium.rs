//! Chromium-backed renderer using chromiumoxide.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::debug;

use super::{PageRenderer, RenderError, RenderedPage};
use crate::config::config::RendererConfig;

const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// One headless Chromium process with a single reused tab.
pub struct ChromiumRenderer {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    ready_timeout: Duration,
    settle_delay: Duration,
}

impl ChromiumRenderer {
    pub async fn launch(config: &RendererConfig) -> Result<Self, RenderError> {
        let mut builder = BrowserConfig::builder()
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage");

        if let Some(path) = &config.chrome_path {
            builder = builder.chrome_executable(path);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.arg(format!("--user-agent={user_agent}"));
        }

        let browser_config = builder.build().map_err(RenderError::Launch)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        // The CDP connection only makes progress while its handler is polled.
        let handler = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let page = browser.new_page("about:blank").await?;

        Ok(Self {
            browser,
            page,
            handler,
            ready_timeout: Duration::from_millis(config.ready_timeout_ms),
            settle_delay: Duration::from_millis(config.settle_delay_ms),
        })
    }
}

#[async_trait]
impl PageRenderer for ChromiumRenderer {
    async fn render(&mut self, url: &str) -> Result<RenderedPage, RenderError> {
        let page = &self.page;
        let ready = async {
            page.goto(url).await?;
            page.find_element("body").await?;
            Ok::<_, CdpError>(())
        };

        match timeout(self.ready_timeout, ready).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(RenderError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })
            }
            Err(_) => {
                return Err(RenderError::Timeout {
                    url: url.to_string(),
                    timeout_ms: self.ready_timeout.as_millis() as u64,
                })
            }
        }

        page.evaluate(SCROLL_TO_BOTTOM).await?;
        debug!(delay_ms = self.settle_delay.as_millis() as u64, "waiting for lazy content");
        sleep(self.settle_delay).await;

        let markup = page.content().await?;

        Ok(RenderedPage {
            url: url.to_string(),
            markup,
        })
    }

    async fn close(mut self: Box<Self>) -> Result<(), RenderError> {
        let closed = self.browser.close().await;
        match self.browser.wait().await {
            Ok(status) => debug!(?status, "Chromium exited"),
            Err(e) => debug!(error = %e, "could not wait for Chromium to exit"),
        }
        self.handler.abort();
        closed?;
        Ok(())
    }
}
