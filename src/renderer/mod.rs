//! Rendering engine boundary.
//!
//! The crawl only needs "render this URL and hand back its markup", so the
//! browser sits behind the [`PageRenderer`] trait. One renderer is acquired per
//! run with [`connect`] and must be released with [`PageRenderer::close`].

pub mod chromium;
pub mod flaresolverr;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::config::{RendererBackend, Settings};

/// Raw markup of a fully rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// The URL that was requested.
    pub url: String,
    /// Document markup after client-side content and the scroll trigger settled.
    pub markup: String,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to start renderer: {0}")]
    Launch(String),

    #[error("page {url} was not ready after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("FlareSolverr could not solve {url}: {message}")]
    FlareSolverr { url: String, message: String },

    #[error("browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A browser session able to render category pages one at a time.
#[async_trait]
pub trait PageRenderer: Send {
    /// Load `url`, wait until it is ready, trigger lazy content, and return the markup.
    async fn render(&mut self, url: &str) -> Result<RenderedPage, RenderError>;

    /// Release the session and whatever process or remote state backs it.
    async fn close(self: Box<Self>) -> Result<(), RenderError>;
}

/// Acquires the rendering session selected by `settings.renderer.backend`.
pub async fn connect(settings: &Settings) -> Result<Box<dyn PageRenderer>, RenderError> {
    let config = &settings.renderer;
    match config.backend {
        RendererBackend::Chromium => {
            info!("launching Chromium");
            Ok(Box::new(chromium::ChromiumRenderer::launch(config).await?))
        }
        RendererBackend::FlareSolverr => {
            info!(endpoint = %config.flaresolverr_url, "opening FlareSolverr session");
            Ok(Box::new(flaresolverr::FlareSolverrRenderer::connect(config).await?))
        }
    }
}
