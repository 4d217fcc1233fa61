use std::path::Path;

use tracing::{info, warn};

use crate::extractors::{extract_links, extract_skus, SkuSet};
use crate::renderer::PageRenderer;
use crate::utilities::build_page_url::{build_page_url, PAGE_OFFSETS};
use crate::utilities::save_snapshot::save_snapshot;

/// What a single listing page contributed to its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Scraped {
        page_url: String,
        links: Vec<String>,
        skus: SkuSet,
    },
    Failed {
        page_url: String,
        reason: String,
    },
}

/// Links and SKUs gathered over every page of one category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryResult {
    pub category_url: String,
    /// Every anchor href, in discovery order, duplicates included.
    pub links: Vec<String>,
    pub skus: SkuSet,
    /// Page URLs that contributed nothing because fetching them failed.
    pub failed_pages: Vec<String>,
}

impl CategoryResult {
    pub fn new(category_url: &str) -> Self {
        CategoryResult {
            category_url: category_url.to_string(),
            ..Default::default()
        }
    }

    /// Folds one page into the running result. Failed pages add no links or SKUs.
    pub fn absorb(&mut self, outcome: PageOutcome) {
        match outcome {
            PageOutcome::Scraped { links, skus, .. } => {
                self.links.extend(links);
                self.skus.extend(skus);
            }
            PageOutcome::Failed { page_url, .. } => self.failed_pages.push(page_url),
        }
    }
}

/// Renders one listing page and runs both extraction passes over its markup.
pub async fn scrape_page(
    page_url: &str,
    renderer: &mut dyn PageRenderer,
    snapshot_dir: &Path,
) -> PageOutcome {
    info!(%page_url, "scraping page");

    let page = match renderer.render(page_url).await {
        Ok(page) => page,
        Err(e) => {
            warn!(%page_url, error = %e, "failed to scrape page");
            return PageOutcome::Failed {
                page_url: page_url.to_string(),
                reason: e.to_string(),
            };
        }
    };

    match save_snapshot(snapshot_dir, &page.markup).await {
        Ok(path) => info!(path = %path.display(), "saved raw HTML"),
        Err(e) => warn!(error = %e, "could not save raw HTML snapshot"),
    }

    let links = extract_links(&page.markup, page_url);
    let skus = extract_skus(&page.markup);
    info!(links = links.len(), skus = skus.len(), "page scraped");

    PageOutcome::Scraped {
        page_url: page_url.to_string(),
        links,
        skus,
    }
}

/// Scrapes the fixed listing offsets of `category_url` in order.
///
/// A page that fails is logged and skipped; the category result still carries
/// everything the other pages produced.
pub async fn scrape_category(
    category_url: &str,
    renderer: &mut dyn PageRenderer,
    snapshot_dir: &Path,
) -> CategoryResult {
    let mut result = CategoryResult::new(category_url);

    for offset in PAGE_OFFSETS {
        let outcome = match build_page_url(category_url, offset) {
            Ok(page_url) => scrape_page(&page_url, renderer, snapshot_dir).await,
            Err(e) => {
                warn!(%category_url, offset, error = %e, "cannot build page URL");
                PageOutcome::Failed {
                    page_url: format!("{category_url} (start={offset})"),
                    reason: e.to_string(),
                }
            }
        };
        result.absorb(outcome);
    }

    info!(
        %category_url,
        unique_skus = result.skus.len(),
        failed_pages = result.failed_pages.len(),
        "category done"
    );
    result
}
