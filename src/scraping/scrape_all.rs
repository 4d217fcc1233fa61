use std::panic::{resume_unwind, AssertUnwindSafe};
use std::path::Path;

use futures::FutureExt;
use tracing::{error, info};

use crate::config::Settings;
use crate::extractors::SkuSet;
use crate::renderer::PageRenderer;
use crate::scraping::scrape_category::{scrape_category, CategoryResult};
use crate::utilities::generate_random_delay::generate_random_delay;

/// Per-category results of one crawl, in the order categories were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    categories: Vec<CategoryResult>,
}

impl RunResult {
    /// Records a category result. Scraping a category again replaces its earlier
    /// entry but keeps its position.
    pub fn insert(&mut self, result: CategoryResult) {
        match self
            .categories
            .iter_mut()
            .find(|existing| existing.category_url == result.category_url)
        {
            Some(existing) => *existing = result,
            None => self.categories.push(result),
        }
    }

    pub fn categories(&self) -> &[CategoryResult] {
        &self.categories
    }

    pub fn get(&self, category_url: &str) -> Option<&CategoryResult> {
        self.categories
            .iter()
            .find(|result| result.category_url == category_url)
    }

    /// Union of every category's SKUs.
    pub fn global_skus(&self) -> SkuSet {
        self.categories
            .iter()
            .flat_map(|result| result.skus.iter().cloned())
            .collect()
    }
}

/// Scrapes every category in order, pausing a random interval between them.
pub async fn scrape_all(
    category_urls: &[String],
    renderer: &mut dyn PageRenderer,
    settings: &Settings,
) -> RunResult {
    let snapshot_dir = Path::new(&settings.output.snapshot_dir);
    let mut run = RunResult::default();

    for (index, category_url) in category_urls.iter().enumerate() {
        info!(%category_url, "scraping category");
        let result = scrape_category(category_url, renderer, snapshot_dir).await;
        run.insert(result);

        if index + 1 < category_urls.len() {
            generate_random_delay(
                settings.crawler.min_category_delay_ms,
                settings.crawler.max_category_delay_ms,
            )
            .await;
        }
    }

    info!(
        unique_skus = run.global_skus().len(),
        "collected unique SKUs across all categories"
    );
    run
}

/// Runs the crawl on a session acquired by the caller and always releases it,
/// including when the crawl panics (the panic resumes once the session is closed).
pub async fn crawl_with_session(
    mut renderer: Box<dyn PageRenderer>,
    settings: &Settings,
) -> RunResult {
    let outcome = AssertUnwindSafe(scrape_all(
        &settings.crawler.categories,
        renderer.as_mut(),
        settings,
    ))
    .catch_unwind()
    .await;

    if let Err(e) = renderer.close().await {
        error!(error = %e, "failed to release the rendering session");
    }

    match outcome {
        Ok(run) => run,
        Err(panic) => resume_unwind(panic),
    }
}
