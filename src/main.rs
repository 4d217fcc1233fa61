use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::info;

use sku_scrapping::config::load_config;
use sku_scrapping::renderer;
use sku_scrapping::report::save_reports;
use sku_scrapping::scraping::crawl_with_session;
use sku_scrapping::utilities::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    // Load configuration settings
    let settings = load_config()?;
    let categories = &settings.crawler.categories;

    println!(
        "{}",
        format!("Starting SKU scraper for {} categories...", categories.len()).cyan()
    );

    // One browser session for the whole run
    let renderer = renderer::connect(&settings)
        .await
        .context("Failed to start the rendering session")?;

    let run = crawl_with_session(renderer, &settings).await;

    for category in run.categories() {
        info!(
            category = %category.category_url,
            links = category.links.len(),
            skus = category.skus.len(),
            failed_pages = category.failed_pages.len(),
            "category summary"
        );
    }

    let global = run.global_skus();
    println!(
        "{}",
        format!("Collected {} unique SKUs across all categories", global.len()).green()
    );

    println!(
        "Saving links and SKUs to {} and {}...",
        settings.output.links_file, settings.output.skus_file
    );
    save_reports(
        &run,
        Path::new(&settings.output.links_file),
        Path::new(&settings.output.skus_file),
    )
    .await;

    Ok(())
}
