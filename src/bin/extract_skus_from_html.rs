use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing::{info, warn};

use sku_scrapping::extractors::extract_snapshot_skus;
use sku_scrapping::utilities::logging::init_logging;
use sku_scrapping::utilities::sku_file::{append_new_skus, load_existing_skus};

/// Re-extracts SKUs from saved `response_page_*.html` snapshots and appends the
/// ones not already listed in the output file.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Snapshot files to scan.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// SKU list to extend, one code per line.
    #[arg(short, long, default_value = "skus_from_html.txt")]
    output: PathBuf,

    /// Only take codes from product links, skipping standalone codes in the page text.
    #[arg(long)]
    links_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut known = load_existing_skus(&cli.output).await?;
    info!(count = known.len(), path = %cli.output.display(), "loaded existing SKUs");

    let mut appended = 0;
    for file in &cli.files {
        let markup = match tokio::fs::read_to_string(file).await {
            Ok(markup) => markup,
            Err(e) => {
                warn!(path = %file.display(), error = %e, "skipping unreadable snapshot");
                continue;
            }
        };

        let found = extract_snapshot_skus(&markup, !cli.links_only);
        let new_skus = append_new_skus(found, &mut known, &cli.output).await?;

        if new_skus.is_empty() {
            info!(path = %file.display(), "no new SKUs");
            continue;
        }

        info!(path = %file.display(), count = new_skus.len(), "appended new SKUs");
        appended += new_skus.len();
    }

    println!(
        "{}",
        format!("Successfully appended {} SKUs to {}", appended, cli.output.display()).green()
    );
    Ok(())
}
