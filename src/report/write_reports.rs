use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::error;

use crate::scraping::RunResult;

/// Renders the per-category report: a header, the links, then the SKU set.
pub fn render_links_report(run: &RunResult) -> String {
    let mut report = String::new();

    for category in run.categories() {
        let _ = writeln!(report, "\n=== Category: {} ===", category.category_url);
        report.push_str("Links:\n");
        for link in &category.links {
            report.push_str(link);
            report.push('\n');
        }
        let _ = writeln!(report, "\nSKUs: {:?}", category.skus);
    }

    report
}

/// Renders the global SKU list, one per line.
pub fn render_skus_report(run: &RunResult) -> String {
    run.global_skus()
        .into_iter()
        .map(|sku| sku + "\n")
        .collect()
}

pub async fn write_reports(run: &RunResult, links_path: &Path, skus_path: &Path) -> Result<()> {
    tokio::fs::write(links_path, render_links_report(run))
        .await
        .with_context(|| format!("Failed to write {}", links_path.display()))?;
    println!(
        "{}",
        format!("Successfully saved links and SKUs to {}", links_path.display()).green()
    );

    let global = run.global_skus();
    tokio::fs::write(skus_path, render_skus_report(run))
        .await
        .with_context(|| format!("Failed to write {}", skus_path.display()))?;
    println!(
        "{}",
        format!("Successfully saved {} SKUs to {}", global.len(), skus_path.display()).green()
    );

    Ok(())
}

/// Writes both reports; a failure is logged and swallowed so the run still completes.
pub async fn save_reports(run: &RunResult, links_path: &Path, skus_path: &Path) -> bool {
    match write_reports(run, links_path, skus_path).await {
        Ok(()) => true,
        Err(e) => {
            error!(error = ?e, "failed to save reports");
            eprintln!("{}", format!("Failed to save to files: {e:#}").red());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::SkuSet;
    use crate::scraping::CategoryResult;

    fn sample_run() -> RunResult {
        let mut run = RunResult::default();
        run.insert(CategoryResult {
            category_url: "https://shop.example/tees".to_string(),
            links: vec![
                "https://shop.example/t/AA0001.html".to_string(),
                "https://shop.example/t/AA0001.html".to_string(),
            ],
            skus: SkuSet::from(["AA0001".to_string()]),
            failed_pages: Vec::new(),
        });
        run.insert(CategoryResult {
            category_url: "https://shop.example/polos".to_string(),
            links: vec!["https://shop.example/p/BB0002.html".to_string()],
            skus: SkuSet::from(["AA0001".to_string(), "BB0002".to_string()]),
            failed_pages: Vec::new(),
        });
        run
    }

    #[test]
    fn links_report_layout() {
        let expected = "\n=== Category: https://shop.example/tees ===\n\
Links:\n\
https://shop.example/t/AA0001.html\n\
https://shop.example/t/AA0001.html\n\
\n\
SKUs: {\"AA0001\"}\n\
\n=== Category: https://shop.example/polos ===\n\
Links:\n\
https://shop.example/p/BB0002.html\n\
\n\
SKUs: {\"AA0001\", \"BB0002\"}\n";

        assert_eq!(render_links_report(&sample_run()), expected);
    }

    #[test]
    fn empty_category_prints_empty_set() {
        let mut run = RunResult::default();
        run.insert(CategoryResult::new("https://shop.example/jackets"));

        assert_eq!(
            render_links_report(&run),
            "\n=== Category: https://shop.example/jackets ===\nLinks:\n\nSKUs: {}\n"
        );
    }

    #[test]
    fn skus_report_lists_global_set_once() {
        assert_eq!(render_skus_report(&sample_run()), "AA0001\nBB0002\n");
    }

    #[tokio::test]
    async fn writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let links = dir.path().join("links_and_skus.txt");
        let skus = dir.path().join("skus.txt");

        assert!(save_reports(&sample_run(), &links, &skus).await);

        let written = std::fs::read_to_string(&links).unwrap();
        assert!(written.contains("=== Category: https://shop.example/polos ==="));
        assert_eq!(std::fs::read_to_string(&skus).unwrap(), "AA0001\nBB0002\n");
    }

    #[tokio::test]
    async fn write_failure_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let links = dir.path().join("missing").join("links_and_skus.txt");
        let skus = dir.path().join("skus.txt");

        assert!(!save_reports(&sample_run(), &links, &skus).await);
        assert!(!skus.exists());
    }
}
