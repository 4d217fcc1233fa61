use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;

use crate::extractors::SkuSet;

/// Reads a one-SKU-per-line file. A missing file is an empty list.
pub async fn load_existing_skus(path: &Path) -> Result<SkuSet> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(SkuSet::new()),
        Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
    };

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Appends SKUs to `path`, one per line, creating the file if needed.
pub async fn append_skus(skus: &[String], path: &Path) -> Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;

    for sku in skus {
        file.write_all(format!("{sku}\n").as_bytes())
            .await
            .with_context(|| format!("Failed to write SKU {sku}"))?;
    }
    file.flush().await?;

    Ok(())
}

/// Appends the SKUs of `found` that are not in `known` yet, recording them in
/// `known`. Returns the appended SKUs in the order they were found.
pub async fn append_new_skus(
    found: Vec<String>,
    known: &mut SkuSet,
    path: &Path,
) -> Result<Vec<String>> {
    let new_skus: Vec<String> = found
        .into_iter()
        .filter(|sku| known.insert(sku.clone()))
        .collect();

    if !new_skus.is_empty() {
        append_skus(&new_skus, path).await?;
    }
    Ok(new_skus)
}
