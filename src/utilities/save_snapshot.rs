use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::io::AsyncWriteExt;

/// Writes the raw markup of a fetched page to `response_page_<unix-millis>.html`
/// inside `dir`, for debugging. Returns the written path.
///
/// Fetches landing in the same millisecond get a `_<n>` suffix instead of
/// overwriting each other.
pub async fn save_snapshot(dir: &Path, markup: &str) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create snapshot directory {}", dir.display()))?;

    let stamp = Utc::now().timestamp_millis();
    let mut attempt = 0u32;

    loop {
        let name = match attempt {
            0 => format!("response_page_{stamp}.html"),
            n => format!("response_page_{stamp}_{n}.html"),
        };
        let path = dir.join(name);

        let opened = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await;

        let mut file = match opened {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                attempt += 1;
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to create snapshot {}", path.display()))
            }
        };

        file.write_all(markup.as_bytes())
            .await
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        file.flush().await?;

        return Ok(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_timestamped_file() {
        let dir = tempfile::tempdir().unwrap();
        let snapshots = dir.path().join("snapshots");

        let path = save_snapshot(&snapshots, "<html></html>").await.unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("response_page_"));
        assert!(name.ends_with(".html"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html></html>");
    }

    #[tokio::test]
    async fn back_to_back_snapshots_never_overwrite() {
        let dir = tempfile::tempdir().unwrap();

        let mut paths = Vec::new();
        for i in 0..5 {
            paths.push(save_snapshot(dir.path(), &format!("<p>{i}</p>")).await.unwrap());
        }

        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 5);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 5);
    }
}
