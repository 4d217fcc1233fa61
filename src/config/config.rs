use anyhow::{ensure, Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

/// Category listing pages crawled when no `Settings.toml` overrides them.
pub const DEFAULT_CATEGORIES: [&str; 3] = [
    "https://www.adidas.jp/%E3%83%A1%E3%83%B3%E3%82%BA-%E3%82%A6%E3%82%A7%E3%82%A2%E3%83%BB%E6%9C%8D-t%E3%82%B7%E3%83%A3%E3%83%84",
    "https://www.adidas.jp/%E3%83%A1%E3%83%B3%E3%82%BA-%E3%82%A6%E3%82%A7%E3%82%A2%E3%83%BB%E6%9C%8D-%E3%83%9D%E3%83%BC%E3%83%AD%E3%82%B7%E3%83%A3%E3%83%84",
    "https://www.adidas.jp/%E3%83%A1%E3%83%B3%E3%82%BA-%E3%82%A6%E3%82%A7%E3%82%A2%E3%83%BB%E6%9C%8D-%E3%82%B8%E3%83%A3%E3%83%BC%E3%82%B8",
];

pub const SETTINGS_FILE: &str = "Settings.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub crawler: CrawlerConfig,
    pub renderer: RendererConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    pub categories: Vec<String>,
    pub min_category_delay_ms: u64,
    pub max_category_delay_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererBackend {
    Chromium,
    FlareSolverr,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
    pub backend: RendererBackend,
    pub ready_timeout_ms: u64,
    pub settle_delay_ms: u64,
    pub chrome_path: Option<String>,
    pub user_agent: Option<String>,
    pub flaresolverr_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub links_file: String,
    pub skus_file: String,
    pub snapshot_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            crawler: CrawlerConfig {
                categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
                min_category_delay_ms: 2000,
                max_category_delay_ms: 5000,
            },
            renderer: RendererConfig {
                backend: RendererBackend::Chromium,
                ready_timeout_ms: 10_000,
                settle_delay_ms: 3000,
                chrome_path: None,
                user_agent: None,
                flaresolverr_url: "http://localhost:8191/v1".to_string(),
            },
            output: OutputConfig {
                links_file: "links_and_skus.txt".to_string(),
                skus_file: "skus.txt".to_string(),
                snapshot_dir: ".".to_string(),
            },
        }
    }
}

impl Settings {
    fn validate(self) -> Result<Self> {
        ensure!(
            !self.crawler.categories.is_empty(),
            "crawler.categories must list at least one category URL"
        );
        ensure!(
            self.crawler.min_category_delay_ms <= self.crawler.max_category_delay_ms,
            "crawler.min_category_delay_ms ({}) exceeds crawler.max_category_delay_ms ({})",
            self.crawler.min_category_delay_ms,
            self.crawler.max_category_delay_ms
        );
        Ok(self)
    }
}

/// Loads settings from the built-in defaults, then `Settings.toml` if present,
/// then `APP_` environment variables (e.g. `APP_RENDERER__BACKEND=flaresolverr`).
pub fn load_config() -> Result<Settings> {
    load_config_from(SETTINGS_FILE)
}

pub fn load_config_from(path: &str) -> Result<Settings> {
    let defaults = Settings::default();

    let settings = Config::builder()
        .set_default("crawler.categories", defaults.crawler.categories)?
        .set_default("crawler.min_category_delay_ms", defaults.crawler.min_category_delay_ms)?
        .set_default("crawler.max_category_delay_ms", defaults.crawler.max_category_delay_ms)?
        .set_default("renderer.backend", "chromium")?
        .set_default("renderer.ready_timeout_ms", defaults.renderer.ready_timeout_ms)?
        .set_default("renderer.settle_delay_ms", defaults.renderer.settle_delay_ms)?
        .set_default("renderer.flaresolverr_url", defaults.renderer.flaresolverr_url)?
        .set_default("output.links_file", defaults.output.links_file)?
        .set_default("output.skus_file", defaults.output.skus_file)?
        .set_default("output.snapshot_dir", defaults.output.snapshot_dir)?
        .add_source(File::new(path, FileFormat::Toml).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .context("Failed to build configuration")?;

    settings
        .try_deserialize::<Settings>()
        .context("Failed to parse configuration")?
        .validate()
}
