pub mod scrape_all;
pub mod scrape_category;

pub use scrape_all::{crawl_with_session, scrape_all, RunResult};
pub use scrape_category::{scrape_category, scrape_page, CategoryResult, PageOutcome};
