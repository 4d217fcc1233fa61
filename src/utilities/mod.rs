pub mod build_page_url;
pub mod generate_random_delay;
pub mod logging;
pub mod save_snapshot;
pub mod sku_file;
