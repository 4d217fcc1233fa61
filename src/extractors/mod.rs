pub mod extract_links;
pub mod extract_skus;
pub mod extract_snapshot_skus;

pub use extract_links::extract_links;
pub use extract_skus::{extract_skus, is_sku, SkuSet};
pub use extract_snapshot_skus::extract_snapshot_skus;
