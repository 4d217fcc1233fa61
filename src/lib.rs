//! Crawls e-commerce category listings through a browser and harvests the
//! product links and SKU codes they reference.

pub mod config;
pub mod extractors;
pub mod renderer;
pub mod report;
pub mod scraping;
pub mod utilities;
