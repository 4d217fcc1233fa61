use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::extractors::extract_skus::sku_matches;

fn product_href_regex() -> &'static Regex {
    static PRODUCT_HREF: OnceLock<Regex> = OnceLock::new();
    PRODUCT_HREF.get_or_init(|| {
        Regex::new(r#"href="[^"]*/products/([A-Z]{2}[0-9]{4})[^"]*""#)
            .expect("product href pattern is valid")
    })
}

fn bare_code_regex() -> &'static Regex {
    static BARE_CODE: OnceLock<Regex> = OnceLock::new();
    BARE_CODE.get_or_init(|| Regex::new(r"\b([A-Z]{2}[0-9]{4})\b").expect("code pattern is valid"))
}

/// Extracts SKUs from a saved page snapshot, in discovery order and without duplicates.
///
/// Runs `/products/<CODE>` hrefs first, then the listing `/<CODE>.html` hrefs, and,
/// when `include_text` is set, any standalone code found in the page text.
pub fn extract_snapshot_skus(markup: &str, include_text: bool) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut skus = Vec::new();

    let product_links = product_href_regex()
        .captures_iter(markup)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()));

    for sku in product_links.chain(sku_matches(markup)) {
        if seen.insert(sku) {
            skus.push(sku.to_string());
        }
    }

    if include_text {
        for caps in bare_code_regex().captures_iter(markup) {
            if let Some(code) = caps.get(1) {
                if seen.insert(code.as_str()) {
                    skus.push(code.as_str().to_string());
                }
            }
        }
    }

    skus
}
