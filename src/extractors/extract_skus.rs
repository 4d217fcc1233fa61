use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

/// Deduplicated SKU codes, e.g. `AB1234`.
pub type SkuSet = BTreeSet<String>;

fn sku_regex() -> &'static Regex {
    static SKU_REGEX: OnceLock<Regex> = OnceLock::new();
    SKU_REGEX.get_or_init(|| {
        Regex::new(r#"href="[^"]*/([A-Z]{2}[0-9]{4})\.html"#).expect("SKU pattern is valid")
    })
}

/// Extracts every SKU referenced by an `href="…/<CODE>.html"` attribute in the text.
///
/// The pattern needs the literal `href="` prefix, so it is meant to run over raw
/// page markup rather than over hrefs that were already pulled out of anchors.
pub fn extract_skus(text: &str) -> SkuSet {
    sku_matches(text)
        .map(|code| {
            tracing::debug!(sku = code, "matched SKU");
            code.to_string()
        })
        .collect()
}

/// Yields every listing SKU match in the order it appears in `text`, repeats included.
pub fn sku_matches(text: &str) -> impl Iterator<Item = &str> + '_ {
    sku_regex()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|code| code.as_str())
}

/// Returns true when `code` has the exact SKU shape: two uppercase letters, four digits.
pub fn is_sku(code: &str) -> bool {
    let bytes = code.as_bytes();
    bytes.len() == 6
        && bytes[..2].iter().all(u8::is_ascii_uppercase)
        && bytes[2..].iter().all(u8::is_ascii_digit)
}
