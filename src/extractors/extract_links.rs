use scraper::{Html, Selector};
use url::Url;

/// Collects the href of every anchor on a rendered page, in document order.
///
/// Anchors without an href attribute are skipped. Hrefs are resolved against
/// `page_url` the way a browser reports `a.href`, so an empty href becomes the
/// page itself; anything that does not resolve is kept as written. Duplicates
/// are preserved.
pub fn extract_links(markup: &str, page_url: &str) -> Vec<String> {
    let document = Html::parse_document(markup);
    let selector = Selector::parse("a[href]").unwrap();
    let base = Url::parse(page_url).ok();

    document
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::trim)
        .map(|href| match base.as_ref().and_then(|base| base.join(href).ok()) {
            Some(resolved) => resolved.to_string(),
            None => href.to_string(),
        })
        .collect()
}
