use url::Url;

/// Listing offsets fetched for every category, one page of 48 products each.
pub const PAGE_OFFSETS: [u32; 3] = [0, 48, 96];

/// Builds the URL of the listing page starting at `offset`.
///
/// Offset 0 is the category URL untouched; any other offset appends a
/// `start=<offset>` query parameter.
pub fn build_page_url(category_url: &str, offset: u32) -> Result<String, url::ParseError> {
    if offset == 0 {
        return Ok(category_url.to_string());
    }

    let mut url = Url::parse(category_url)?;
    url.query_pairs_mut()
        .append_pair("start", &offset.to_string());
    Ok(url.to_string())
}
