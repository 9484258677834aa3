//! Photo API endpoints and image URL parsing.

use photofeed_core::PageRequest;
use url::Url;

/// Error type for URL parsing failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Parse an image key into a fetchable URL.
///
/// Trims whitespace, requires an http(s) scheme and drops any fragment.
/// The query string is kept as-is.
pub fn parse_image_url(input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// URL of one page of the photo listing: `{base}/v2/list?page={page}&limit={per_page}`.
pub fn photo_list_url(base: &Url, request: &PageRequest) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().extend(["v2", "list"]);
    }
    url.query_pairs_mut()
        .clear()
        .append_pair("page", &request.page.to_string())
        .append_pair("limit", &request.per_page.to_string());
    url
}

/// URL of a photo scaled to `width` x `height`: `{base}/id/{id}/{width}/{height}`.
pub fn sized_image_url(base: &Url, id: &str, width: u32, height: u32) -> Url {
    let mut url = base.clone();
    let (width, height) = (width.to_string(), height.to_string());
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().extend(["id", id, width.as_str(), height.as_str()]);
    }
    url.set_query(None);
    url
}
