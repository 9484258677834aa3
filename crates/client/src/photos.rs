//! Remote photo listing.
//!
//! Fetches one page of photo metadata from `{base}/v2/list` and decodes it.
//! Anything other than a 200 with a well-formed JSON array is a
//! [`Error::FetchFailed`].

use async_trait::async_trait;
use photofeed_core::{Error, PageLoader, PageRequest};
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::endpoint::photo_list_url;
use crate::http::HttpClient;

/// Raw photo record as served by the API.
#[derive(Debug, Deserialize)]
struct RemotePhoto {
    id: String,
    author: String,
    width: u32,
    height: u32,
    url: String,
    download_url: String,
}

/// A photo in the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub id: String,
    pub author: String,
    pub width: u32,
    pub height: u32,
    /// Page describing the photo.
    pub url: String,
    /// Full-size image.
    pub download_url: String,
}

impl From<RemotePhoto> for Photo {
    fn from(raw: RemotePhoto) -> Self {
        Self {
            id: raw.id,
            author: raw.author,
            width: raw.width,
            height: raw.height,
            url: raw.url,
            download_url: raw.download_url,
        }
    }
}

/// Decode a photo page body.
pub fn decode_photos(body: &[u8]) -> Result<Vec<Photo>, Error> {
    let raw: Vec<RemotePhoto> =
        serde_json::from_slice(body).map_err(|e| Error::FetchFailed(format!("invalid photo page: {e}")))?;
    Ok(raw.into_iter().map(Photo::from).collect())
}

/// [`PageLoader`] for the remote photo listing.
#[derive(Debug, Clone)]
pub struct RemotePhotoLoader<C> {
    http: C,
    base_url: Url,
}

impl<C: HttpClient> RemotePhotoLoader<C> {
    pub fn new(http: C, base_url: Url) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl<C: HttpClient> PageLoader for RemotePhotoLoader<C> {
    type Item = Photo;

    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<Photo>, Error> {
        let url = photo_list_url(&self.base_url, request);
        let response = self.http.get(&url).await?;

        if response.status != StatusCode::OK {
            return Err(Error::FetchFailed(format!("photo page {}: status {}", request.page, response.status.as_u16())));
        }

        decode_photos(&response.bytes)
    }
}
