//! Remote image loading.

use async_trait::async_trait;
use bytes::Bytes;
use photofeed_core::{Error, ImageLoader};
use reqwest::StatusCode;

use crate::endpoint::parse_image_url;
use crate::http::HttpClient;

/// [`ImageLoader`] that downloads the image named by the key.
///
/// The key must be an absolute http(s) URL. Only a 200 with a non-empty body
/// counts as an image.
#[derive(Debug, Clone)]
pub struct RemoteImageLoader<C> {
    http: C,
}

impl<C: HttpClient> RemoteImageLoader<C> {
    pub fn new(http: C) -> Self {
        Self { http }
    }
}

#[async_trait]
impl<C: HttpClient> ImageLoader for RemoteImageLoader<C> {
    async fn load(&self, key: &str) -> Result<Bytes, Error> {
        let url = parse_image_url(key).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        let response = self.http.get(&url).await?;

        if response.status != StatusCode::OK {
            return Err(Error::FetchFailed(format!("{key}: status {}", response.status.as_u16())));
        }
        if response.bytes.is_empty() {
            return Err(Error::FetchFailed(format!("{key}: empty body")));
        }

        Ok(response.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use url::Url;

    struct StubHttp(Result<HttpResponse, &'static str>);

    #[async_trait]
    impl HttpClient for StubHttp {
        async fn get(&self, _url: &Url) -> Result<HttpResponse, Error> {
            self.0.clone().map_err(|msg| Error::FetchFailed(msg.to_string()))
        }
    }

    fn loader(response: Result<HttpResponse, &'static str>) -> RemoteImageLoader<StubHttp> {
        RemoteImageLoader::new(StubHttp(response))
    }

    #[tokio::test]
    async fn test_load_returns_body() {
        let loader = loader(Ok(HttpResponse::new(StatusCode::OK, &b"jpeg"[..])));
        let data = loader.load("https://picsum.photos/id/1/200/300").await.unwrap();
        assert_eq!(data, Bytes::from_static(b"jpeg"));
    }

    #[tokio::test]
    async fn test_non_200_is_fetch_failed() {
        let loader = loader(Ok(HttpResponse::new(StatusCode::NOT_FOUND, &b"missing"[..])));
        let result = loader.load("https://picsum.photos/id/1/200/300").await;
        assert!(matches!(result, Err(Error::FetchFailed(_))));
    }

    #[tokio::test]
    async fn test_empty_body_is_fetch_failed() {
        let loader = loader(Ok(HttpResponse::new(StatusCode::OK, Bytes::new())));
        let result = loader.load("https://picsum.photos/id/1/200/300").await;
        assert!(matches!(result, Err(Error::FetchFailed(_))));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let loader = loader(Err("connection reset"));
        let result = loader.load("https://picsum.photos/id/1/200/300").await;
        assert!(matches!(result, Err(Error::FetchFailed(msg)) if msg == "connection reset"));
    }

    #[tokio::test]
    async fn test_invalid_key_is_invalid_url() {
        let loader = loader(Ok(HttpResponse::new(StatusCode::OK, &b"jpeg"[..])));
        let result = loader.load("not a url").await;
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
