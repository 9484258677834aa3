//! HTTP transport for the photo API and image hosts.
//!
//! The remote loaders talk to an [`HttpClient`], which only moves bytes:
//! interpreting the status code is left to the loaders. [`ReqwestClient`] is
//! the production implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use photofeed_core::{AppConfig, Error};
use reqwest::{Client, StatusCode};
use url::Url;

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// User agent string (default: "photofeed/0.1")
    pub user_agent: String,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum response body size in bytes (default: 10MB)
    pub max_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "photofeed/0.1".to_string(),
            timeout: Duration::from_millis(20_000),
            max_bytes: 10 * 1024 * 1024,
        }
    }
}

impl From<&AppConfig> for HttpConfig {
    fn from(config: &AppConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), timeout: config.timeout(), max_bytes: config.max_image_bytes }
    }
}

/// Response from a GET request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response body bytes
    pub bytes: Bytes,
}

impl HttpResponse {
    pub fn new(status: StatusCode, bytes: impl Into<Bytes>) -> Self {
        Self { status, bytes: bytes.into() }
    }
}

/// Byte transport. Fails only on transport errors; any status is a response.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &Url) -> Result<HttpResponse, Error>;
}

#[async_trait]
impl<T: HttpClient + ?Sized> HttpClient for std::sync::Arc<T> {
    async fn get(&self, url: &Url) -> Result<HttpResponse, Error> {
        (**self).get(url).await
    }
}

/// reqwest-backed [`HttpClient`].
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    http: Client,
    config: HttpConfig,
}

impl ReqwestClient {
    /// Create a new client with the given configuration.
    pub fn new(config: HttpConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::FetchFailed(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &Url) -> Result<HttpResponse, Error> {
        let start = Instant::now();

        let response = self.http.get(url.as_str()).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::FetchFailed(format!("timed out: {url}"))
            } else {
                Error::FetchFailed(format!("network error: {e}"))
            }
        })?;

        let status = response.status();

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::FetchFailed(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::FetchFailed(format!("failed to read response: {e}")))?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::FetchFailed(format!("{} bytes exceeds {}", bytes.len(), self.config.max_bytes)));
        }

        tracing::debug!(
            "fetched {} -> {} in {}ms ({} bytes)",
            url,
            status.as_u16(),
            start.elapsed().as_millis(),
            bytes.len()
        );

        Ok(HttpResponse { status, bytes })
    }
}
