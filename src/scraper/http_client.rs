use crate::config::ClientConfig;
use crate::error::{Result, SaferError};
use once_cell::sync::Lazy;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderValue, UPGRADE_INSECURE_REQUESTS,
};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Browser-like headers SAFER expects on every request. Built once, on first use;
/// read-only afterwards.
static REQUEST_HEADERS: Lazy<HeaderMap> = Lazy::new(|| {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers
});

#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(REQUEST_HEADERS.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()?;

        Ok(Self { inner })
    }

    /// POST with an empty body (SAFER takes everything in the query string) and
    /// return the page text. Any non-2xx status is an error; nothing is retried.
    pub async fn post_text(&self, url: Url) -> Result<String> {
        debug!("POST {}", url);

        let resp = self.inner.post(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!("SAFER answered {}", status);
            return Err(SaferError::Status { status });
        }

        Ok(resp.text().await?)
    }
}
