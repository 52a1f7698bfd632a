use crate::error::{FetchError, Result};
use crate::result::FetchedPage;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

/// Anything that can turn a URL into page text.
///
/// Every pipeline stage talks to the remote services through this trait, so
/// stages can be driven by [`HttpFetcher`] in production and by
/// [`StaticFetcher`] in tests.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch the page at `url`. A non-success status is an error.
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(10)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("Digger/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs((timeout_secs / 2).max(1)))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;

        debug!("Fetching {}", url);
        let start = Instant::now();
        let response = self.client.get(url).send().await?;
        let response_time = start.elapsed();

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response.text().await?;
        debug!("Fetched {} ({} bytes in {:?})", url, body.len(), response_time);

        Ok(FetchedPage {
            url: url.to_string(),
            status_code: status.as_u16(),
            content_type,
            response_time,
            body,
        })
    }
}

#[derive(Debug, Clone)]
enum StaticPage {
    Body(String),
    Status(u16),
}

/// In-memory fetcher serving canned pages.
///
/// URLs that were never registered answer with a 404.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, StaticPage>,
    requests: AtomicUsize,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), StaticPage::Body(body.into()));
        self
    }

    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.pages.insert(url.into(), StaticPage::Status(status));
        self
    }

    /// Number of fetches served so far, failures included.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ContentFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        match self.pages.get(url) {
            Some(StaticPage::Body(body)) => Ok(FetchedPage::new(url.to_string(), body.clone())),
            Some(StaticPage::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
