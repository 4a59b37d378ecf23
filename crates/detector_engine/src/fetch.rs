//! Headless page loading: one GET per navigation, decoded into a snapshot.
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::redirect::Policy;

use detector_logging::{detector_debug, detector_warn};

use crate::{decode_html, PageSnapshot};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_redirects: usize,
    pub max_bytes: u64,
    /// Media types accepted as documents; parameters such as `charset` are ignored.
    pub page_types: Vec<String>,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_redirects: 5,
            max_bytes: 5 * 1024 * 1024,
            page_types: vec!["text/html".into(), "application/xhtml+xml".into()],
            user_agent: concat!("job-detector/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

/// Raw response for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub requested_url: String,
    /// Location after redirects; the snapshot is keyed by this.
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("{url} answered {status}")]
    Status { url: String, status: u16 },
    #[error("timed out loading {url}")]
    Timeout { url: String },
    #[error("too many redirects from {url}")]
    TooManyRedirects { url: String },
    #[error("{url} exceeds {limit} bytes")]
    TooLarge { url: String, limit: u64 },
    #[error("{url} is {content_type}, not a page")]
    NotAPage { url: String, content_type: String },
    #[error("could not load {url}: {reason}")]
    Network { url: String, reason: String },
}

/// Retrieves raw page bytes for a URL.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;

    /// Fetches `url` and decodes it into a snapshot keyed by the final URL.
    async fn load_snapshot(&self, url: &str) -> Result<PageSnapshot, FetchError> {
        let page = self.fetch(url).await?;
        let html = match decode_html(&page.body, page.content_type.as_deref()) {
            Ok(decoded) => {
                detector_debug!("decoded {url} as {}", decoded.encoding_label);
                decoded.html
            }
            Err(err) => {
                detector_warn!("{err}; reading {url} as lossy utf-8");
                String::from_utf8_lossy(&page.body).into_owned()
            }
        };
        Ok(PageSnapshot::new(page.final_url, html))
    }
}

pub struct ReqwestPageFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ReqwestPageFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(Policy::limited(settings.max_redirects))
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|err| FetchError::Network {
                url: String::new(),
                reason: err.to_string(),
            })?;
        Ok(Self { client, settings })
    }

    /// Rejects non-document responses before any body is read.
    fn check_headers(&self, url: &str, headers: &HeaderMap) -> Result<Option<String>, FetchError> {
        let Some(content_type) = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
        else {
            return Ok(None);
        };
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        if self
            .settings
            .page_types
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(essence))
        {
            Ok(Some(content_type.to_string()))
        } else {
            Err(FetchError::NotAPage {
                url: url.to_string(),
                content_type: content_type.to_string(),
            })
        }
    }
}

#[async_trait::async_trait]
impl PageFetcher for ReqwestPageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let target = reqwest::Url::parse(url).map_err(|err| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: err.to_string(),
        })?;
        let response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(|err| classify(url, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let limit = self.settings.max_bytes;
        let too_large = || FetchError::TooLarge {
            url: url.to_string(),
            limit,
        };
        if response.content_length().is_some_and(|len| len > limit) {
            return Err(too_large());
        }
        let content_type = self.check_headers(url, response.headers())?;
        let final_url = response.url().to_string();

        let mut body = Vec::new();
        let mut chunks = response.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(|err| classify(url, err))?;
            if (body.len() + chunk.len()) as u64 > limit {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }
        detector_debug!("loaded {} bytes from {final_url}", body.len());

        Ok(FetchedPage {
            requested_url: url.to_string(),
            final_url,
            content_type,
            body,
        })
    }
}

fn classify(url: &str, err: reqwest::Error) -> FetchError {
    let url = url.to_string();
    if err.is_timeout() {
        FetchError::Timeout { url }
    } else if err.is_redirect() {
        FetchError::TooManyRedirects { url }
    } else {
        FetchError::Network {
            url,
            reason: err.to_string(),
        }
    }
}
