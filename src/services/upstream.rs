use crate::models::RawPayload;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when reaching an upstream provider
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Upstream {url} returned status {status}")]
    HttpStatus { status: u16, url: String },
}

impl UpstreamError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::Network(e) if e.is_timeout())
    }
}

/// Source of raw roster and detail pages
///
/// Implementations never retry; a failure is reported as soon as it happens.
#[async_trait]
pub trait FighterSource: Send + Sync {
    /// Fetch the full roster listing
    async fn fetch_roster_page(&self) -> Result<RawPayload, UpstreamError>;

    /// Fetch the detail page for one roster entry
    async fn fetch_detail_page(&self, profile_ref: &str) -> Result<RawPayload, UpstreamError>;

    /// Public URL of the detail page for `profile_ref`
    fn detail_url(&self, profile_ref: &str) -> String;
}

/// HTTP client for the roster API and the detail site
pub struct HttpUpstream {
    roster_url: String,
    detail_base_url: String,
    client: Client,
}

impl HttpUpstream {
    /// Create a new upstream client
    ///
    /// Every request made through it is bounded by `timeout`.
    pub fn new(
        roster_url: String,
        detail_base_url: String,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            roster_url,
            detail_base_url,
            client,
        })
    }

    pub fn roster_url(&self) -> &str {
        &self.roster_url
    }

    async fn get(&self, url: &str) -> Result<RawPayload, UpstreamError> {
        tracing::debug!("Fetching {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Upstream {} returned {}", url, status);
            return Err(UpstreamError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        Ok(RawPayload {
            url: url.to_string(),
            content_type,
            body,
        })
    }
}

#[async_trait]
impl FighterSource for HttpUpstream {
    async fn fetch_roster_page(&self) -> Result<RawPayload, UpstreamError> {
        self.get(&self.roster_url).await
    }

    async fn fetch_detail_page(&self, profile_ref: &str) -> Result<RawPayload, UpstreamError> {
        let url = self.detail_url(profile_ref);
        self.get(&url).await
    }

    fn detail_url(&self, profile_ref: &str) -> String {
        let profile_ref = profile_ref.trim();
        if profile_ref.starts_with("http://") || profile_ref.starts_with("https://") {
            return profile_ref.to_string();
        }

        let path = profile_ref
            .trim_matches('/')
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        format!("{}/{}", self.detail_base_url.trim_end_matches('/'), path)
    }
}
