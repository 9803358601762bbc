//! HTTP client for catalog page fetches
//!
//! Browser-like session toward the catalog: one user agent per client, a cookie
//! store, a minimum gap between requests and jittered retries.

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, direct::NotKeyed},
};
use reqwest::{
    Client,
    header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderValue, USER_AGENT},
};
use url::Url;

use super::config::SearchConfig;
use crate::domain::{FetchError, PageFetcher, SearchRequest};

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const CACHE_CONTROL_VARIANTS: [&str; 2] = ["no-cache", "max-age=0"];

/// Catalog HTTP client implementing [`PageFetcher`]
pub struct HttpClient {
    client: Client,
    rate_limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    user_agent: String,
    retry_attempts: u32,
    backoff_ms: (u64, u64),
    min_response_bytes: usize,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let user_agents: Vec<&String> = config
            .user_agents
            .iter()
            .filter(|ua| !ua.trim().is_empty())
            .collect();
        let user_agent = fastrand::choice(user_agents)
            .context("At least one user agent is required")?
            .clone();

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&user_agent).context("Invalid user agent")?);
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language).context("Invalid Accept-Language")?,
        );

        let client = Client::builder()
            .timeout(config.request_timeout())
            .default_headers(headers)
            .cookie_store(true)
            .gzip(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("Failed to create HTTP client")?;

        // A zero gap disables client-side pacing
        let rate_limiter = Quota::with_period(config.min_request_gap())
            .map(|quota| RateLimiter::direct(quota.allow_burst(NonZeroU32::MIN)));

        tracing::debug!("HTTP client ready (user agent: {})", user_agent);

        Ok(Self {
            client,
            rate_limiter,
            user_agent,
            retry_attempts: config.retry_attempts.max(1),
            backoff_ms: (config.retry_backoff_min_ms, config.retry_backoff_max_ms),
            min_response_bytes: config.min_response_bytes,
        })
    }

    /// Fetch a URL and return its body, retrying transient failures
    pub async fn get_text(&self, url: &Url) -> Result<String, FetchError> {
        let mut last_error = None;

        for attempt in 0..self.retry_attempts {
            if attempt > 0 {
                let backoff = self.retry_backoff();
                tracing::debug!("Retrying {} in {:?} (attempt {})", url, backoff, attempt + 1);
                tokio::time::sleep(backoff).await;
            }

            match self.attempt(url).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() => {
                    tracing::warn!("Fetch attempt {} failed: {}", attempt + 1, e);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| FetchError::Transport {
            url: url.to_string(),
            message: "no attempt was made".to_string(),
        }))
    }

    async fn attempt(&self, url: &Url) -> Result<String, FetchError> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        tracing::info!("Fetching URL: {}", url);

        let cache_control = CACHE_CONTROL_VARIANTS[fastrand::usize(..CACHE_CONTROL_VARIANTS.len())];
        let response = self
            .client
            .get(url.clone())
            .header(CACHE_CONTROL, cache_control)
            .send()
            .await
            .map_err(|e| transport_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await.map_err(|e| transport_error(url, &e))?;
        if text.len() < self.min_response_bytes {
            return Err(FetchError::ResponseTooShort {
                url: url.to_string(),
                length: text.len(),
            });
        }

        tracing::debug!("Successfully fetched: {} ({} chars)", url, text.len());
        Ok(text)
    }

    fn retry_backoff(&self) -> Duration {
        let (min, max) = self.backoff_ms;
        Duration::from_millis(fastrand::u64(min..=max.max(min)))
    }

    /// User agent this client presents for its whole lifetime
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, request: &SearchRequest) -> Result<String, FetchError> {
        self.get_text(&request.to_url()).await
    }
}

fn transport_error(url: &Url, error: &reqwest::Error) -> FetchError {
    FetchError::Transport {
        url: url.to_string(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_http_client_creation() {
        let client = HttpClient::new(&SearchConfig::default()).unwrap();
        assert!(crate::infrastructure::config::defaults::USER_AGENTS.contains(&client.user_agent()));
        assert!(client.rate_limiter.is_some());
    }

    #[tokio::test]
    async fn test_zero_gap_disables_rate_limiting() {
        let config = SearchConfig {
            min_request_gap_ms: 0,
            ..SearchConfig::default()
        };
        let client = HttpClient::new(&config).unwrap();
        assert!(client.rate_limiter.is_none());
    }

    #[test]
    fn test_requires_a_user_agent() {
        let config = SearchConfig {
            user_agents: vec![String::new()],
            ..SearchConfig::default()
        };
        assert!(HttpClient::new(&config).is_err());
    }

    #[test]
    fn test_retry_backoff_within_window() {
        let client = HttpClient::new(&SearchConfig::default()).unwrap();
        for _ in 0..20 {
            let backoff = client.retry_backoff();
            assert!(backoff >= Duration::from_millis(1200) && backoff <= Duration::from_millis(2200));
        }
    }
}
