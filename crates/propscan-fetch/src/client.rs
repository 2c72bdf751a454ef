//! Rate-limited, retrying HTTP fetch shared by every upstream client.
//!
//! A [`FetchClient`] owns one `reqwest::Client` and one [`RateLimiter`]; a
//! whole dispatch batch shares a single instance so the aggregate request
//! rate across all concurrent targets honours the configured interval.
//! Retries are an explicit bounded loop — every attempt, including each
//! retry, re-enters the rate-limit queue rather than bypassing it.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio::time::Instant;

use crate::error::FetchError;
use crate::rate_limit::RateLimiter;

/// Settings for constructing a [`FetchClient`].
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Minimum interval between any two requests issued through the client.
    pub min_interval: Duration,
    /// Wall-clock bound on each individual attempt.
    pub timeout: Duration,
    /// Additional attempts after the first failure. Total attempts per
    /// logical fetch is `max_retries + 1`.
    pub max_retries: u32,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(500),
            timeout: Duration::from_secs(10),
            max_retries: 3,
            user_agent: "propscan/0.1 (property-analysis)".to_owned(),
        }
    }
}

/// Shared HTTP fetch client: one connection pool, one rate limiter.
pub struct FetchClient {
    client: Client,
    limiter: RateLimiter,
    max_retries: u32,
}

impl FetchClient {
    /// Creates a client with the configured timeout, user agent, rate-limit
    /// interval, and retry budget.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self {
            client,
            limiter: RateLimiter::new(config.min_interval),
            max_retries: config.max_retries,
        })
    }

    /// Rate-limited GET returning the response body deserialized as `T`.
    ///
    /// An attempt fails on transport error (including timeout), a non-2xx
    /// status, or a body that does not deserialize into `T`; all of these are
    /// retried up to the configured budget. The terminal failure preserves
    /// the last cause.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Http`] — network failure after all retries.
    /// - [`FetchError::UnexpectedStatus`] — non-2xx status after all retries.
    /// - [`FetchError::Deserialize`] — unparseable body after all retries.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        self.retry_loop(url, |client, url| async move {
            let response = client.get(url.clone()).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }
            let body = response.text().await?;
            let parsed = serde_json::from_str::<T>(&body).map_err(|e| FetchError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;
            Ok((parsed, status))
        })
        .await
    }

    /// Rate-limited GET returning the JSON body together with the HTTP
    /// status, without treating any status as an error.
    ///
    /// Some upstreams (the TfL journey planner) use non-2xx statuses as
    /// in-band signals with meaningful JSON bodies; callers inspect the
    /// status themselves. Attempts still fail — and retry — on transport
    /// errors and unparseable bodies.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Http`] — network failure after all retries.
    /// - [`FetchError::Deserialize`] — unparseable body after all retries.
    pub async fn get_json_with_status(
        &self,
        url: &Url,
    ) -> Result<(serde_json::Value, StatusCode), FetchError> {
        self.retry_loop(url, |client, url| async move {
            let response = client.get(url.clone()).send().await?;
            let status = response.status();
            let body = response.text().await?;
            let parsed = serde_json::from_str::<serde_json::Value>(&body).map_err(|e| {
                FetchError::Deserialize {
                    context: url.to_string(),
                    source: e,
                }
            })?;
            Ok(((parsed, status), status))
        })
        .await
    }

    /// Drives `attempt_fn` through the rate limiter with a bounded attempt
    /// counter, and logs the terminal outcome with elapsed time and status.
    async fn retry_loop<T, F, Fut>(&self, url: &Url, attempt_fn: F) -> Result<T, FetchError>
    where
        F: Fn(Client, Url) -> Fut,
        Fut: Future<Output = Result<(T, StatusCode), FetchError>>,
    {
        let started = Instant::now();
        let mut attempt = 0u32;
        loop {
            self.limiter.acquire().await;
            match attempt_fn(self.client.clone(), url.clone()).await {
                Ok((value, status)) => {
                    tracing::debug!(
                        url = %url,
                        status = status.as_u16(),
                        attempts = attempt + 1,
                        elapsed = ?started.elapsed(),
                        "fetch succeeded"
                    );
                    return Ok(value);
                }
                Err(err) if err.is_retriable() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::debug!(
                        url = %url,
                        attempt,
                        max_retries = self.max_retries,
                        error = %err,
                        "fetch attempt failed — retrying"
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        url = %url,
                        attempts = attempt + 1,
                        elapsed = ?started.elapsed(),
                        error = %err,
                        "fetch failed"
                    );
                    return Err(err);
                }
            }
        }
    }
}
