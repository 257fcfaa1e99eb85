//! Resilient HTTP access to the assistant service
//!
//! A `Transport` performs exactly one GET attempt; the retry loop lives above
//! that seam in `ResilientClient`, so tests can script replies without a
//! network and the production path stays a thin reqwest wrapper.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use url::Url;

#[derive(Error, Debug)]
pub enum TransportError {
  #[error("Request to {url} timed out after {seconds}s")]
  Timeout { url: String, seconds: u64 },

  #[error("Request to {url} failed: {message}")]
  Request { url: String, message: String },

  #[error("Server returned HTTP {status} for {url}")]
  Status { status: u16, url: String },

  #[error("Could not decode reply from {url}: {message}")]
  Decode { url: String, message: String },
}

impl TransportError {
  pub fn request(url: impl Into<String>, message: impl Into<String>) -> Self {
    Self::Request { url: url.into(), message: message.into() }
  }

  pub fn decode(url: impl Into<String>, message: impl Into<String>) -> Self {
    Self::Decode { url: url.into(), message: message.into() }
  }
}

/// Raw outcome of a single GET attempt.
#[derive(Debug, Clone)]
pub struct Reply {
  pub status: u16,
  pub body: String,
}

impl Reply {
  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }
}

/// One GET attempt against the remote service.
#[async_trait]
pub trait Transport: Send + Sync {
  async fn get(&self, url: &Url, limit: Duration) -> Result<Reply, TransportError>;
}

/// reqwest-backed transport used outside of tests.
pub struct HttpTransport {
  client: reqwest::Client,
}

impl HttpTransport {
  pub fn new() -> Self {
    Self { client: reqwest::Client::new() }
  }
}

impl Default for HttpTransport {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl Transport for HttpTransport {
  async fn get(&self, url: &Url, limit: Duration) -> Result<Reply, TransportError> {
    let response = timeout(limit, self.client.get(url.clone()).send())
      .await
      .map_err(|_| TransportError::Timeout { url: url.to_string(), seconds: limit.as_secs() })?
      .map_err(|e| TransportError::request(url.as_str(), e.to_string()))?;

    let status = response.status().as_u16();
    let body =
      response.text().await.map_err(|e| TransportError::request(url.as_str(), e.to_string()))?;

    Ok(Reply { status, body })
  }
}

/// Retry budget for one logical request.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
  pub max_attempts: u32,
  pub timeout: Duration,
  pub backoff: Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self { max_attempts: 3, timeout: Duration::from_secs(5), backoff: Duration::from_millis(500) }
  }
}

impl RetryPolicy {
  pub fn with_timeout(self, timeout: Duration) -> Self {
    Self { timeout, ..self }
  }

  pub fn with_backoff(self, backoff: Duration) -> Self {
    Self { backoff, ..self }
  }

  /// Server-side failures are worth a retry; client-side mistakes are not.
  pub fn is_retryable(&self, status: u16) -> bool {
    (500..600).contains(&status)
  }

  /// Linear backoff: the wait grows with each failed attempt.
  pub fn backoff_delay(&self, failed_attempts: u32) -> Duration {
    self.backoff * failed_attempts
  }
}

/// Bounded-retry JSON GET over any transport.
pub struct ResilientClient<T: Transport> {
  transport: T,
}

impl ResilientClient<HttpTransport> {
  /// Client over the real network.
  pub fn http() -> Self {
    Self::new(HttpTransport::new())
  }
}

impl<T: Transport> ResilientClient<T> {
  pub fn new(transport: T) -> Self {
    Self { transport }
  }

  /// GET `url` and parse the body as JSON.
  pub async fn get_json<R>(&self, url: &Url, policy: &RetryPolicy) -> Result<R, TransportError>
  where
    R: DeserializeOwned,
  {
    let reply = self.request(url, policy).await?;
    serde_json::from_str(&reply.body).map_err(|e| TransportError::decode(url.as_str(), e.to_string()))
  }

  /// GET `url` and require an HTTP success, ignoring the body.
  pub async fn get_ok(&self, url: &Url, policy: &RetryPolicy) -> Result<(), TransportError> {
    self.request(url, policy).await.map(|_| ())
  }

  /// Issue attempts until one succeeds or the budget runs out, sleeping
  /// between attempts per the policy. Non-retryable statuses fail fast.
  async fn request(&self, url: &Url, policy: &RetryPolicy) -> Result<Reply, TransportError> {
    let mut last_error: Option<TransportError> = None;

    for attempt in 1..=policy.max_attempts {
      if attempt > 1 {
        tokio::time::sleep(policy.backoff_delay(attempt - 1)).await;
      }
      tracing::debug!(url = %url, attempt, "GET");

      match self.transport.get(url, policy.timeout).await {
        Ok(reply) if reply.is_success() => return Ok(reply),
        Ok(reply) => {
          let error = TransportError::Status { status: reply.status, url: url.to_string() };
          if !policy.is_retryable(reply.status) {
            return Err(error);
          }
          tracing::warn!(attempt, status = reply.status, "server error on GET");
          last_error = Some(error);
        }
        Err(error) => {
          tracing::warn!(attempt, %error, "GET attempt failed");
          last_error = Some(error);
        }
      }
    }

    Err(last_error.unwrap_or_else(|| TransportError::request(url.as_str(), "retry budget is zero")))
  }
}
