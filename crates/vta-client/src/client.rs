//! Answer and feedback gateway
//!
//! Composes the session, the rate limiter and the resilient transport into
//! the operations the front-end cares about. Transport problems never escape
//! `generate_answer` or `register_feedback` as errors; they collapse into the
//! coarse outcomes the UI renders.

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use std::time::Duration;
use url::Url;

use crate::limiter::{RateLimiter, RATE_LIMIT_MESSAGE};
use crate::protocol::{AnswerReply, Evidence, Feedback, LoginReply};
use crate::session::{Endpoints, Session};
use crate::transport::{HttpTransport, ResilientClient, RetryPolicy, Transport};

/// Shown when the service cannot produce an answer.
pub const SERVER_UNAVAILABLE_MESSAGE: &str =
  "Failed to obtain answer from server. Please retry later!";

// Answering does retrieval work server-side, so it gets an extra second.
const ANSWER_TIMEOUT: Duration = Duration::from_secs(6);
const FEEDBACK_TIMEOUT: Duration = Duration::from_secs(5);
const LOGIN_TIMEOUT: Duration = Duration::from_secs(5);

/// A delivered answer: the text, whether the service flagged it as an
/// error of its own, and the evidence backing it.
#[derive(Debug, Clone)]
pub struct Answer {
  pub text: String,
  pub error: bool,
  pub evidence: Vec<Evidence>,
}

/// Everything asking a question can come back with.
#[derive(Debug)]
pub enum AskOutcome {
  Answered(Answer),
  RateLimited { message: String },
  ServerUnavailable,
}

/// Gateway to the remote assistant endpoints.
pub struct AssistantClient<T: Transport> {
  http: ResilientClient<T>,
  limiter: RateLimiter,
  policy: RetryPolicy,
  answer_url: Url,
  feedback_url: Url,
}

impl AssistantClient<HttpTransport> {
  /// Client over the real network with the default retry policy.
  pub fn new(endpoints: &Endpoints) -> Result<Self> {
    Self::with_transport(HttpTransport::new(), endpoints)
  }
}

impl<T: Transport> AssistantClient<T> {
  pub fn with_transport(transport: T, endpoints: &Endpoints) -> Result<Self> {
    let answer_url = Url::parse(&endpoints.answer_url)
      .with_context(|| format!("Invalid answer endpoint URL: {}", endpoints.answer_url))?;
    let feedback_url = Url::parse(&endpoints.feedback_url)
      .with_context(|| format!("Invalid feedback endpoint URL: {}", endpoints.feedback_url))?;

    Ok(Self {
      http: ResilientClient::new(transport),
      limiter: RateLimiter::default(),
      policy: RetryPolicy::default(),
      answer_url,
      feedback_url,
    })
  }

  /// Override the default retry policy.
  pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
    self.policy = policy;
    self
  }

  /// Override the default rate limiter.
  pub fn with_limiter(mut self, limiter: RateLimiter) -> Self {
    self.limiter = limiter;
    self
  }

  /// Ask the service a question on behalf of this session.
  ///
  /// The rate check happens before any network traffic, so a denied question
  /// costs zero requests. The query counter moves only when an answer
  /// actually arrives; denied and failed questions leave it untouched.
  pub async fn generate_answer(&self, session: &mut Session, question: &str) -> AskOutcome {
    if !self.limiter.permits(session, Utc::now()) {
      tracing::debug!(query_count = session.query_count, "question denied by rate limiter");
      return AskOutcome::RateLimited { message: RATE_LIMIT_MESSAGE.to_string() };
    }

    let mut url = self.answer_url.clone();
    url
      .query_pairs_mut()
      .append_pair("question", question)
      .append_pair("user_id", &session.user_id);

    let policy = self.policy.with_timeout(ANSWER_TIMEOUT);
    let reply: AnswerReply = match self.http.get_json(&url, &policy).await {
      Ok(reply) => reply,
      Err(error) => {
        tracing::warn!(%error, "answer request failed");
        return AskOutcome::ServerUnavailable;
      }
    };

    let text = match reply.answer {
      Some(text) => text,
      None => {
        tracing::warn!("server reply carried no answer");
        return AskOutcome::ServerUnavailable;
      }
    };

    session.query_count += 1;
    let evidence = reply.result.map(|payload| payload.selected_documents).unwrap_or_default();
    AskOutcome::Answered(Answer { text, error: reply.error, evidence })
  }

  /// Send feedback about an answered question. Best-effort: a failure is
  /// logged and reported as `false`, never raised.
  pub async fn register_feedback(&self, session: &Session, feedback: &Feedback) -> bool {
    let mut url = self.feedback_url.clone();
    {
      let mut pairs = url.query_pairs_mut();
      for (key, value) in feedback.params(&session.user_id) {
        pairs.append_pair(&key, &value);
      }
    }

    let policy = self.policy.with_timeout(FEEDBACK_TIMEOUT);
    match self.http.get_ok(&url, &policy).await {
      Ok(()) => true,
      Err(error) => {
        tracing::warn!(%error, "feedback could not be delivered");
        false
      }
    }
  }
}

/// Exchange the course password for the endpoint pair the other operations
/// talk to.
pub async fn login<T: Transport>(
  http: &ResilientClient<T>,
  login_url: &Url,
  password: &str,
) -> Result<Endpoints> {
  let mut url = login_url.clone();
  url.query_pairs_mut().append_pair("password", password);

  let policy = RetryPolicy::default().with_timeout(LOGIN_TIMEOUT);
  let reply: LoginReply =
    http.get_json(&url, &policy).await.context("Login request failed")?;

  if let Some(message) = reply.error {
    return Err(anyhow!("Login rejected: {message}"));
  }

  match (reply.answer_url, reply.feedback_url) {
    (Some(answer_url), Some(feedback_url)) => Ok(Endpoints { answer_url, feedback_url }),
    _ => Err(anyhow!("Login reply did not carry the endpoint URLs")),
  }
}
