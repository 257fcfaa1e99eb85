//! Wire types for the assistant service
//!
//! The service speaks GET requests with query parameters and loosely shaped
//! JSON replies. Every field the client does not strictly need stays optional
//! or defaulted, so a sparse reply still parses.

use serde::Deserialize;

/// Reply from the answer endpoint. A reply without an `answer` field is the
/// server-unavailable signal, not a parse failure.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerReply {
  pub answer: Option<String>,
  #[serde(default)]
  pub error: bool,
  pub result: Option<AnswerPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerPayload {
  #[serde(default)]
  pub selected_documents: Vec<Evidence>,
}

/// One ranked passage backing an answer, pointing into a lecture video.
#[derive(Debug, Clone, Deserialize)]
pub struct Evidence {
  pub score: f64,
  pub metadata: EvidenceMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvidenceMetadata {
  pub video: String,
  pub start: f64,
}

/// Reply from the login endpoint: either an error message or the endpoint
/// pair for this course.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginReply {
  pub error: Option<String>,
  pub answer_url: Option<String>,
  pub feedback_url: Option<String>,
}

/// The user's judgement on an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
  Approved,
  Improved(String),
}

/// Feedback about one question/answer exchange.
#[derive(Debug, Clone)]
pub struct Feedback {
  pub question: String,
  pub answer: String,
  pub verdict: Verdict,
}

impl Feedback {
  pub fn approved(question: impl Into<String>, answer: impl Into<String>) -> Self {
    Self { question: question.into(), answer: answer.into(), verdict: Verdict::Approved }
  }

  pub fn improved(
    question: impl Into<String>,
    answer: impl Into<String>,
    better: impl Into<String>,
  ) -> Self {
    Self {
      question: question.into(),
      answer: answer.into(),
      verdict: Verdict::Improved(better.into()),
    }
  }

  /// Query parameters as the service expects them. `approved` carries the
  /// literal string `"True"`; the service checks for exactly that value.
  pub fn params(&self, user_id: &str) -> Vec<(String, String)> {
    let mut params = vec![
      ("question".to_string(), self.question.clone()),
      ("answer".to_string(), self.answer.clone()),
    ];

    match &self.verdict {
      Verdict::Approved => params.push(("approved".to_string(), "True".to_string())),
      Verdict::Improved(text) => params.push(("improved".to_string(), text.clone())),
    }

    params.push(("user_id".to_string(), user_id.to_string()));
    params
  }
}
