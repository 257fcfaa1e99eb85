use anyhow::{anyhow, Result};
use vta_client::{Endpoints, Session};

pub mod ask;
pub mod feedback;
pub mod login;
pub mod reset;
pub mod status;

/// Longest accepted question or improvement text, matching the service's
/// input widgets.
pub const MAX_INPUT_CHARS: usize = 200;

/// Resolve the assistant endpoints: environment overrides win, then whatever
/// a login stored in the session.
pub fn resolve_endpoints(session: &Session) -> Result<Endpoints> {
  let stored = session.endpoints.as_ref();

  let answer_url =
    std::env::var("VTA_ANSWER_URL").ok().or_else(|| stored.map(|e| e.answer_url.clone()));
  let feedback_url =
    std::env::var("VTA_FEEDBACK_URL").ok().or_else(|| stored.map(|e| e.feedback_url.clone()));

  match (answer_url, feedback_url) {
    (Some(answer_url), Some(feedback_url)) => Ok(Endpoints { answer_url, feedback_url }),
    _ => Err(anyhow!(
      "No assistant endpoints configured. Run 'vta login' or set VTA_ANSWER_URL and VTA_FEEDBACK_URL."
    )),
  }
}

/// The caller-side input rules: non-empty, and within the character cap.
pub fn validate_input(kind: &str, text: &str) -> Result<()> {
  if text.trim().is_empty() {
    return Err(anyhow!("The {kind} must not be empty"));
  }
  if text.chars().count() > MAX_INPUT_CHARS {
    return Err(anyhow!("The {kind} must be at most {MAX_INPUT_CHARS} characters"));
  }
  Ok(())
}
