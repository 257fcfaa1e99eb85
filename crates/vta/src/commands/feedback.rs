use anyhow::{anyhow, Result};
use vta_client::{AssistantClient, Feedback, Session, SessionStore};

use crate::commands::{resolve_endpoints, validate_input};
use crate::display;

pub async fn handle_approve() -> Result<()> {
  let (session, question, answer) = last_exchange()?;
  deliver(&session, &Feedback::approved(question, answer)).await
}

pub async fn handle_improve(text: String) -> Result<()> {
  validate_input("improved answer", &text)?;

  let (session, question, answer) = last_exchange()?;
  deliver(&session, &Feedback::improved(question, answer, text)).await
}

/// Feedback always refers to the most recent answered question.
fn last_exchange() -> Result<(Session, String, String)> {
  let store = SessionStore::new()?;
  let session = store
    .load()?
    .ok_or_else(|| anyhow!("No session yet. Ask a question first with 'vta ask'."))?;

  let exchange = session
    .last_exchange
    .clone()
    .ok_or_else(|| anyhow!("Nothing to rate yet. Ask a question first with 'vta ask'."))?;

  Ok((session, exchange.question, exchange.answer))
}

async fn deliver(session: &Session, feedback: &Feedback) -> Result<()> {
  let endpoints = resolve_endpoints(session)?;
  let client = AssistantClient::new(&endpoints)?;

  if client.register_feedback(session, feedback).await {
    display::success("Thanks! Your feedback was recorded.");
  } else {
    display::warn("Could not deliver feedback right now.");
  }

  Ok(())
}
