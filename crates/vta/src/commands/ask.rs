use anyhow::Result;
use vta_client::videos::related_videos;
use vta_client::{AskOutcome, AssistantClient, SessionStore, SERVER_UNAVAILABLE_MESSAGE};

use crate::commands::{resolve_endpoints, validate_input};
use crate::display;

pub async fn handle(question: String) -> Result<()> {
  validate_input("question", &question)?;

  let store = SessionStore::new()?;
  let mut session = store.load_or_create()?;
  let endpoints = resolve_endpoints(&session)?;

  let client = AssistantClient::new(&endpoints)?;
  let outcome = client.generate_answer(&mut session, &question).await;
  tracing::debug!(outcome = ?outcome, "ask completed");

  match outcome {
    AskOutcome::Answered(answer) => {
      if answer.error {
        // The service answered with a complaint of its own; show it as-is
        display::service_error(&answer.text);
      } else {
        display::answer(&answer.text);
        display::videos(&related_videos(&answer.evidence));
        session.record_exchange(&question, &answer.text);
        display::hint("Rate the answer with 'vta approve' or 'vta improve <text>'.");
      }
    }
    AskOutcome::RateLimited { message } => display::service_error(&message),
    AskOutcome::ServerUnavailable => display::service_error(SERVER_UNAVAILABLE_MESSAGE),
  }

  // The query counter may have moved even when nothing else did
  store.save(&session)?;
  Ok(())
}
