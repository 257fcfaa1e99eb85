use anyhow::Result;
use chrono::Utc;
use vta_client::{RateLimiter, SessionStore};

use crate::display;

pub async fn handle() -> Result<()> {
  let store = SessionStore::new()?;

  let session = match store.load()? {
    Some(session) => session,
    None => {
      display::info("No session yet. One starts the first time you ask a question.");
      return Ok(());
    }
  };

  let age_minutes = (Utc::now() - session.started_at).num_minutes();

  display::heading("Session");
  println!("User id: {}…", &session.user_id[..8]);
  println!(
    "Started: {} ({} minutes ago)",
    session.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
    age_minutes
  );
  println!("Questions answered: {}", session.query_count);
  println!(
    "Endpoints: {}",
    if session.endpoints.is_some() { "stored from login" } else { "not configured" }
  );

  if let Some(exchange) = &session.last_exchange {
    println!("Last question: {}", exchange.question);
  }

  if RateLimiter::default().permits(&session, Utc::now()) {
    display::success("A question would be accepted right now.");
  } else {
    display::warn("The rate limiter would deny a question right now.");
  }

  Ok(())
}
