use anyhow::Result;
use vta_client::SessionStore;

use crate::display;

pub async fn handle() -> Result<()> {
  let store = SessionStore::new()?;

  if store.session_exists() {
    store.clear()?;
    display::success("Session discarded. The next question starts a fresh one.");
  } else {
    display::info("No session to discard.");
  }

  Ok(())
}
