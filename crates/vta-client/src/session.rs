use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Length of the per-session user identifier.
pub const USER_ID_LEN: usize = 48;

const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Random identifier in the alphabet the service expects: ASCII letters only,
/// upper and lower case.
pub fn generate_user_id() -> String {
  let mut rng = rand::thread_rng();
  (0..USER_ID_LEN).map(|_| LETTERS[rng.gen_range(0..LETTERS.len())] as char).collect()
}

/// Endpoint URLs the service hands out after a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
  pub answer_url: String,
  pub feedback_url: String,
}

/// The most recent question/answer pair, kept so feedback commands can refer
/// back to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
  pub question: String,
  pub answer: String,
  pub asked_at: DateTime<Utc>,
}

/// One user's session with the assistant: identity, rate-limiter inputs, and
/// the context later commands need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
  pub user_id: String,
  pub started_at: DateTime<Utc>,
  pub query_count: u64,
  pub endpoints: Option<Endpoints>,
  pub last_exchange: Option<Exchange>,
}

impl Session {
  pub fn new() -> Self {
    Self {
      user_id: generate_user_id(),
      started_at: Utc::now(),
      query_count: 0,
      endpoints: None,
      last_exchange: None,
    }
  }

  /// Seconds since the session started, as seen at `now`.
  pub fn elapsed_secs(&self, now: DateTime<Utc>) -> f64 {
    (now - self.started_at).num_milliseconds() as f64 / 1000.0
  }

  pub fn record_exchange(&mut self, question: &str, answer: &str) {
    self.last_exchange = Some(Exchange {
      question: question.to_string(),
      answer: answer.to_string(),
      asked_at: Utc::now(),
    });
  }
}

impl Default for Session {
  fn default() -> Self {
    Self::new()
  }
}

/// Manages session persistence and lifecycle
pub struct SessionStore {
  session_dir: PathBuf,
}

impl SessionStore {
  /// Store rooted at `VTA_DIR` when set, `~/.vta` otherwise.
  pub fn new() -> Result<Self> {
    let session_dir = match std::env::var("VTA_DIR") {
      Ok(dir) => PathBuf::from(dir),
      Err(_) => dirs::home_dir().context("Could not determine home directory")?.join(".vta"),
    };
    Self::at(session_dir)
  }

  /// Store rooted at an explicit directory.
  pub fn at(session_dir: impl Into<PathBuf>) -> Result<Self> {
    let session_dir = session_dir.into();
    std::fs::create_dir_all(&session_dir)
      .with_context(|| format!("Failed to create session directory {}", session_dir.display()))?;
    Ok(Self { session_dir })
  }

  fn session_file(&self) -> PathBuf {
    self.session_dir.join("session.json")
  }

  pub fn session_exists(&self) -> bool {
    self.session_file().exists()
  }

  pub fn save(&self, session: &Session) -> Result<()> {
    let json = serde_json::to_string_pretty(session)?;
    std::fs::write(self.session_file(), json)?;
    Ok(())
  }

  pub fn load(&self) -> Result<Option<Session>> {
    let session_file = self.session_file();
    if !session_file.exists() {
      return Ok(None);
    }

    let json = std::fs::read_to_string(&session_file)?;
    let session: Session = serde_json::from_str(&json)
      .with_context(|| format!("Corrupt session file at {}", session_file.display()))?;
    Ok(Some(session))
  }

  /// Load the stored session, or create and persist a fresh one on first use.
  pub fn load_or_create(&self) -> Result<Session> {
    if let Some(session) = self.load()? {
      return Ok(session);
    }

    let session = Session::new();
    self.save(&session)?;
    Ok(session)
  }

  pub fn clear(&self) -> Result<()> {
    let session_file = self.session_file();
    if session_file.exists() {
      std::fs::remove_file(session_file)?;
    }
    Ok(())
  }
}
