use chrono::{DateTime, Utc};

use crate::session::Session;

/// Denial text shown when the limiter refuses a question.
pub const RATE_LIMIT_MESSAGE: &str = "Error - reached query rate limits.";

/// Moving-average throttle over a whole session: the mean spacing between
/// answered questions must stay at or above a floor.
#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
  pub min_mean_interval_s: f64,
}

impl Default for RateLimiter {
  fn default() -> Self {
    Self { min_mean_interval_s: 10.0 }
  }
}

impl RateLimiter {
  /// Whether the session may ask another question at `now`.
  ///
  /// The first question is always permitted; the zero check also keeps the
  /// division safe. A long-lived session earns credit, so a burst after a
  /// quiet stretch goes through.
  pub fn permits(&self, session: &Session, now: DateTime<Utc>) -> bool {
    if session.query_count == 0 {
      return true;
    }

    let mean_interval = session.elapsed_secs(now) / session.query_count as f64;
    mean_interval >= self.min_mean_interval_s
  }
}
