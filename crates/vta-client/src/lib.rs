//! Client-side core of the virtual teaching assistant: session identity,
//! query throttling, resilient HTTP access, and the answer/feedback gateway.

pub mod client;
pub mod limiter;
pub mod protocol;
pub mod session;
pub mod transport;
pub mod videos;

// Re-export commonly used types for easier testing
pub use client::{login, Answer, AskOutcome, AssistantClient, SERVER_UNAVAILABLE_MESSAGE};
pub use limiter::{RateLimiter, RATE_LIMIT_MESSAGE};
pub use protocol::{Feedback, Verdict};
pub use session::{Endpoints, Session, SessionStore};
pub use transport::{HttpTransport, Reply, ResilientClient, RetryPolicy, Transport, TransportError};
