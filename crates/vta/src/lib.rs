//! vta - Terminal client for the course's virtual teaching assistant
//!
//! Wraps the `vta-client` session component in subcommands: log in, ask a
//! question, rate the answer, inspect or discard the session.

pub mod commands;
pub mod display;
