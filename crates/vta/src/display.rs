//! Terminal rendering for answers, feedback results, and session state

use colored::*;
use vta_client::videos::VideoLink;

pub fn heading(text: &str) {
  println!("{}", text.bold().underline());
}

pub fn answer(text: &str) {
  println!("{text}");
}

/// The lecture links shown under an answer.
pub fn videos(links: &[VideoLink]) {
  if links.is_empty() {
    return;
  }

  println!();
  println!("{}", "Related lectures:".bold());
  for link in links {
    println!("  {} at {}s  {}", link.video_id.bold(), link.start_secs, link.url().cyan());
  }
}

/// A failure the service itself reported; rendered inline, never raised.
pub fn service_error(message: &str) {
  println!("{}", message.red());
}

pub fn success(message: &str) {
  println!("{} {message}", "✓".green());
}

pub fn warn(message: &str) {
  println!("{} {message}", "!".yellow());
}

pub fn info(message: &str) {
  println!("{message}");
}

pub fn hint(message: &str) {
  println!("{}", message.dimmed());
}
