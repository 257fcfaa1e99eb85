use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

mod commands;
mod display;

#[derive(Parser)]
#[command(name = "vta")]
#[command(about = "Ask the course's virtual teaching assistant about lecture material")]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Log in with the course password and store the assistant endpoints
  Login {
    /// Login endpoint URL (or use VTA_LOGIN_URL env var)
    #[arg(long, env = "VTA_LOGIN_URL")]
    url: Option<String>,
    /// Course password (or use VTA_PASSWORD env var; prompted when absent)
    #[arg(long, env = "VTA_PASSWORD")]
    password: Option<String>,
  },
  /// Ask the assistant a question about the course material
  Ask {
    /// The question, at most 200 characters
    question: String,
  },
  /// Mark the last answer as good
  Approve,
  /// Send a better answer for the last question
  Improve {
    /// The improved answer, at most 200 characters
    text: String,
  },
  /// Show the session identity, age, and rate-limit standing
  Status,
  /// Discard the current session
  Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
  // Diagnostics go to stderr so command output stays clean
  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vta=info,vta_client=info,warn"));
  tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

  let cli = Cli::parse();

  match cli.command {
    Commands::Login { url, password } => commands::login::handle(url, password).await,
    Commands::Ask { question } => commands::ask::handle(question).await,
    Commands::Approve => commands::feedback::handle_approve().await,
    Commands::Improve { text } => commands::feedback::handle_improve(text).await,
    Commands::Status => commands::status::handle().await,
    Commands::Reset => commands::reset::handle().await,
  }
}
