//! Convo CLI — the main entry point.
//!
//! Commands:
//! - `onboard` — Write a starter config file
//! - `chat`    — Interactive chat or single-message mode
//! - `status`  — Show the effective configuration
//! - `doctor`  — Diagnose config and provider health

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "convo",
    about = "Convo — chat with tool-calling AI models",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter configuration file
    Onboard,

    /// Chat with the AI assistant
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Show the effective configuration
    Status,

    /// Diagnose configuration and provider health
    Doctor,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_filter(cli.verbose))),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Chat { message } => commands::chat::run(message).await?,
        Commands::Status => commands::status::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}

/// Convo crates log at `info` (`debug` with --verbose); everything else
/// stays at `warn` so dependency noise never reaches the prompt.
fn log_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    let mut filter = String::from("warn");
    for krate in [
        "convo",
        "convo_core",
        "convo_config",
        "convo_providers",
        "convo_tools",
        "convo_agent",
    ] {
        filter.push_str(&format!(",{krate}={level}"));
    }
    filter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_defaults_to_info_for_convo_crates() {
        let filter = log_filter(false);
        assert!(filter.starts_with("warn,"));
        assert!(filter.contains("convo_agent=info"));
        assert!(!filter.contains("debug"));
    }

    #[test]
    fn verbose_switches_to_debug() {
        let filter = log_filter(true);
        assert!(filter.contains("convo_core=debug"));
    }
}
