use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use chatseed::config::Config;
use commands::{ConfigCommand, HandleCommand, SeedCommand, StatusCommand};

const DEFAULT_LOG_FILTER: &str = "chatseed=info";

#[derive(Parser)]
#[command(name = "chatseed")]
#[command(version)]
#[command(about = "Seed a chat database from a local snapshot", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy missing records into the destination
    Seed(SeedCommand),

    /// Show record counts of both stores
    Status(StatusCommand),

    /// Seed and print the `{statusCode, body}` envelope
    Handle(HandleCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Seed(cmd)) => {
            cmd.run(&config).await?;
        }
        Some(Commands::Status(cmd)) => {
            cmd.run(&config).await?;
        }
        Some(Commands::Handle(cmd)) => {
            cmd.run(&config).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
