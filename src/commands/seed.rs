//! Seed the destination database from the source snapshot.

use clap::Args;

use super::OutputFormat;
use chatseed::config::Config;
use chatseed::seeder::{seed_from_config, SeedReport};

/// Copy missing records from the source snapshot into the destination
#[derive(Debug, Args)]
pub struct SeedCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "json")]
    pub format: OutputFormat,
}

impl SeedCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let report = seed_from_config(config).await?;

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Text => print_report(&report),
        }

        Ok(())
    }
}

fn print_report(report: &SeedReport) {
    println!(
        "{:<16} {:>8} {:>8} {:>10} {:>8}",
        "KIND", "LOCAL", "PREV", "ADDITIONS", "FINAL"
    );
    println!("{}", "-".repeat(54));

    for (kind, r) in report.entries() {
        println!(
            "{:<16} {:>8} {:>8} {:>10} {:>8}",
            kind.to_string(),
            r.local,
            r.prev,
            r.additions,
            r.final_count
        );
    }

    println!();
    println!("Added {} record(s).", report.total_additions());
}
