use clap::{Args, Subcommand};

use super::OutputFormat;
use chatseed::config::Config;

#[derive(Debug, Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");
                        println!(
                            "Default config file: {}",
                            Config::default_config_path().display()
                        );
                        println!();
                        println!(
                            "source_database_path: {}",
                            config.source_database_path.display()
                        );
                        println!(
                            "destination_database_path: {}",
                            config.destination_database_path.display()
                        );
                    }
                }
                Ok(())
            }
        }
    }
}
