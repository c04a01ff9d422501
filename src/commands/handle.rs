//! Run a seed and print the handler envelope.

use clap::Args;

use chatseed::config::Config;
use chatseed::handler::handle;

/// Run a seed and print `{"statusCode": ..., "body": ...}`
#[derive(Debug, Args)]
pub struct HandleCommand {}

impl HandleCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let response = handle(config).await;
        println!("{}", serde_json::to_string_pretty(&response)?);

        if !response.is_success() {
            std::process::exit(1);
        }

        Ok(())
    }
}
