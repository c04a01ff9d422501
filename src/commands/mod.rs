mod config_cmd;
mod handle;
mod seed;
mod status;

pub use config_cmd::ConfigCommand;
pub use handle::HandleCommand;
pub use seed::SeedCommand;
pub use status::StatusCommand;

use clap::ValueEnum;

#[derive(Debug, Clone, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
