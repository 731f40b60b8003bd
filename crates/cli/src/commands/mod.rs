//! Command implementations

pub mod check;
pub mod publish;

use clap::Subcommand;

use crate::exit_code::ExitCode;
use crate::output::OutputConfig;

/// bpub subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Delete configured remote prefixes, then upload local paths
    Publish(publish::PublishArgs),

    /// Validate configuration and print the resolved plan
    Check(check::CheckArgs),
}

/// Execute a subcommand
pub async fn execute(cmd: Commands, output_config: OutputConfig) -> ExitCode {
    match cmd {
        Commands::Publish(args) => publish::execute(args, output_config).await,
        Commands::Check(args) => check::execute(args, output_config).await,
    }
}
