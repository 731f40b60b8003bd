//! bpub - publish build output to an S3-compatible bucket

mod commands;
mod exit_code;
mod expand;
mod output;
mod settings;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::Commands;
use crate::output::OutputConfig;

/// Default filter: warnings, plus the build log when it is routed through tracing
const DEFAULT_FILTER: &str = "warn,bp_core::build_log=info";

#[derive(Parser, Debug)]
#[command(name = "bpub", version, about = "Publish build output to an S3-compatible bucket")]
struct Cli {
    /// Output JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Enable debug logging to stderr (overridden by RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        quiet: cli.quiet,
    };

    let code = commands::execute(cli.command, output_config).await;
    std::process::exit(code.code());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_publish_flags() {
        let cli = Cli::try_parse_from([
            "bpub",
            "publish",
            "--bucket",
            "site",
            "--local-path",
            "/dist",
            "--remote-path",
            "/www",
            "--max-retries",
            "5",
            "--json",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Publish(args) => {
                assert_eq!(args.config.bucket.as_deref(), Some("site"));
                assert_eq!(args.config.max_retries.as_deref(), Some("5"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
