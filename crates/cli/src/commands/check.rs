//! check command - Validate configuration and show the resolved plan
//!
//! Never contacts the store and never prints credentials.

use clap::Args;
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};
use crate::settings::{self, ConfigArgs};

/// Validate configuration and print what a publish would do
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Debug, Serialize)]
struct CheckOutput {
    bucket: String,
    endpoint: Option<String>,
    region: String,
    max_retries: u32,
    deletes: Vec<String>,
    uploads: Vec<UploadInfo>,
}

#[derive(Debug, Serialize)]
struct UploadInfo {
    local_path: String,
    remote_key: String,
    exists: bool,
}

/// Execute the check command
pub async fn execute(args: CheckArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let config = match settings::resolve(&args.config) {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&format!("{e:#}"));
            return ExitCode::UsageError;
        }
    };

    let workspace = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            formatter.error(&format!("Failed to determine current directory: {e}"));
            return ExitCode::GeneralError;
        }
    };

    let plan = match config.plan(&workspace) {
        Ok(p) => p,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    let output = CheckOutput {
        bucket: config.bucket.clone(),
        endpoint: config.store.endpoint.clone(),
        region: config.store.region.clone(),
        max_retries: plan.policy.max_retries,
        deletes: plan.deletes.iter().map(|d| d.prefix.clone()).collect(),
        uploads: plan
            .uploads
            .iter()
            .map(|u| UploadInfo {
                local_path: u.local_path.display().to_string(),
                remote_key: u.remote_key.clone(),
                exists: u.local_path.exists(),
            })
            .collect(),
    };

    if formatter.is_json() {
        formatter.json(&output);
        return ExitCode::Success;
    }

    formatter.println(&format!(
        "{} {}",
        formatter.style_key("bucket:"),
        formatter.style_name(&output.bucket)
    ));
    formatter.println(&format!(
        "{} {}",
        formatter.style_key("endpoint:"),
        output.endpoint.as_deref().unwrap_or("<sdk default>")
    ));
    formatter.println(&format!("{} {}", formatter.style_key("region:"), output.region));
    formatter.println(&format!(
        "{} {}",
        formatter.style_key("max retries:"),
        output.max_retries
    ));
    for prefix in &output.deletes {
        formatter.println(&format!("{} {prefix}", formatter.style_key("delete:")));
    }
    for upload in &output.uploads {
        formatter.println(&format!(
            "{} {} => {}",
            formatter.style_key("upload:"),
            upload.local_path,
            upload.remote_key
        ));
        if !upload.exists {
            formatter.warning(&format!(
                "{} does not exist and will be skipped",
                upload.local_path
            ));
        }
    }
    formatter.success("Configuration is valid");

    ExitCode::Success
}
