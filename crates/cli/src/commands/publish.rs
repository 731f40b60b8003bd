//! publish command - Synchronize the build output to the bucket
//!
//! Prunes the configured remote prefixes, then uploads every local target.

use bp_core::{Error, SyncReport};
use bp_s3::S3Client;
use clap::Args;
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{BuildLog, Formatter, OutputConfig};
use crate::settings::{self, ConfigArgs};

const PARTIAL_PUBLISH_WARNING: &str =
    "The bucket may be partially updated; nothing was rolled back. Re-run to finish publishing.";

/// Publish local files to the bucket
#[derive(Args, Debug)]
pub struct PublishArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Debug, Serialize)]
struct PublishOutput {
    bucket: String,
    uploaded: usize,
    deleted: usize,
    skipped: usize,
    bytes_uploaded: u64,
    bytes_uploaded_human: String,
}

impl PublishOutput {
    fn new(bucket: &str, report: &SyncReport) -> Self {
        Self {
            bucket: bucket.to_string(),
            uploaded: report.uploaded,
            deleted: report.deleted,
            skipped: report.skipped,
            bytes_uploaded: report.bytes_uploaded,
            bytes_uploaded_human: humansize::format_size(report.bytes_uploaded, humansize::BINARY),
        }
    }
}

/// Execute the publish command
pub async fn execute(args: PublishArgs, output_config: OutputConfig) -> ExitCode {
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

    let client = match S3Client::new(&config.store).await {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&format!("Failed to create client: {e}"));
            return ExitCode::NetworkError;
        }
    };

    let log = BuildLog::new(&formatter);

    let result = tokio::select! {
        result = bp_core::run(&client, &log, &config.bucket, &plan) => result,
        Ok(()) = tokio::signal::ctrl_c() => Err(Error::Interrupted),
    };

    match result {
        Ok(report) => {
            let output = PublishOutput::new(&config.bucket, &report);
            if formatter.is_json() {
                formatter.json(&output);
            } else {
                formatter.success(&format!(
                    "Publish complete: {} uploaded ({}), {} deleted, {} skipped",
                    output.uploaded, output.bytes_uploaded_human, output.deleted, output.skipped
                ));
            }
            ExitCode::Success
        }
        Err(e) => {
            tracing::debug!(error = %e, bucket = %config.bucket, "Publish failed");
            formatter.error(&format!("Publish failed: {e}"));
            if let Some(warning) = partial_publish_warning(&e) {
                formatter.warning(warning);
            }
            ExitCode::from_error(&e)
        }
    }
}

/// Warning for errors that can leave the bucket half published
fn partial_publish_warning(error: &Error) -> Option<&'static str> {
    error.is_fatal_run_error().then_some(PARTIAL_PUBLISH_WARNING)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_output_serialization() {
        let report = SyncReport {
            deleted: 2,
            uploaded: 10,
            skipped: 1,
            bytes_uploaded: 2048,
        };
        let output = PublishOutput::new("site", &report);
        insta::assert_json_snapshot!(output, @r#"
        {
          "bucket": "site",
          "uploaded": 10,
          "deleted": 2,
          "skipped": 1,
          "bytes_uploaded": 2048,
          "bytes_uploaded_human": "2 KiB"
        }
        "#);
    }

    #[test]
    fn test_partial_publish_warning() {
        let exhausted = Error::RetriesExhausted {
            operation: "upload",
            key: "www/app.js".to_string(),
            attempts: 4,
        };
        assert!(partial_publish_warning(&exhausted).is_some());
        assert!(partial_publish_warning(&Error::Interrupted).is_some());
        assert!(partial_publish_warning(&Error::Config("no bucket".to_string())).is_none());
    }
}
