//! Configuration resolution for commands
//!
//! Precedence: flags, then `BPUB_*` environment variables, then the config
//! file, then defaults. Path fields are variable-expanded last.

use std::path::PathBuf;

use anyhow::Context;
use bp_core::{PublishConfig, RetrySetting};
use clap::Args;

use crate::expand::expand_env;

/// Configuration flags shared by every command
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// Config file (default: <config dir>/bucket-publish/config.toml)
    #[arg(short, long, env = "BPUB_CONFIG")]
    pub config: Option<PathBuf>,

    /// S3-compatible endpoint URL
    #[arg(long, env = "BPUB_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Region (default: us-east-1)
    #[arg(long, env = "BPUB_REGION")]
    pub region: Option<String>,

    /// Access key ID
    #[arg(long, env = "BPUB_ACCESS_KEY")]
    pub access_key: Option<String>,

    /// Secret access key
    #[arg(long, env = "BPUB_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Use path-style bucket addressing
    #[arg(long, env = "BPUB_PATH_STYLE")]
    pub path_style: Option<bool>,

    /// Target bucket
    #[arg(short, long, env = "BPUB_BUCKET")]
    pub bucket: Option<String>,

    /// Comma-separated local paths, relative to the workspace (e.g. /dist)
    #[arg(long, env = "BPUB_LOCAL_PATH")]
    pub local_path: Option<String>,

    /// Comma-separated remote key prefixes (e.g. /www/${BUILD_NUMBER})
    #[arg(long, env = "BPUB_REMOTE_PATH")]
    pub remote_path: Option<String>,

    /// Comma-separated remote prefixes to delete before uploading
    #[arg(long, env = "BPUB_DELETE_REMOTE_PATH")]
    pub delete_remote_path: Option<String>,

    /// Retries per remote operation (default: 3)
    #[arg(long, env = "BPUB_MAX_RETRIES")]
    pub max_retries: Option<String>,

    /// Directory local paths are resolved against (default: current directory)
    #[arg(short, long, env = "BPUB_WORKSPACE")]
    pub workspace: Option<PathBuf>,
}

/// Load the config file, apply overrides and expand path variables
pub fn resolve(args: &ConfigArgs) -> anyhow::Result<PublishConfig> {
    let mut config = PublishConfig::load_or_default(args.config.as_deref())
        .context("Failed to load config file")?;

    apply_overrides(&mut config, args.clone());

    config.local_path = expand_env(&config.local_path);
    config.remote_path = expand_env(&config.remote_path);
    config.delete_remote_path = config.delete_remote_path.as_deref().map(expand_env);

    tracing::debug!(?config, "Resolved configuration");
    Ok(config)
}

fn apply_overrides(config: &mut PublishConfig, args: ConfigArgs) {
    if let Some(endpoint) = args.endpoint {
        config.store.endpoint = Some(endpoint);
    }
    if let Some(region) = args.region {
        config.store.region = region;
    }
    if let Some(access_key) = args.access_key {
        config.store.access_key = Some(access_key);
    }
    if let Some(secret_key) = args.secret_key {
        config.store.secret_key = Some(secret_key);
    }
    if let Some(path_style) = args.path_style {
        config.store.path_style = path_style;
    }
    if let Some(bucket) = args.bucket {
        config.bucket = bucket;
    }
    if let Some(local_path) = args.local_path {
        config.local_path = local_path;
    }
    if let Some(remote_path) = args.remote_path {
        config.remote_path = remote_path;
    }
    if let Some(delete_remote_path) = args.delete_remote_path {
        config.delete_remote_path = Some(delete_remote_path);
    }
    if let Some(max_retries) = args.max_retries {
        config.max_retries = Some(RetrySetting::Text(max_retries));
    }
    if let Some(workspace) = args.workspace {
        config.workspace = Some(workspace);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "bucket = \"from-file\"\nlocal_path = \"/dist\"\nremote_path = \"/www\"\nmax_retries = 1\n",
        )
        .unwrap();

        let args = ConfigArgs {
            config: Some(path),
            bucket: Some("from-flag".to_string()),
            max_retries: Some("7".to_string()),
            region: Some("oss-cn-shanghai".to_string()),
            ..Default::default()
        };

        let config = resolve(&args).unwrap();
        assert_eq!(config.bucket, "from-flag");
        assert_eq!(config.local_path, "/dist");
        assert_eq!(config.store.region, "oss-cn-shanghai");
        assert_eq!(config.retry_policy().unwrap().max_retries, 7);
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let args = ConfigArgs {
            config: Some(PathBuf::from("/definitely/not/here.toml")),
            ..Default::default()
        };
        assert!(resolve(&args).is_err());
    }

    #[test]
    fn test_paths_are_expanded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let expected = std::env::var("HOME")
            .map(|home| format!("/users/{home}"))
            .unwrap_or_else(|_| "/users/${HOME}".to_string());
        let args = ConfigArgs {
            config: Some(path),
            remote_path: Some("/users/${HOME}".to_string()),
            delete_remote_path: Some("/$BPUB_TEST_SURELY_UNSET_VAR".to_string()),
            ..Default::default()
        };

        let config = resolve(&args).unwrap();
        assert_eq!(config.remote_path, expected);
        assert_eq!(
            config.delete_remote_path.as_deref(),
            Some("/$BPUB_TEST_SURELY_UNSET_VAR")
        );
    }
}
