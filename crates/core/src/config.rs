//! Publish configuration
//!
//! Loaded from a TOML file and then overridden by the binary from flags and
//! environment variables. Validation mirrors the checks the build-step form
//! performs before a run is allowed to start.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use crate::target::{SyncPlan, split_list};

const CONFIG_DIR_NAME: &str = "bucket-publish";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Connection settings for the storage endpoint
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Endpoint URL; the SDK default endpoint is used when unset
    pub endpoint: Option<String>,
    pub region: String,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    /// Address buckets as `endpoint/bucket` instead of `bucket.endpoint`
    pub path_style: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            region: "us-east-1".to_string(),
            access_key: None,
            secret_key: None,
            path_style: true,
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("path_style", &self.path_style)
            .finish()
    }
}

/// Retry count as written in the config file: `3` or `"3"`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RetrySetting {
    Count(u32),
    Text(String),
}

impl RetrySetting {
    pub fn policy(&self) -> Result<RetryPolicy> {
        match self {
            RetrySetting::Count(n) => Ok(RetryPolicy::new(*n)),
            RetrySetting::Text(s) => RetryPolicy::parse(s),
        }
    }
}

/// Full configuration of one publish step
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PublishConfig {
    pub bucket: String,
    /// Comma-separated local paths, each starting with `/`, relative to the workspace
    pub local_path: String,
    /// Comma-separated remote key prefixes, each starting with `/`
    pub remote_path: String,
    /// Comma-separated remote prefixes to purge before uploading
    pub delete_remote_path: Option<String>,
    pub max_retries: Option<RetrySetting>,
    /// Directory local paths are resolved against; the current directory when unset
    pub workspace: Option<PathBuf>,
    pub store: StoreConfig,
}

impl PublishConfig {
    /// Default config file location, e.g. `~/.config/bucket-publish/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse a config from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&text)
    }

    /// Load `path` if given, otherwise the default file when it exists
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => match Self::default_path() {
                Some(p) if p.is_file() => Self::load(&p),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Retry policy, defaulting when unset
    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        self.max_retries
            .as_ref()
            .map_or_else(|| Ok(RetryPolicy::default()), RetrySetting::policy)
    }

    /// Check every field the run depends on
    pub fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.store.endpoint {
            url::Url::parse(endpoint)
                .map_err(|e| Error::Config(format!("invalid endpoint '{endpoint}': {e}")))?;
        }

        if self.bucket.trim().is_empty() {
            return Err(Error::Config("bucket name is required".to_string()));
        }

        check_slash_list("local_path", &self.local_path, true)?;
        check_slash_list("remote_path", &self.remote_path, true)?;
        if let Some(delete) = &self.delete_remote_path {
            check_slash_list("delete_remote_path", delete, false)?;
        }

        self.retry_policy()?;
        Ok(())
    }

    /// Validate and turn the configured paths into a plan
    pub fn plan(&self, default_workspace: &Path) -> Result<SyncPlan> {
        self.validate()?;
        let workspace = self.workspace.as_deref().unwrap_or(default_workspace);
        SyncPlan::build(
            workspace,
            &self.local_path,
            &self.remote_path,
            self.delete_remote_path.as_deref(),
            self.retry_policy()?,
        )
    }
}

fn check_slash_list(field: &str, value: &str, required: bool) -> Result<()> {
    let entries = split_list(value);
    if required && entries.is_empty() {
        return Err(Error::Config(format!("{field} is required")));
    }
    if let Some(bad) = entries.iter().find(|e| !e.starts_with('/')) {
        return Err(Error::InvalidPath(format!(
            "{field} entries must begin with '/', got '{bad}'"
        )));
    }
    Ok(())
}
