//! Upload and delete targets for one run
//!
//! Targets arrive as comma-separated strings from the configuration surface
//! and are turned into a [`SyncPlan`] before the engine starts.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;

/// A local file or directory mirrored under a remote key prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTarget {
    pub local_path: PathBuf,
    pub remote_key: String,
}

/// A remote key prefix whose objects are removed before uploading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTarget {
    pub prefix: String,
}

impl DeleteTarget {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

/// Everything one run does, in execution order: all deletes, then all uploads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub deletes: Vec<DeleteTarget>,
    pub uploads: Vec<SyncTarget>,
    pub policy: RetryPolicy,
}

impl SyncPlan {
    /// Build a plan from the raw (already expanded) path lists
    ///
    /// Local paths are interpreted relative to `workspace`, with one leading
    /// `/` ignored. A single local path is uploaded to every remote path;
    /// otherwise locals and remotes are paired by position and must have the
    /// same length.
    pub fn build(
        workspace: &Path,
        local_paths: &str,
        remote_paths: &str,
        delete_paths: Option<&str>,
        policy: RetryPolicy,
    ) -> Result<Self> {
        let locals = split_list(local_paths);
        let remotes = split_list(remote_paths);

        if locals.is_empty() {
            return Err(Error::Config("no local path configured".to_string()));
        }
        if remotes.is_empty() {
            return Err(Error::Config("no remote path configured".to_string()));
        }

        let uploads = match (locals.as_slice(), remotes.len()) {
            ([local], _) => remotes
                .iter()
                .map(|remote| SyncTarget {
                    local_path: resolve_local(workspace, local),
                    remote_key: remote.to_string(),
                })
                .collect(),
            (_, n) if n == locals.len() => locals
                .iter()
                .zip(&remotes)
                .map(|(local, remote)| SyncTarget {
                    local_path: resolve_local(workspace, local),
                    remote_key: remote.to_string(),
                })
                .collect(),
            _ => {
                return Err(Error::Config(format!(
                    "{} local paths cannot be paired with {} remote paths",
                    locals.len(),
                    remotes.len()
                )));
            }
        };

        let deletes = delete_paths
            .map(split_list)
            .unwrap_or_default()
            .into_iter()
            .map(DeleteTarget::new)
            .collect();

        Ok(Self {
            deletes,
            uploads,
            policy,
        })
    }
}

/// Split a comma-separated list, trimming entries and dropping blank ones
pub fn split_list(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Resolve a configured local path against the workspace directory
pub fn resolve_local(workspace: &Path, local: &str) -> PathBuf {
    let relative = local.trim_start_matches('/');
    if relative.is_empty() {
        workspace.to_path_buf()
    } else {
        workspace.join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("/a, /b,,/c "), vec!["/a", "/b", "/c"]);
        assert!(split_list("").is_empty());
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn test_resolve_local() {
        let ws = Path::new("/ci/workspace");
        assert_eq!(resolve_local(ws, "/build"), PathBuf::from("/ci/workspace/build"));
        assert_eq!(resolve_local(ws, "build/out"), PathBuf::from("/ci/workspace/build/out"));
        assert_eq!(resolve_local(ws, "/"), PathBuf::from("/ci/workspace"));
        assert_eq!(resolve_local(ws, "//etc"), PathBuf::from("/ci/workspace/etc"));
        assert_eq!(resolve_local(ws, "//"), PathBuf::from("/ci/workspace"));
    }

    #[test]
    fn test_build_single_local_many_remotes() {
        let plan = SyncPlan::build(
            Path::new("/ws"),
            "/build",
            "/dist,/mirror",
            Some("/old"),
            RetryPolicy::new(1),
        )
        .unwrap();

        assert_eq!(plan.deletes, vec![DeleteTarget::new("/old")]);
        assert_eq!(plan.uploads.len(), 2);
        assert!(plan.uploads.iter().all(|t| t.local_path == Path::new("/ws/build")));
        assert_eq!(plan.uploads[0].remote_key, "/dist");
        assert_eq!(plan.uploads[1].remote_key, "/mirror");
        assert_eq!(plan.policy.max_retries, 1);
    }

    #[test]
    fn test_build_zipped_targets() {
        let plan = SyncPlan::build(
            Path::new("/ws"),
            "/site,/docs",
            "/www,/www/docs",
            None,
            RetryPolicy::default(),
        )
        .unwrap();

        assert!(plan.deletes.is_empty());
        assert_eq!(plan.uploads[1].local_path, PathBuf::from("/ws/docs"));
        assert_eq!(plan.uploads[1].remote_key, "/www/docs");
    }

    #[test]
    fn test_build_rejects_mismatched_lists() {
        let err = SyncPlan::build(
            Path::new("/ws"),
            "/a,/b",
            "/x,/y,/z",
            None,
            RetryPolicy::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_build_requires_paths() {
        assert!(SyncPlan::build(Path::new("/ws"), "", "/x", None, RetryPolicy::default()).is_err());
        assert!(SyncPlan::build(Path::new("/ws"), "/a", " ", None, RetryPolicy::default()).is_err());
    }
}
