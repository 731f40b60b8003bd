//! Synchronization engine
//!
//! A run first purges every configured remote prefix, then mirrors every
//! local target into the bucket. All I/O is sequential so the build log
//! reads in the order things happened. A run stops on an operation that
//! exhausted its retries, or on a prune that makes no progress.

mod prune;
mod upload;

use serde::Serialize;

use crate::error::Result;
use crate::log::LogSink;
use crate::retry::RetryPolicy;
use crate::target::{DeleteTarget, SyncPlan, SyncTarget};
use crate::traits::ObjectStore;

/// Counters for one completed run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Objects deleted while pruning
    pub deleted: usize,
    /// Files uploaded
    pub uploaded: usize,
    /// Local paths skipped because they were missing or unreadable as files
    pub skipped: usize,
    pub bytes_uploaded: u64,
}

/// Engine bound to one store, one bucket and one retry policy
pub struct Publisher<'a> {
    store: &'a dyn ObjectStore,
    log: &'a dyn LogSink,
    bucket: String,
    policy: RetryPolicy,
    report: SyncReport,
}

impl<'a> Publisher<'a> {
    pub fn new(
        store: &'a dyn ObjectStore,
        log: &'a dyn LogSink,
        bucket: impl Into<String>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            store,
            log,
            bucket: bucket.into(),
            policy,
            report: SyncReport::default(),
        }
    }

    /// Prune every delete target, then upload every upload target
    ///
    /// Deletes always finish before the first upload starts. The first
    /// exhausted operation aborts the run; nothing already deleted or
    /// uploaded is rolled back.
    pub async fn run(
        &mut self,
        deletes: &[DeleteTarget],
        uploads: &[SyncTarget],
    ) -> Result<SyncReport> {
        for target in deletes {
            self.log
                .println(&format!("delete remote path => {}", target.prefix));
            self.prune(&target.prefix).await?;
        }

        for target in uploads {
            let kind = if target.local_path.is_dir() {
                "dir"
            } else {
                "file"
            };
            self.log.println(&format!(
                "upload {kind} => {} to {}",
                target.local_path.display(),
                target.remote_key
            ));
            self.upload_tree(&target.remote_key, &target.local_path)
                .await?;
            self.log.println(&format!("upload {kind} success"));
        }

        tracing::debug!(report = ?self.report, bucket = %self.bucket, "Run finished");
        Ok(std::mem::take(&mut self.report))
    }
}

/// Execute a whole plan against `bucket`
pub async fn run(
    store: &dyn ObjectStore,
    log: &dyn LogSink,
    bucket: &str,
    plan: &SyncPlan,
) -> Result<SyncReport> {
    Publisher::new(store, log, bucket, plan.policy)
        .run(&plan.deletes, &plan.uploads)
        .await
}
