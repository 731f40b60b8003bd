//! Remote pruning: delete everything under a key prefix

use crate::error::{Error, Result};
use crate::key;
use crate::retry::retry;

use super::Publisher;

impl Publisher<'_> {
    /// Delete every object listed under `prefix`
    ///
    /// After a pass the prefix is listed again and the pass repeats until a
    /// listing comes back empty. There is no wait between passes; the
    /// re-listing is a best-effort check against stale listings. A listing
    /// identical to the one just deleted means the deletes had no effect,
    /// and the prune fails instead of repeating forever.
    pub async fn prune(&mut self, prefix: &str) -> Result<()> {
        let mut deleted: Option<Vec<String>> = None;

        loop {
            let keys = self.list_keys(prefix).await?;
            if keys.is_empty() {
                if deleted.is_none() {
                    self.log
                        .println(&format!("file [{prefix}] not exists, skipped"));
                }
                return Ok(());
            }

            if deleted.as_ref() == Some(&keys) {
                self.log.println(&format!(
                    "file [{prefix}] still lists {} objects after delete, giving up",
                    keys.len()
                ));
                return Err(Error::PruneStalled {
                    prefix: prefix.to_string(),
                    remaining: keys.len(),
                });
            }

            for k in &keys {
                self.delete_file(k).await?;
            }
            deleted = Some(keys);
        }
    }

    /// Keys of all objects under `prefix`, in listing order
    pub async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        let prefix = key::normalize(prefix);
        let (store, bucket) = (self.store, self.bucket.as_str());

        let objects = retry(&self.policy, self.log, "list", prefix, || {
            store.list_objects(bucket, prefix)
        })
        .await?;

        tracing::debug!(bucket, prefix, count = objects.len(), "Listed objects");
        Ok(objects.into_iter().map(|o| o.key).collect())
    }

    /// Delete one object, retrying per policy
    pub async fn delete_file(&mut self, key: &str) -> Result<()> {
        let key = key::normalize(key);
        let (store, log, bucket) = (self.store, self.log, self.bucket.as_str());

        retry(&self.policy, log, "delete", key, || {
            log.println(&format!("deleting [{key}]"));
            store.delete_object(bucket, key)
        })
        .await?;

        self.report.deleted += 1;
        Ok(())
    }
}
