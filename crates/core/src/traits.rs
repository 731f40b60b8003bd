//! Storage capability trait
//!
//! The engine only ever needs three calls against a bucket. Keeping the trait
//! this small lets tests run against an in-memory store with no network.

use async_trait::async_trait;

use crate::error::Result;

/// Summary of one object returned by a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    /// Full object key
    pub key: String,
}

impl ObjectInfo {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Object storage operations used by the synchronization engine
///
/// Keys passed in are already normalized. Implementations must be safe to
/// reuse for every operation of a run.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `key` with the given MIME type, replacing any existing object
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<()>;

    /// List every object whose key starts with `prefix`, in listing order
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectInfo>>;

    /// Delete a single object
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;
}
