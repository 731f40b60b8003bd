//! In-memory object store
//!
//! Records every call it receives and can be told to fail a given operation
//! on a given key a number of times. Meant for tests of the engine and of
//! anything built on top of it.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::traits::{ObjectInfo, ObjectStore};

/// Kind of storage call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Put,
    List,
    Delete,
}

/// One recorded storage call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub operation: Operation,
    pub bucket: String,
    /// Object key, or the prefix for listings
    pub key: String,
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.operation {
            Operation::Put => "put",
            Operation::List => "list",
            Operation::Delete => "delete",
        };
        write!(f, "{name}({})", self.key)
    }
}

#[derive(Default)]
struct State {
    objects: Vec<(String, Vec<u8>)>,
    content_types: HashMap<String, String>,
    calls: Vec<Call>,
    failures: HashMap<(Operation, String), u32>,
}

/// Object store backed by an insertion-ordered list of objects
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with empty objects under `keys`
    pub fn with_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let store = Self::new();
        {
            let mut state = store.lock();
            for key in keys {
                state.objects.push((key.into(), Vec::new()));
            }
        }
        store
    }

    /// Make the next `times` calls of `operation` on `key` fail
    pub fn fail(&self, operation: Operation, key: &str, times: u32) {
        self.lock()
            .failures
            .insert((operation, key.to_string()), times);
    }

    /// Keys currently stored, in insertion order
    pub fn keys(&self) -> Vec<String> {
        self.lock().objects.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.lock()
            .objects
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    pub fn content_type(&self, key: &str) -> Option<String> {
        self.lock().content_types.get(key).cloned()
    }

    /// Every call received so far
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Calls rendered as `op(key)`, e.g. `list(old)` or `put(dist/out.bin)`
    pub fn call_log(&self) -> Vec<String> {
        self.lock().calls.iter().map(ToString::to_string).collect()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, operation: Operation, bucket: &str, key: &str) -> Result<MutexGuard<'_, State>> {
        let mut state = self.lock();
        state.calls.push(Call {
            operation,
            bucket: bucket.to_string(),
            key: key.to_string(),
        });

        if let Some(remaining) = state.failures.get_mut(&(operation, key.to_string()))
            && *remaining > 0
        {
            *remaining -= 1;
            return Err(Error::Network(format!("injected {operation:?} failure for {key}")));
        }
        Ok(state)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let mut state = self.record(Operation::Put, bucket, key)?;
        state
            .content_types
            .insert(key.to_string(), content_type.to_string());
        match state.objects.iter().position(|(k, _)| k == key) {
            Some(index) => state.objects[index].1 = data,
            None => state.objects.push((key.to_string(), data)),
        }
        Ok(())
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectInfo>> {
        let state = self.record(Operation::List, bucket, prefix)?;
        Ok(state
            .objects
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| ObjectInfo::new(k.clone()))
            .collect())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        let mut state = self.record(Operation::Delete, bucket, key)?;
        state.objects.retain(|(k, _)| k != key);
        Ok(())
    }
}
