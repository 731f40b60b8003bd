//! bp-core: Core library for bucket-publish
//!
//! This crate provides the synchronization engine that publishes a build
//! output tree to an object-storage bucket:
//! - Remote key normalization and derivation
//! - Retry wrapper for remote operations
//! - Remote pruning and tree upload
//! - Configuration and plan building
//! - ObjectStore trait for storage backends
//!
//! The engine is independent of any specific S3 SDK; tests run it against
//! [`memory::MemoryStore`].

pub mod config;
pub mod error;
pub mod key;
pub mod log;
pub mod memory;
pub mod retry;
pub mod sync;
pub mod target;
pub mod traits;

pub use config::{PublishConfig, RetrySetting, StoreConfig};
pub use error::{Error, Result};
pub use key::normalize;
pub use log::{LogSink, MemorySink, TracingSink};
pub use retry::{RetryPolicy, retry};
pub use sync::{Publisher, SyncReport, run};
pub use target::{DeleteTarget, SyncPlan, SyncTarget};
pub use traits::{ObjectInfo, ObjectStore};
