//! Error types for bp-core
//!
//! Every recoverable condition is absorbed inside the engine; the variants
//! here are what is left once a condition could not be absorbed.

use thiserror::Error;

/// Result alias used throughout bp-core
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the engine, the storage adapters and config loading
#[derive(Debug, Error)]
pub enum Error {
    /// Transport or service failure reported by a storage client
    #[error("Network error: {0}")]
    Network(String),

    /// Local file-system failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A local or remote path that cannot be used
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A remote operation failed on every allowed attempt
    #[error("{operation} fail, more than the max of retries ({attempts} attempts) for {key}")]
    RetriesExhausted {
        operation: &'static str,
        key: String,
        attempts: u32,
    },

    /// Deleting every listed object under a prefix left the listing unchanged
    #[error("delete fail, {remaining} objects still listed under [{prefix}] after deleting them")]
    PruneStalled { prefix: String, remaining: usize },

    /// The run was stopped from outside between two blocking calls
    #[error("Interrupted")]
    Interrupted,

    #[error("{0}")]
    General(String),
}

impl Error {
    /// Whether this error ended a run that had already started mutating the bucket
    pub fn is_fatal_run_error(&self) -> bool {
        matches!(
            self,
            Error::RetriesExhausted { .. } | Error::PruneStalled { .. } | Error::Interrupted
        )
    }
}

/// Render an error together with every `source()` below it
///
/// Produces `outer: inner: innermost`, which is what goes into the build log
/// when an attempt fails.
pub fn chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !rendered.ends_with(&text) {
            rendered.push_str(": ");
            rendered.push_str(&text);
        }
        source = cause.source();
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("put failed")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn test_retries_exhausted_message() {
        let e = Error::RetriesExhausted {
            operation: "upload",
            key: "dist/app.js".to_string(),
            attempts: 4,
        };
        assert_eq!(
            e.to_string(),
            "upload fail, more than the max of retries (4 attempts) for dist/app.js"
        );
        assert!(e.is_fatal_run_error());
    }

    #[test]
    fn test_prune_stalled_message() {
        let e = Error::PruneStalled {
            prefix: "/".to_string(),
            remaining: 1,
        };
        assert_eq!(
            e.to_string(),
            "delete fail, 1 objects still listed under [/] after deleting them"
        );
        assert!(e.is_fatal_run_error());
    }

    #[test]
    fn test_chain_includes_sources() {
        let e = Outer(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        ));
        assert_eq!(chain(&e), "put failed: connection reset by peer");
    }

    #[test]
    fn test_chain_single_error() {
        let e = Error::Network("503 Service Unavailable".to_string());
        assert_eq!(chain(&e), "Network error: 503 Service Unavailable");
        assert!(!e.is_fatal_run_error());
    }
}
