//! Build log sink
//!
//! The build log is the human-readable, line-oriented record a pipeline user
//! reads after a run. It is separate from `tracing` diagnostics.

use std::sync::Mutex;

/// Append-only line sink for the build log
pub trait LogSink: Send + Sync {
    fn println(&self, line: &str);
}

/// Sink that forwards every line as a `tracing` info event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn println(&self, line: &str) {
        tracing::info!(target: "bp_core::build_log", "{line}");
    }
}

/// Sink that keeps every line in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the lines written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of lines containing `needle`
    pub fn count_containing(&self, needle: &str) -> usize {
        self.lines().iter().filter(|l| l.contains(needle)).count()
    }
}

impl LogSink for MemorySink {
    fn println(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_keeps_order() {
        let sink = MemorySink::new();
        sink.println("first");
        sink.println("second");
        assert_eq!(sink.lines(), vec!["first", "second"]);
        assert_eq!(sink.count_containing("sec"), 1);
    }

    #[test]
    fn test_tracing_sink_is_silent_without_subscriber() {
        TracingSink.println("no subscriber installed");
    }
}
