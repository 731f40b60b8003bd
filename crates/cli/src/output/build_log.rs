//! Build log sink for the terminal

use bp_core::{LogSink, TracingSink};

use super::Formatter;

/// Writes build log lines to stdout, or to `tracing` when stdout is reserved for JSON
#[derive(Debug, Clone)]
pub struct BuildLog {
    formatter: Formatter,
}

impl BuildLog {
    pub fn new(formatter: &Formatter) -> Self {
        Self {
            formatter: formatter.clone(),
        }
    }
}

impl LogSink for BuildLog {
    fn println(&self, line: &str) {
        if self.formatter.is_json() {
            TracingSink.println(line);
        } else {
            self.formatter.println(line);
        }
    }
}
