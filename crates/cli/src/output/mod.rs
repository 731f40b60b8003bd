//! Output formatting
//!
//! Human-readable output by default, strict JSON with `--json`.

mod build_log;
mod formatter;

pub use build_log::BuildLog;
pub use formatter::Formatter;

/// Output settings shared by every command
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Print machine-readable JSON instead of text
    pub json: bool,
    /// Disable colored output
    pub no_color: bool,
    /// Suppress everything but errors
    pub quiet: bool,
}
