//! Process exit codes
//!
//! Pipelines branch on these, so the values are stable.

use bp_core::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    /// Invalid flags or configuration
    UsageError = 2,
    /// The store could not be reached, or an operation ran out of retries
    NetworkError = 3,
    Interrupted = 130,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_error(error: &Error) -> Self {
        match error {
            Error::Config(_) | Error::InvalidPath(_) => ExitCode::UsageError,
            Error::Network(_) | Error::RetriesExhausted { .. } | Error::PruneStalled { .. } => {
                ExitCode::NetworkError
            }
            Error::Interrupted => ExitCode::Interrupted,
            Error::Io(_) | Error::General(_) => ExitCode::GeneralError,
        }
    }
}
