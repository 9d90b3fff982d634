//! Oracle invocation error types.

use thiserror::Error;

/// Failures from one oracle subprocess call.
#[derive(Debug, Error)]
pub enum OracleError {
    /// No script is configured for the requested oracle.
    #[error("Oracle not configured: {0}")]
    Unconfigured(String),

    /// The subprocess could not be started.
    #[error("Failed to spawn oracle process: {0}")]
    Spawn(#[from] std::io::Error),

    /// The subprocess exceeded the configured timeout.
    #[error("Oracle call timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The subprocess exited non-zero.
    #[error("Oracle exited with status {code:?}: {stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },

    /// Stdout was not a well-formed JSON object of the expected shape.
    #[error("Malformed oracle output: {0}")]
    MalformedOutput(String),

    /// The oracle ran but reported `success = false`.
    #[error("Oracle rejected the request: {0}")]
    Rejected(String),
}
