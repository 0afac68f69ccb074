//! Error types for termform.

use std::io;

/// Error type for termform operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error from the underlying byte stream or console API.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An argument was invalid: null where forbidden, an out-of-range
    /// dimension, or too many handles passed to a bounded wait.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A mutation was attempted against a read-only buffer.
    #[error("buffer is read-only")]
    ReadOnly,

    /// Raw-mode acquisition failed (no controlling tty, or the platform
    /// console API rejected the request).
    #[error("terminal unavailable: {0}")]
    TerminalUnavailable(String),

    /// A cooperative wait was cancelled before it completed.
    #[error("operation cancelled")]
    Cancelled,
}

/// Result type alias for termform operations.
pub type Result<T> = std::result::Result<T, Error>;
