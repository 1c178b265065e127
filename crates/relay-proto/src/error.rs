//! Error types for the protocol library.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Protocol-level failures.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// Underlying transport failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line could not be turned into a message. The line is dropped and
    /// the connection continues.
    #[error("malformed message: {0}")]
    MalformedMessage(&'static str),

    /// A line exceeded the configured length limit.
    #[error("line too long: {actual} bytes (limit {limit})")]
    LineTooLong {
        /// Bytes seen so far.
        actual: usize,
        /// Configured limit.
        limit: usize,
    },
}
