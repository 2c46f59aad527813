use std::io;

use thiserror::Error;

/// Convenience alias used across the workspace.
pub type Result<T> = std::result::Result<T, ErrorKind>;

/// Errors surfaced by transport operations.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The underlying socket failed hard.
    #[error("socket i/o failed: {0}")]
    Io(#[from] io::Error),

    /// The peer declared a frame outside the wire contract.
    #[error("wire violation: {0}")]
    Wire(#[from] WireViolation),

    /// A payload does not fit in a single frame under the active config.
    #[error("payload of {payload} bytes exceeds the {max} byte payload capacity")]
    PayloadTooLarge {
        /// Size of the rejected payload.
        payload: usize,
        /// Largest payload a frame can carry.
        max: usize,
    },

    /// The operation targeted a connection that is already torn down.
    #[error("connection is closed")]
    ConnectionClosed,

    /// The configuration is internally inconsistent.
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

/// Framing violations a peer can commit with its declared length.
///
/// Both variants terminate the connection identically; they are separate
/// only so diagnostics can tell a hostile oversize claim from a degenerate
/// sub-header one.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WireViolation {
    /// Declared length exceeds the configured frame bound.
    #[error("declared length {declared} exceeds the frame bound {max}")]
    Oversize {
        /// Length the peer declared.
        declared: usize,
        /// Configured maximum frame size.
        max: usize,
    },

    /// Declared length is smaller than the length prefix itself, which
    /// would imply a negative payload.
    #[error("declared length {declared} is shorter than the {prefix} byte length prefix")]
    Undersize {
        /// Length the peer declared.
        declared: usize,
        /// Width of the length prefix in bytes.
        prefix: usize,
    },
}
