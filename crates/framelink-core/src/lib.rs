#![warn(missing_docs)]

//! framelink-core: foundational types and utilities.
//!
//! This crate provides the minimal set of core utilities shared across all
//! layers:
//! - Configuration types
//! - Error handling
//! - Protocol constants
//! - Memory utilities (frame buffer pooling)
//! - Transport abstraction for pluggable stream I/O
//!
//! Framing and session logic live in the specialized crates:
//! - `framelink-wire`: the length-prefixed frame and its cursor discipline
//! - `framelink-session`: outbound queue, receive assembly, connection lifecycle

/// Protocol constants shared across layers.
pub mod constants {
    /// Default upper bound on a whole frame in bytes, length prefix included.
    ///
    /// Chosen so a full frame fits a typical ethernet segment without
    /// fragmentation. Profiles that need larger frames raise
    /// `Config::max_frame_size` together with a wider length prefix.
    pub const DEFAULT_MAX_FRAME_SIZE: usize = 1460;

    /// Default number of recycled frame buffers kept per connection.
    pub const DEFAULT_POOL_BUFFERS: usize = 32;
}

/// Configuration options for the transport.
pub mod config;
/// Error types and results.
pub mod error;
/// Frame buffer pooling for memory efficiency.
pub mod frame_pool;
/// Transport abstraction for pluggable stream I/O.
pub mod transport;
