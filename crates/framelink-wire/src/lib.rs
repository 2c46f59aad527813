#![warn(missing_docs)]

//! framelink-wire: the length-prefixed frame and its cursor discipline.
//!
//! A [`Frame`] is a bounded byte buffer with a fixed wire shape: a
//! little-endian length prefix counting the whole frame (prefix included),
//! followed by an uninterpreted payload. The same type serves both
//! directions: outbound frames are sealed once and drained against a
//! socket, inbound frames fill incrementally across readiness events.

/// The frame type and its wire encoding.
pub mod frame;

pub use frame::Frame;
