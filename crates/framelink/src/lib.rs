#![warn(missing_docs)]

//! Framelink: a small public API facade for the workspace.
//!
//! This crate provides a clean, stable surface that re-exports the most
//! commonly used types to build framed stream transports:
//!
//! - The connection engine (`Connection`, `Flushed`, `Received`)
//! - Frames and the wire profile (`Frame`, `Config`, `PrefixWidth`)
//! - The teardown seam (`RolePolicy`, `CloseStatus`)
//! - The socket abstraction (`StreamSocket`)
//!
//! Example
//! ```ignore
//! use std::net::TcpStream;
//! use framelink::{CloseCause, Config, Connection, Flushed, Received};
//!
//! let stream = TcpStream::connect("127.0.0.1:9000").unwrap();
//! stream.set_nonblocking(true).unwrap();
//!
//! let mut conn = Connection::with_default_policy(stream, Config::default()).unwrap();
//! conn.set_writable(true);
//!
//! conn.enqueue(b"hello").unwrap();
//! conn.flush();
//!
//! // Poll once; a complete reply may or may not be in yet.
//! match conn.receive() {
//!     Received::Frame(frame) => println!("got {} bytes", frame.payload().len()),
//!     Received::Pending => {}
//!     Received::Closed(_) => return,
//! }
//!
//! conn.close(CloseCause::Local);
//! ```

// Core: configuration, errors, transport abstraction
pub use framelink_core::{
    config::{Config, PrefixWidth},
    error::{ErrorKind, Result, WireViolation},
    frame_pool::FramePool,
    transport::{classify, StreamSocket, Transfer},
};
// Session: the connection engine and its teardown seam
pub use framelink_session::{
    CloseCause, CloseOrigin, CloseStatus, Connection, ConnectionState, Disconnect, Flushed,
    Received, ReleasePolicy, RolePolicy,
};
// Wire: the frame itself
pub use framelink_wire::Frame;

/// Convenience prelude with the most commonly used items.
pub mod prelude {
    pub use crate::{
        CloseCause, CloseStatus, Config, Connection, Flushed, Frame, PrefixWidth, Received,
        ReleasePolicy, RolePolicy, StreamSocket,
    };
}
