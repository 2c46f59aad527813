#![warn(missing_docs)]

//! framelink-session: the connection engine.
//!
//! Turns one non-blocking stream socket into an ordered, length-framed
//! message session. An external readiness notifier drives the engine:
//! call [`Connection::set_writable`] and [`Connection::flush`] when the
//! socket may take bytes, [`Connection::receive`] when bytes may be
//! waiting. Every fatal condition funnels through [`Connection::close`],
//! the single teardown chokepoint.

/// Two-phase reassembly of inbound frames.
pub mod assembler;
/// The connection: queueing, pumping, receiving, teardown.
pub mod connection;
/// Role-dependent teardown policy.
pub mod role;
/// Ordered outbound frame queue.
pub mod send_queue;
/// Connection lifecycle states.
pub mod status;

pub use connection::{CloseCause, Connection, Flushed, Received};
pub use role::{CloseOrigin, CloseStatus, Disconnect, ReleasePolicy, RolePolicy};
pub use status::ConnectionState;
