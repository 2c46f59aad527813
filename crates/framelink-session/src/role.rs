//! Role-dependent teardown policy.
//!
//! What happens after a connection dies depends on which side of the wire
//! we are: a game client falls back to its menu, a server just releases
//! the slot. The engine stays ignorant of that choice and defers to a
//! policy object injected at construction, so there is no process-wide
//! "are we the server" flag and the engine is testable in isolation.

/// Which side ended the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOrigin {
    /// This side initiated the teardown.
    Local,
    /// The teardown was detected: peer shutdown, transport failure, or a
    /// wire violation.
    Remote,
}

/// Status a policy hands back from teardown, forwarded to the engine's
/// caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseStatus {
    /// Resources released; nothing further to do.
    Done,
    /// The session was lost; the application should react.
    ConnectionLost,
}

/// Verdict produced by a [`RolePolicy`] when a connection is torn down.
#[derive(Debug)]
pub struct Disconnect {
    /// Status forwarded verbatim to the engine's caller.
    pub status: CloseStatus,
    /// Human-readable reason recorded in the logs.
    pub reason: String,
}

/// Decides the higher-level reaction to a connection teardown.
///
/// The engine calls this exactly once per connection, from inside
/// [`close`](crate::Connection::close), after the socket and buffers are
/// gone.
///
/// # Examples
/// ```
/// use framelink_session::role::{CloseOrigin, CloseStatus, Disconnect, RolePolicy};
///
/// /// Client side: any teardown we did not ask for means the game is gone.
/// struct ClientPolicy;
///
/// impl RolePolicy for ClientPolicy {
///     fn on_close(&mut self, origin: CloseOrigin) -> Disconnect {
///         let status = match origin {
///             CloseOrigin::Local => CloseStatus::Done,
///             CloseOrigin::Remote => CloseStatus::ConnectionLost,
///         };
///         Disconnect { status, reason: "server connection ended".to_string() }
///     }
/// }
/// ```
pub trait RolePolicy: Send {
    /// Called once when a connection is torn down.
    fn on_close(&mut self, origin: CloseOrigin) -> Disconnect;
}

/// Policy that releases resources and reports nothing further.
///
/// This is the default when no policy is specified; it fits the server
/// side, where a dead connection only frees a slot.
#[derive(Debug, Clone, Copy)]
pub struct ReleasePolicy;

impl RolePolicy for ReleasePolicy {
    fn on_close(&mut self, _origin: CloseOrigin) -> Disconnect {
        Disconnect { status: CloseStatus::Done, reason: "connection released".to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_policy_always_done() {
        let mut policy = ReleasePolicy;
        for origin in [CloseOrigin::Local, CloseOrigin::Remote] {
            let verdict = policy.on_close(origin);
            assert_eq!(verdict.status, CloseStatus::Done);
            assert!(!verdict.reason.is_empty());
        }
    }
}
