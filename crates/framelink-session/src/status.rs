/// Connection lifecycle state machine.
///
/// A connection wraps an already-established stream and stays active until
/// torn down; `Closed` is terminal. Writability is an overlay flag on the
/// active state, not a state of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No stream attached yet
    #[default]
    Inactive,

    /// Stream attached; frames may move in both directions
    Active,

    /// Torn down; the socket and all buffered frames are gone
    Closed,
}

impl ConnectionState {
    /// Returns true while frames can still move through the connection
    pub fn is_open(&self) -> bool {
        matches!(self, ConnectionState::Active)
    }

    /// Returns true once the connection has been torn down
    pub fn is_closed(&self) -> bool {
        matches!(self, ConnectionState::Closed)
    }
}
