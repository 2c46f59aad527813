//! Transport abstraction for pluggable stream I/O.

use std::io;

/// Low-level non-blocking stream socket abstraction.
///
/// This trait allows various byte streams (TCP sockets, in-memory
/// simulators, etc.) to be plugged into the connection engine without
/// coupling to a concrete implementation. Implementations must be
/// non-blocking: when no progress is possible they return a
/// [`WouldBlock`](io::ErrorKind::WouldBlock) error instead of suspending.
pub trait StreamSocket {
    /// Writes bytes from `buf`, returning how many the OS accepted.
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Reads bytes into `buf`, returning how many arrived.
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

impl StreamSocket for std::net::TcpStream {
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::Write::write(self, buf)
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(self, buf)
    }
}

/// Classified outcome of one non-blocking transfer attempt.
#[derive(Debug)]
pub enum Transfer {
    /// One or more bytes moved.
    Progress(usize),
    /// Zero-length result: the peer shut down its end in an orderly way.
    PeerClosed,
    /// The OS cannot make progress right now; try again on the next
    /// readiness notification. Not an error.
    WouldBlock,
    /// Unrecoverable transport failure.
    Fatal(io::Error),
}

/// Sorts a raw send/recv result into the categories the engine acts on.
///
/// Callers never compare OS error numbers themselves; every transfer goes
/// through this single classification point.
pub fn classify(result: io::Result<usize>) -> Transfer {
    match result {
        Ok(0) => Transfer::PeerClosed,
        Ok(n) => Transfer::Progress(n),
        Err(e) if e.kind() == io::ErrorKind::WouldBlock => Transfer::WouldBlock,
        Err(e) => Transfer::Fatal(e),
    }
}
