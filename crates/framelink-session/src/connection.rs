use std::{fmt, io};

use framelink_core::{
    config::Config,
    error::{ErrorKind, Result, WireViolation},
    frame_pool::FramePool,
    transport::{classify, StreamSocket, Transfer},
};
use framelink_wire::Frame;
use tracing::{debug, error, warn};

use crate::{
    assembler::{AssembleStep, ReceiveAssembler},
    role::{CloseOrigin, CloseStatus, ReleasePolicy, RolePolicy},
    send_queue::SendQueue,
    status::ConnectionState,
};

/// Why a connection is being torn down.
#[derive(Debug)]
pub enum CloseCause {
    /// This side is done with the session.
    Local,
    /// The peer shut down its end in an orderly way.
    RemoteClosed,
    /// The transport failed hard.
    Transport(io::Error),
    /// The peer declared a frame the wire contract forbids.
    Violation(WireViolation),
}

impl CloseCause {
    /// Whether this side initiated the teardown or merely detected it.
    pub fn origin(&self) -> CloseOrigin {
        match self {
            CloseCause::Local => CloseOrigin::Local,
            CloseCause::RemoteClosed
            | CloseCause::Transport(_)
            | CloseCause::Violation(_) => CloseOrigin::Remote,
        }
    }
}

/// Outcome of draining the send queue once.
#[derive(Debug)]
pub enum Flushed {
    /// Every queued frame went out.
    Drained,
    /// The socket is unwritable or the OS buffer filled up; the rest stays
    /// queued for the next writability notification.
    Blocked,
    /// The connection was torn down mid-send; do not touch it further.
    Closed(CloseStatus),
}

/// Outcome of one receive opportunity.
#[derive(Debug)]
pub enum Received {
    /// A whole frame arrived, cursor rewound to the start of its payload.
    Frame(Frame),
    /// Nothing complete yet; call again on the next readiness event.
    Pending,
    /// The connection was torn down; do not touch it further.
    Closed(CloseStatus),
}

/// A framed message session over one non-blocking stream socket.
///
/// The connection owns every buffer it uses and is driven externally by a
/// readiness notifier: [`set_writable`](Connection::set_writable) plus
/// [`flush`](Connection::flush) on write readiness,
/// [`receive`](Connection::receive) on read readiness. None of the entry
/// points block; a would-block from the OS surfaces as
/// [`Flushed::Blocked`] or [`Received::Pending`]. All teardown funnels
/// through [`close`](Connection::close).
pub struct Connection<S: StreamSocket> {
    /// None once the connection has been torn down
    socket: Option<S>,
    state: ConnectionState,
    /// Set by the readiness notifier; the send pump refuses I/O while false
    writable: bool,
    /// Latched by `close`; guards against double teardown
    has_quit: bool,
    send_queue: SendQueue,
    assembler: ReceiveAssembler,
    pool: FramePool,
    policy: Box<dyn RolePolicy>,
    config: Config,
}

impl<S: StreamSocket> Connection<S> {
    /// Wraps an established stream in a framed session.
    pub fn new(socket: S, policy: Box<dyn RolePolicy>, config: Config) -> Result<Self> {
        config.validate()?;
        let pool = FramePool::new(config.max_frame_size, config.pool_buffers);
        Ok(Self {
            socket: Some(socket),
            state: ConnectionState::Active,
            writable: false,
            has_quit: false,
            send_queue: SendQueue::new(),
            assembler: ReceiveAssembler::new(),
            pool,
            policy,
            config,
        })
    }

    /// Wraps an established stream with the default release-only policy.
    pub fn with_default_policy(socket: S, config: Config) -> Result<Self> {
        Self::new(socket, Box::new(ReleasePolicy), config)
    }

    /// Records the writability signal from the readiness notifier.
    pub fn set_writable(&mut self, writable: bool) {
        self.writable = writable;
    }

    /// Returns whether the send pump may currently attempt I/O.
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// True once [`close`](Connection::close) has run.
    pub fn has_quit(&self) -> bool {
        self.has_quit
    }

    /// O(1) check used by drivers deciding whether to keep requesting
    /// writability notifications.
    pub fn is_send_queue_empty(&self) -> bool {
        self.send_queue.is_empty()
    }

    /// Unsent bytes currently queued, for back-pressure decisions.
    pub fn pending_send_bytes(&self) -> usize {
        self.send_queue.pending_bytes()
    }

    /// Frames `payload` and queues it for in-order transmission.
    ///
    /// The frame is finalized here and goes out as soon as the socket
    /// accepts it, possibly spread across several `flush` calls. Frames
    /// leave in exactly the order they were queued.
    pub fn enqueue(&mut self, payload: &[u8]) -> Result<()> {
        if !self.state.is_open() {
            return Err(ErrorKind::ConnectionClosed);
        }
        let frame = Frame::outbound(
            self.pool.acquire(),
            self.config.prefix_width,
            self.config.max_frame_size,
            payload,
        )?;
        self.send_queue.push(frame);
        Ok(())
    }

    /// Drains the send queue against the socket.
    ///
    /// Stops when the queue is empty, when the OS reports it cannot take
    /// more right now, or when the connection dies. A partial write
    /// advances the head frame's cursor and the pump re-attempts; a
    /// zero-length write means the peer left and tears the connection
    /// down.
    pub fn flush(&mut self) -> Flushed {
        if self.has_quit {
            return Flushed::Closed(CloseStatus::Done);
        }
        if !self.writable {
            return Flushed::Blocked;
        }
        loop {
            let socket = match self.socket.as_mut() {
                Some(socket) => socket,
                None => return Flushed::Closed(CloseStatus::Done),
            };
            let frame = match self.send_queue.front_mut() {
                Some(frame) => frame,
                None => return Flushed::Drained,
            };
            match classify(socket.write_bytes(frame.remaining_to_send())) {
                Transfer::Progress(n) => {
                    frame.advance(n);
                    if frame.is_fully_sent() {
                        if let Some(sent) = self.send_queue.pop_front() {
                            self.pool.release(sent.into_buffer());
                        }
                    }
                }
                Transfer::WouldBlock => return Flushed::Blocked,
                Transfer::PeerClosed => {
                    return Flushed::Closed(self.close(CloseCause::RemoteClosed));
                }
                Transfer::Fatal(err) => {
                    return Flushed::Closed(self.close(CloseCause::Transport(err)));
                }
            }
        }
    }

    /// Runs one receive opportunity.
    ///
    /// Yields at most one completed frame per call; call repeatedly while
    /// frames keep arriving. A completed frame is handed off with its
    /// cursor at the start of the payload and the engine keeps no further
    /// reference to it.
    pub fn receive(&mut self) -> Received {
        if self.has_quit {
            return Received::Closed(CloseStatus::Done);
        }
        let socket = match self.socket.as_mut() {
            Some(socket) => socket,
            None => return Received::Closed(CloseStatus::Done),
        };
        match self.assembler.poll(socket, &self.config, &mut self.pool) {
            AssembleStep::Complete(frame) => Received::Frame(frame),
            AssembleStep::Pending => Received::Pending,
            AssembleStep::PeerClosed => {
                Received::Closed(self.close(CloseCause::RemoteClosed))
            }
            AssembleStep::Violation(violation) => {
                Received::Closed(self.close(CloseCause::Violation(violation)))
            }
            AssembleStep::Fatal(err) => {
                Received::Closed(self.close(CloseCause::Transport(err)))
            }
        }
    }

    /// Tears the connection down.
    ///
    /// Idempotent: the socket is closed, every buffered frame is released,
    /// and the role policy is consulted exactly once; later calls are
    /// no-ops. This is the only place frames or the socket are given up.
    pub fn close(&mut self, cause: CloseCause) -> CloseStatus {
        if self.has_quit {
            return CloseStatus::Done;
        }
        self.has_quit = true;
        self.writable = false;
        self.state = ConnectionState::Closed;
        // Dropping the handle closes it.
        self.socket = None;

        while let Some(frame) = self.send_queue.pop_front() {
            self.pool.release(frame.into_buffer());
        }
        self.assembler.reclaim_partial(&mut self.pool);

        match &cause {
            CloseCause::Local => debug!("closing connection locally"),
            CloseCause::RemoteClosed => debug!("peer closed the connection"),
            CloseCause::Transport(err) => error!(%err, "transport failure, closing connection"),
            CloseCause::Violation(violation) => {
                warn!(%violation, "wire violation, closing connection");
            }
        }

        let verdict = self.policy.on_close(cause.origin());
        debug!(reason = %verdict.reason, "connection torn down");
        verdict.status
    }
}

impl<S: StreamSocket> fmt::Debug for Connection<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("state", &self.state)
            .field("writable", &self.writable)
            .field("queued_frames", &self.send_queue.len())
            .field("receiving", &self.assembler.has_partial())
            .finish()
    }
}
