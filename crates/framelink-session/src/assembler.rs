//! Two-phase reassembly of inbound frames.

use std::io;

use framelink_core::{
    config::Config,
    error::WireViolation,
    frame_pool::FramePool,
    transport::{classify, StreamSocket, Transfer},
};
use framelink_wire::Frame;

/// Result of one receive opportunity.
#[derive(Debug)]
pub enum AssembleStep {
    /// A whole frame arrived; ownership transfers to the caller.
    Complete(Frame),
    /// The socket ran dry mid-frame; progress is kept for the next call.
    Pending,
    /// The peer shut down its end in an orderly way.
    PeerClosed,
    /// The peer declared a frame the wire contract forbids.
    Violation(WireViolation),
    /// The transport failed hard.
    Fatal(io::Error),
}

/// Incrementally fills one inbound frame across readiness events.
///
/// The assembler is a two-phase machine: it accumulates the length prefix,
/// decodes and validates the declared size, then accumulates the body. At
/// most one partial frame exists at a time, and a would-block at any point
/// leaves the cursor consistent for exact resumption: no byte is read
/// twice, none are skipped.
#[derive(Debug, Default)]
pub struct ReceiveAssembler {
    partial: Option<Frame>,
}

impl ReceiveAssembler {
    /// Creates an assembler with no partial frame.
    pub fn new() -> Self {
        Self { partial: None }
    }

    /// True while an incomplete inbound frame is pending.
    pub fn has_partial(&self) -> bool {
        self.partial.is_some()
    }

    /// Discards the partial frame, handing its buffer back for reuse.
    pub fn reclaim_partial(&mut self, pool: &mut FramePool) {
        if let Some(frame) = self.partial.take() {
            pool.release(frame.into_buffer());
        }
    }

    /// Runs one receive opportunity against the socket.
    ///
    /// Yields at most one completed frame per call; drive it repeatedly
    /// while frames keep completing. On the fatal outcomes the partial
    /// frame is abandoned; the connection is about to be torn down.
    pub fn poll<S: StreamSocket>(
        &mut self,
        socket: &mut S,
        config: &Config,
        pool: &mut FramePool,
    ) -> AssembleStep {
        let mut frame = self.partial.take().unwrap_or_else(|| {
            Frame::inbound(pool.acquire(), config.prefix_width, config.max_frame_size)
        });

        // Phase one: the length prefix.
        while frame.awaiting_header() {
            match classify(socket.read_bytes(frame.receive_window())) {
                Transfer::Progress(n) => frame.advance(n),
                Transfer::WouldBlock => {
                    self.partial = Some(frame);
                    return AssembleStep::Pending;
                }
                Transfer::PeerClosed => return AssembleStep::PeerClosed,
                Transfer::Fatal(err) => return AssembleStep::Fatal(err),
            }
        }

        // The prefix is in; the declared size is decoded exactly once.
        // `size` stays zero until that decode succeeds.
        if !frame.header_decoded() {
            if let Err(violation) = frame.decode_length(config.max_frame_size) {
                return AssembleStep::Violation(violation);
            }
        }

        // Phase two: the body.
        while !frame.is_complete() {
            match classify(socket.read_bytes(frame.receive_window())) {
                Transfer::Progress(n) => frame.advance(n),
                Transfer::WouldBlock => {
                    self.partial = Some(frame);
                    return AssembleStep::Pending;
                }
                Transfer::PeerClosed => return AssembleStep::PeerClosed,
                Transfer::Fatal(err) => return AssembleStep::Fatal(err),
            }
        }

        frame.rewind_to_payload();
        AssembleStep::Complete(frame)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    /// One scripted reaction of the fake socket.
    enum Step {
        Chunk(Vec<u8>),
        WouldBlock,
        Eof,
        Fail(io::ErrorKind),
    }

    /// Socket double that serves scripted read results. Oversized chunks
    /// are split against the caller's window so partial reads happen
    /// naturally.
    struct ScriptedSocket {
        steps: VecDeque<Step>,
    }

    impl ScriptedSocket {
        fn new(steps: Vec<Step>) -> Self {
            Self { steps: steps.into() }
        }
    }

    impl StreamSocket for ScriptedSocket {
        fn write_bytes(&mut self, _buf: &[u8]) -> io::Result<usize> {
            unreachable!("the assembler never writes")
        }

        fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.steps.pop_front() {
                None | Some(Step::WouldBlock) => Err(io::ErrorKind::WouldBlock.into()),
                Some(Step::Eof) => Ok(0),
                Some(Step::Fail(kind)) => Err(kind.into()),
                Some(Step::Chunk(mut chunk)) => {
                    let n = chunk.len().min(buf.len());
                    buf[..n].copy_from_slice(&chunk[..n]);
                    if n < chunk.len() {
                        let rest = chunk.split_off(n);
                        self.steps.push_front(Step::Chunk(rest));
                    }
                    Ok(n)
                }
            }
        }
    }

    fn config() -> Config {
        Config { max_frame_size: 1024, ..Config::default() }
    }

    /// Serializes `payload` into its wire form under the default profile.
    fn wire(payload: &[u8]) -> Vec<u8> {
        let size = (2 + payload.len()) as u16;
        let mut bytes = size.to_le_bytes().to_vec();
        bytes.extend_from_slice(payload);
        bytes
    }

    fn poll(
        assembler: &mut ReceiveAssembler,
        socket: &mut ScriptedSocket,
        pool: &mut FramePool,
    ) -> AssembleStep {
        assembler.poll(socket, &config(), pool)
    }

    #[test]
    fn test_single_frame_in_one_chunk() {
        let mut assembler = ReceiveAssembler::new();
        let mut pool = FramePool::default();
        let mut socket = ScriptedSocket::new(vec![Step::Chunk(wire(b"hello"))]);

        match poll(&mut assembler, &mut socket, &mut pool) {
            AssembleStep::Complete(frame) => {
                assert_eq!(frame.payload(), b"hello");
                assert_eq!(frame.declared_len(), 7);
            }
            other => panic!("expected Complete, got {:?}", other),
        }
        assert!(!assembler.has_partial());
    }

    #[test]
    fn test_one_byte_at_a_time() {
        let mut assembler = ReceiveAssembler::new();
        let mut pool = FramePool::default();
        let steps = wire(b"drip").into_iter().map(|b| Step::Chunk(vec![b])).collect();
        let mut socket = ScriptedSocket::new(steps);

        match poll(&mut assembler, &mut socket, &mut pool) {
            AssembleStep::Complete(frame) => assert_eq!(frame.payload(), b"drip"),
            other => panic!("expected Complete, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_payload_frame() {
        let mut assembler = ReceiveAssembler::new();
        let mut pool = FramePool::default();
        let mut socket = ScriptedSocket::new(vec![Step::Chunk(wire(b""))]);

        match poll(&mut assembler, &mut socket, &mut pool) {
            AssembleStep::Complete(frame) => assert_eq!(frame.payload(), b""),
            other => panic!("expected Complete, got {:?}", other),
        }
    }

    #[test]
    fn test_would_block_preserves_progress() {
        let mut assembler = ReceiveAssembler::new();
        let mut pool = FramePool::default();
        let bytes = wire(b"resume");

        // First opportunity: half the header, then the OS runs dry.
        let mut socket = ScriptedSocket::new(vec![
            Step::Chunk(bytes[..1].to_vec()),
            Step::WouldBlock,
        ]);
        assert!(matches!(
            poll(&mut assembler, &mut socket, &mut pool),
            AssembleStep::Pending
        ));
        assert!(assembler.has_partial());

        // Nothing available at all: state must not change.
        let mut socket = ScriptedSocket::new(vec![Step::WouldBlock]);
        assert!(matches!(
            poll(&mut assembler, &mut socket, &mut pool),
            AssembleStep::Pending
        ));

        // The rest arrives; assembly continues from the saved cursor.
        let mut socket = ScriptedSocket::new(vec![Step::Chunk(bytes[1..].to_vec())]);
        match poll(&mut assembler, &mut socket, &mut pool) {
            AssembleStep::Complete(frame) => assert_eq!(frame.payload(), b"resume"),
            other => panic!("expected Complete, got {:?}", other),
        }
        assert!(!assembler.has_partial());
    }

    #[test]
    fn test_would_block_mid_body() {
        let mut assembler = ReceiveAssembler::new();
        let mut pool = FramePool::default();
        let bytes = wire(b"abcdef");

        let mut socket = ScriptedSocket::new(vec![
            Step::Chunk(bytes[..5].to_vec()),
            Step::WouldBlock,
        ]);
        assert!(matches!(
            poll(&mut assembler, &mut socket, &mut pool),
            AssembleStep::Pending
        ));

        let mut socket = ScriptedSocket::new(vec![Step::Chunk(bytes[5..].to_vec())]);
        match poll(&mut assembler, &mut socket, &mut pool) {
            AssembleStep::Complete(frame) => assert_eq!(frame.payload(), b"abcdef"),
            other => panic!("expected Complete, got {:?}", other),
        }
    }

    #[test]
    fn test_back_to_back_frames() {
        let mut assembler = ReceiveAssembler::new();
        let mut pool = FramePool::default();
        let mut bytes = wire(b"first");
        bytes.extend_from_slice(&wire(b"second"));
        let mut socket = ScriptedSocket::new(vec![Step::Chunk(bytes)]);

        for expected in [&b"first"[..], &b"second"[..]] {
            match poll(&mut assembler, &mut socket, &mut pool) {
                AssembleStep::Complete(frame) => assert_eq!(frame.payload(), expected),
                other => panic!("expected Complete, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_oversize_declaration_rejected() {
        let mut assembler = ReceiveAssembler::new();
        let mut pool = FramePool::default();
        // Declared length 2000 under a 1024 bound, with plenty of payload
        // bytes behind it that must never be delivered.
        let mut bytes = 2000u16.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0xAA; 64]);
        let mut socket = ScriptedSocket::new(vec![Step::Chunk(bytes)]);

        match poll(&mut assembler, &mut socket, &mut pool) {
            AssembleStep::Violation(WireViolation::Oversize { declared, max }) => {
                assert_eq!(declared, 2000);
                assert_eq!(max, 1024);
            }
            other => panic!("expected Violation, got {:?}", other),
        }
        assert!(!assembler.has_partial());
    }

    #[test]
    fn test_undersize_declaration_rejected() {
        let mut assembler = ReceiveAssembler::new();
        let mut pool = FramePool::default();
        let mut socket = ScriptedSocket::new(vec![Step::Chunk(1u16.to_le_bytes().to_vec())]);

        assert!(matches!(
            poll(&mut assembler, &mut socket, &mut pool),
            AssembleStep::Violation(WireViolation::Undersize { declared: 1, prefix: 2 })
        ));
    }

    #[test]
    fn test_orderly_close_reported() {
        let mut assembler = ReceiveAssembler::new();
        let mut pool = FramePool::default();
        let mut socket = ScriptedSocket::new(vec![Step::Eof]);

        assert!(matches!(
            poll(&mut assembler, &mut socket, &mut pool),
            AssembleStep::PeerClosed
        ));
    }

    #[test]
    fn test_hard_error_reported() {
        let mut assembler = ReceiveAssembler::new();
        let mut pool = FramePool::default();
        let mut socket = ScriptedSocket::new(vec![Step::Fail(io::ErrorKind::ConnectionReset)]);

        match poll(&mut assembler, &mut socket, &mut pool) {
            AssembleStep::Fatal(err) => assert_eq!(err.kind(), io::ErrorKind::ConnectionReset),
            other => panic!("expected Fatal, got {:?}", other),
        }
    }

    #[test]
    fn test_max_size_frame_round_trip() {
        let mut assembler = ReceiveAssembler::new();
        let mut pool = FramePool::default();
        let payload = vec![0x5A; 1022]; // fills the 1024 bound exactly
        let mut socket = ScriptedSocket::new(vec![Step::Chunk(wire(&payload))]);

        match poll(&mut assembler, &mut socket, &mut pool) {
            AssembleStep::Complete(frame) => {
                assert_eq!(frame.declared_len(), 1024);
                assert_eq!(frame.payload(), payload.as_slice());
            }
            other => panic!("expected Complete, got {:?}", other),
        }
    }

    #[test]
    fn test_reclaim_partial_returns_buffer() {
        let mut assembler = ReceiveAssembler::new();
        let mut pool = FramePool::new(1024, 8);
        let mut socket = ScriptedSocket::new(vec![Step::Chunk(vec![9]), Step::WouldBlock]);

        assert!(matches!(
            poll(&mut assembler, &mut socket, &mut pool),
            AssembleStep::Pending
        ));
        assert!(assembler.has_partial());
        assert_eq!(pool.available(), 0);

        assembler.reclaim_partial(&mut pool);
        assert!(!assembler.has_partial());
        assert_eq!(pool.available(), 1);
    }
}
