use byteorder::{ByteOrder, LittleEndian};
use framelink_core::{
    config::PrefixWidth,
    error::{ErrorKind, Result, WireViolation},
};

/// A bounded, length-prefixed message buffer with a transfer cursor.
///
/// `pos` marks bytes already transmitted (outbound) or already received
/// (inbound); `size` is the declared total length including the prefix,
/// so `0 <= pos <= size <= capacity` once the size is known. The buffer
/// never grows after construction, so slices handed to the socket stay
/// valid across partial transfers.
#[derive(Debug)]
pub struct Frame {
    buffer: Vec<u8>,
    prefix: PrefixWidth,
    /// Declared total length; zero on an inbound frame until the prefix
    /// has been decoded.
    size: usize,
    pos: usize,
}

impl Frame {
    /// Builds a sealed outbound frame carrying `payload`.
    ///
    /// The length prefix is serialized here, exactly once; the frame is
    /// eligible for transmission as soon as it is queued and is never
    /// re-finalized. Fails when the payload cannot fit under
    /// `max_frame_size`.
    pub fn outbound(
        mut buffer: Vec<u8>,
        prefix: PrefixWidth,
        max_frame_size: usize,
        payload: &[u8],
    ) -> Result<Self> {
        let width = prefix.width();
        let size = width + payload.len();
        if size > max_frame_size {
            return Err(ErrorKind::PayloadTooLarge {
                payload: payload.len(),
                max: max_frame_size - width,
            });
        }
        buffer.clear();
        buffer.resize(size, 0);
        encode_length(&mut buffer[..width], prefix, size);
        buffer[width..].copy_from_slice(payload);
        Ok(Self { buffer, prefix, size, pos: 0 })
    }

    /// Starts an empty inbound frame that will fill from the wire.
    ///
    /// `capacity` is the frame bound; it is fixed here and the buffer is
    /// never reallocated mid-transfer.
    pub fn inbound(mut buffer: Vec<u8>, prefix: PrefixWidth, capacity: usize) -> Self {
        buffer.clear();
        buffer.resize(capacity, 0);
        Self { buffer, prefix, size: 0, pos: 0 }
    }

    /// True while the length prefix has not been fully received.
    pub fn awaiting_header(&self) -> bool {
        self.pos < self.prefix.width()
    }

    /// True once the declared size has been decoded.
    pub fn header_decoded(&self) -> bool {
        self.size != 0
    }

    /// Decodes the received length prefix into the declared size.
    ///
    /// Rejects declarations the wire contract forbids: shorter than the
    /// prefix itself (which would imply a negative payload), or beyond
    /// the frame bound. Callers treat both identically.
    pub fn decode_length(
        &mut self,
        max_frame_size: usize,
    ) -> std::result::Result<(), WireViolation> {
        let width = self.prefix.width();
        let declared = decode_length(&self.buffer[..width], self.prefix);
        if declared < width {
            return Err(WireViolation::Undersize { declared, prefix: width });
        }
        if declared > max_frame_size {
            return Err(WireViolation::Oversize { declared, max: max_frame_size });
        }
        self.size = declared;
        Ok(())
    }

    /// Region the next read should fill: the rest of the header while it
    /// is incomplete, then the rest of the body.
    pub fn receive_window(&mut self) -> &mut [u8] {
        let end = if self.awaiting_header() { self.prefix.width() } else { self.size };
        &mut self.buffer[self.pos..end]
    }

    /// Unsent span of a sealed outbound frame.
    pub fn remaining_to_send(&self) -> &[u8] {
        &self.buffer[self.pos..self.size]
    }

    /// Advances the cursor by `n` transferred bytes.
    pub fn advance(&mut self, n: usize) {
        debug_assert!(self.pos + n <= self.buffer.len());
        self.pos += n;
    }

    /// True once every byte of an outbound frame has been written.
    pub fn is_fully_sent(&self) -> bool {
        self.pos == self.size
    }

    /// True once an inbound frame has received its declared length.
    pub fn is_complete(&self) -> bool {
        self.header_decoded() && self.pos == self.size
    }

    /// Rewinds the cursor to the start of the payload before hand-off.
    pub fn rewind_to_payload(&mut self) {
        self.pos = self.prefix.width();
    }

    /// The payload bytes, prefix excluded.
    pub fn payload(&self) -> &[u8] {
        &self.buffer[self.prefix.width()..self.size]
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Declared total frame length, prefix included.
    pub fn declared_len(&self) -> usize {
        self.size
    }

    /// The serialized wire bytes of a sealed frame.
    pub fn as_wire_bytes(&self) -> &[u8] {
        &self.buffer[..self.size]
    }

    /// Consumes the frame, releasing its buffer for pooling.
    pub fn into_buffer(self) -> Vec<u8> {
        self.buffer
    }
}

fn encode_length(dst: &mut [u8], prefix: PrefixWidth, size: usize) {
    match prefix {
        PrefixWidth::U16 => LittleEndian::write_u16(dst, size as u16),
        PrefixWidth::U32 => LittleEndian::write_u32(dst, size as u32),
    }
}

fn decode_length(src: &[u8], prefix: PrefixWidth) -> usize {
    match prefix {
        PrefixWidth::U16 => LittleEndian::read_u16(src) as usize,
        PrefixWidth::U32 => LittleEndian::read_u32(src) as usize,
    }
}
