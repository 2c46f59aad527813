use std::default::Default;

use crate::{
    constants::{DEFAULT_MAX_FRAME_SIZE, DEFAULT_POOL_BUFFERS},
    error::{ErrorKind, Result},
};

/// Width of the length prefix that starts every frame on the wire.
///
/// The prefix declares the total frame length including itself, so its
/// width also bounds the largest frame the profile can express. Both ends
/// of a connection must use the same width; it is never negotiated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrefixWidth {
    /// Two-byte little-endian prefix; frames up to 65535 bytes.
    U16,
    /// Four-byte little-endian prefix for oversized profiles.
    U32,
}

impl PrefixWidth {
    /// Returns the prefix width in bytes.
    pub const fn width(self) -> usize {
        match self {
            PrefixWidth::U16 => 2,
            PrefixWidth::U32 => 4,
        }
    }

    /// Returns the largest total frame length this prefix can declare.
    pub const fn max_encodable(self) -> usize {
        match self {
            PrefixWidth::U16 => u16::MAX as usize,
            PrefixWidth::U32 => u32::MAX as usize,
        }
    }
}

#[derive(Clone, Debug)]
/// Configuration options to tune transport behavior.
pub struct Config {
    /// Width of the length prefix.
    pub prefix_width: PrefixWidth,
    /// Max total frame size in bytes, length prefix included. Inbound
    /// declarations above this bound are treated as a protocol violation.
    pub max_frame_size: usize,
    /// Max recycled frame buffers kept in a connection's pool.
    pub pool_buffers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix_width: PrefixWidth::U16,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            pool_buffers: DEFAULT_POOL_BUFFERS,
        }
    }
}

impl Config {
    /// Checks that the frame bound is expressible by the chosen prefix.
    pub fn validate(&self) -> Result<()> {
        if self.max_frame_size < self.prefix_width.width() {
            return Err(ErrorKind::InvalidConfig(
                "max_frame_size is smaller than the length prefix itself",
            ));
        }
        if self.max_frame_size > self.prefix_width.max_encodable() {
            return Err(ErrorKind::InvalidConfig(
                "max_frame_size cannot be declared by the chosen prefix width",
            ));
        }
        Ok(())
    }
}
