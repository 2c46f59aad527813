use crate::constants::{DEFAULT_MAX_FRAME_SIZE, DEFAULT_POOL_BUFFERS};

/// A simple allocator that recycles frame-sized buffers.
///
/// Every connection owns one pool, so buffers never outlive the
/// connection they served. Completed outbound frames hand their buffer
/// back here instead of hitting the allocator on every queue/dequeue
/// cycle, which keeps repeated connect/disconnect traffic allocation-safe.
#[derive(Debug)]
pub struct FramePool {
    /// Recycled buffers ready for reuse
    pool: Vec<Vec<u8>>,
    /// Capacity each fresh buffer is created with
    buffer_size: usize,
    /// Maximum buffers kept for reuse
    max_pooled: usize,
}

impl FramePool {
    /// Creates a pool producing buffers of `buffer_size` capacity.
    pub fn new(buffer_size: usize, max_pooled: usize) -> Self {
        Self { pool: Vec::with_capacity(max_pooled), buffer_size, max_pooled }
    }

    /// Hands out a recycled buffer, or allocates a fresh one.
    pub fn acquire(&mut self) -> Vec<u8> {
        self.pool.pop().unwrap_or_else(|| Vec::with_capacity(self.buffer_size))
    }

    /// Returns a buffer for reuse. Buffers beyond the pool bound are dropped.
    pub fn release(&mut self, mut buffer: Vec<u8>) {
        if self.pool.len() < self.max_pooled {
            buffer.clear();
            self.pool.push(buffer);
        }
    }

    /// Returns the number of buffers currently available for reuse.
    pub fn available(&self) -> usize {
        self.pool.len()
    }

    /// Drops all recycled buffers.
    pub fn clear(&mut self) {
        self.pool.clear();
    }
}

impl Default for FramePool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_SIZE, DEFAULT_POOL_BUFFERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_release_cycle() {
        let mut pool = FramePool::new(100, 10);

        let buf = pool.acquire();
        assert!(buf.capacity() >= 100);
        assert_eq!(pool.available(), 0);

        pool.release(buf);
        assert_eq!(pool.available(), 1);

        // The recycled buffer is handed out again.
        let buf = pool.acquire();
        assert_eq!(pool.available(), 0);
        drop(buf);
    }

    #[test]
    fn test_released_buffers_come_back_empty() {
        let mut pool = FramePool::new(100, 10);

        let mut buf = pool.acquire();
        buf.extend_from_slice(&[1, 2, 3]);
        pool.release(buf);

        let buf = pool.acquire();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_pool_bound_respected() {
        let mut pool = FramePool::new(100, 2);

        for _ in 0..5 {
            pool.release(Vec::new());
        }

        assert_eq!(pool.available(), 2);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut pool = FramePool::default();

        for _ in 0..4 {
            pool.release(Vec::new());
        }
        assert_eq!(pool.available(), 4);

        pool.clear();
        assert_eq!(pool.available(), 0);
    }
}
