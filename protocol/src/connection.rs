//! Per-connection protocol state machine and read buffer.

use crate::frame::MAX_FRAME_LEN;

/// Where a connection sits in the protocol handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsmState {
    /// Waiting for a `HelloReq` carrying a matching protocol version.
    AwaitingHello,
    /// Handshake complete; serving `ListReq`/`AddReq`/`DelReq`.
    Ready,
    /// The session is over; the event loop should drop the connection.
    Closed,
}

/// Accumulates bytes read off a socket until a whole frame is buffered, then
/// hands it to the caller and compacts the leftover tail forward.
///
/// Sized to hold one [`MAX_FRAME_LEN`] frame; `fill` refuses to read past
/// that so a connection that never produces a complete frame cannot grow
/// the buffer without bound.
#[derive(Debug)]
pub struct ConnectionBuffer {
    buf: Vec<u8>,
    filled: usize,
}

impl ConnectionBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; MAX_FRAME_LEN],
            filled: 0,
        }
    }

    /// The portion of the buffer holding bytes read so far but not yet
    /// consumed as a decoded frame.
    #[must_use]
    pub fn filled(&self) -> &[u8] {
        &self.buf[..self.filled]
    }

    /// The unused tail available for the next read.
    fn free_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.filled..]
    }

    /// `true` once the buffer has no room left for another read, meaning
    /// whatever is buffered can never become a valid frame.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.filled == self.buf.len()
    }

    /// Record that `n` more bytes were read into the free tail.
    pub fn advance(&mut self, n: usize) {
        self.filled += n;
        debug_assert!(self.filled <= self.buf.len());
    }

    /// Read once from `source` into the free tail, returning the number of
    /// bytes read (0 means the free tail is already empty).
    pub fn fill_once(&mut self, source: &mut impl std::io::Read) -> std::io::Result<usize> {
        if self.is_full() {
            return Ok(0);
        }
        let n = source.read(self.free_mut())?;
        self.advance(n);
        Ok(n)
    }

    /// Drop the first `consumed` bytes (one decoded frame) and shift
    /// whatever remains to the front of the buffer.
    pub fn consume(&mut self, consumed: usize) {
        debug_assert!(consumed <= self.filled);
        self.buf.copy_within(consumed..self.filled, 0);
        self.filled -= consumed;
    }
}

impl Default for ConnectionBuffer {
    fn default() -> Self {
        Self::new()
    }
}
