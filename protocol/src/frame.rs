//! The 6-octet frame header (`type` + `len`) and encode/decode operations.

use derive_more::{Display, Error};
use log::{debug, warn};

use crate::kind::MessageKind;

/// Size in bytes of the frame header: 4-byte kind + 2-byte length.
pub const FRAME_HEADER_LEN: usize = 6;

/// Largest a whole frame (header + body) may be.
pub const MAX_FRAME_LEN: usize = 4096;

/// Errors recognized while decoding a frame header.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    #[display("unknown message kind {_0}")]
    UnknownKind(u32),
    #[display("frame length {total} exceeds maximum {max}")]
    TooLarge { total: usize, max: usize },
}

/// Result of attempting to decode one frame from the front of a buffer.
#[derive(Debug, PartialEq, Eq)]
pub enum DecodeResult<'a> {
    /// Not enough bytes buffered yet to know the frame's full size.
    Incomplete,
    /// A complete frame, along with how many bytes of the input it consumed.
    Frame {
        kind: MessageKind,
        body: &'a [u8],
        consumed: usize,
    },
    /// The buffered header is already invalid, independent of what follows.
    Malformed(FrameError),
}

/// Encode `kind` and `body` into one frame: 6-byte header followed by body.
///
/// # Panics
///
/// Panics if `body.len() + FRAME_HEADER_LEN` exceeds [`MAX_FRAME_LEN`] or
/// `body.len()` does not fit in a `u16` — callers only ever encode
/// fixed-size, spec-bounded bodies, so this is a programmer error.
#[must_use]
pub fn encode(kind: MessageKind, body: &[u8]) -> Vec<u8> {
    assert!(
        FRAME_HEADER_LEN + body.len() <= MAX_FRAME_LEN,
        "encoded frame would exceed MAX_FRAME_LEN"
    );
    let len = u16::try_from(body.len()).expect("body length fits in u16");

    let mut out = Vec::with_capacity(FRAME_HEADER_LEN + body.len());
    out.extend_from_slice(&(kind as u32).to_be_bytes());
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(body);
    out
}

/// Attempt to decode one frame from the front of `buf`, which holds
/// whatever bytes have been read into the connection buffer so far.
///
/// Requires at least [`FRAME_HEADER_LEN`] bytes to make any determination
/// other than [`DecodeResult::Incomplete`].
#[must_use]
pub fn try_decode(buf: &[u8]) -> DecodeResult<'_> {
    if buf.len() < FRAME_HEADER_LEN {
        return DecodeResult::Incomplete;
    }

    let kind_raw = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let body_len = usize::from(u16::from_be_bytes([buf[4], buf[5]]));
    let total = FRAME_HEADER_LEN + body_len;

    if total > MAX_FRAME_LEN {
        warn!("frame header declares length {total}, exceeding max {MAX_FRAME_LEN}");
        return DecodeResult::Malformed(FrameError::TooLarge {
            total,
            max: MAX_FRAME_LEN,
        });
    }

    let Some(kind) = MessageKind::from_u32(kind_raw) else {
        warn!("frame header carries unknown message kind {kind_raw}");
        return DecodeResult::Malformed(FrameError::UnknownKind(kind_raw));
    };

    if buf.len() < total {
        return DecodeResult::Incomplete;
    }

    debug!("decoded frame kind={kind:?} body_len={body_len}");
    DecodeResult::Frame {
        kind,
        body: &buf[FRAME_HEADER_LEN..total],
        consumed: total,
    }
}
