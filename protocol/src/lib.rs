//! Wire framing, connection buffer/FSM, and message kinds shared by the
//! server and any client that speaks the employee record protocol.
//!
//! A message is a 6-byte header (4-byte big-endian kind, 2-byte big-endian
//! body length) followed by the body. [`frame::encode`]/[`frame::try_decode`]
//! handle that layer; [`connection::ConnectionBuffer`] accumulates socket
//! reads until a whole frame is available; [`connection::FsmState`] tracks
//! where a connection sits in the handshake.

mod connection;
mod frame;
mod io;
mod kind;

/// Fixed body size of an `AddReq`: the NUL-padded add-string.
pub const ADD_REQ_BODY_LEN: usize = 1024;

/// Fixed body size of a `HelloReq`: the client's protocol version.
pub const HELLO_REQ_BODY_LEN: usize = 2;

pub use connection::{ConnectionBuffer, FsmState};
pub use frame::{encode, try_decode, DecodeResult, FrameError, FRAME_HEADER_LEN, MAX_FRAME_LEN};
pub use io::{read_all, write_all};
pub use kind::{MessageKind, MESSAGE_KIND_MAX};
