//! Message kinds and their fixed request body sizes.

/// One more than the highest valid [`MessageKind`] discriminant. A decoded
/// `kind` value at or above this is malformed.
pub const MESSAGE_KIND_MAX: u32 = 9;

/// The nine message kinds carried in a frame's 4-byte `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum MessageKind {
    HelloReq = 0,
    HelloResp = 1,
    ListReq = 2,
    ListResp = 3,
    AddReq = 4,
    AddResp = 5,
    DelReq = 6,
    DelResp = 7,
    Error = 8,
}

impl MessageKind {
    /// Decode a raw `u32` discriminant. Returns `None` for any value at or
    /// above [`MESSAGE_KIND_MAX`].
    #[must_use]
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::HelloReq),
            1 => Some(Self::HelloResp),
            2 => Some(Self::ListReq),
            3 => Some(Self::ListResp),
            4 => Some(Self::AddReq),
            5 => Some(Self::AddResp),
            6 => Some(Self::DelReq),
            7 => Some(Self::DelResp),
            8 => Some(Self::Error),
            _ => None,
        }
    }

    /// The fixed body size a well-formed request of this kind must have, or
    /// `None` if this kind is never sent as a request (a response kind, or
    /// `Error`).
    #[must_use]
    pub fn request_body_len(self) -> Option<usize> {
        match self {
            Self::HelloReq => Some(2),
            Self::AddReq => Some(super::ADD_REQ_BODY_LEN),
            Self::ListReq | Self::DelReq => Some(0),
            Self::HelloResp | Self::ListResp | Self::AddResp | Self::DelResp | Self::Error => None,
        }
    }
}
