//! The 12-octet file header: magic, format version, record count, file size.

use deku::prelude::*;

/// File magic: ASCII `"DALL"` read as a big-endian `u32`.
pub const MAGIC: u32 = 0x4C4C_4144;

/// On-disk / wire protocol version. A header or hello with any other value
/// is rejected.
pub const PROTOCOL_VERSION: u16 = 1;

/// Size in bytes of the encoded [`Header`].
pub const HEADER_SIZE: usize = 12;

/// Fixed 12-byte file header, big-endian on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
#[deku(endian = "big")]
pub struct Header {
    pub magic: u32,
    pub version: u16,
    pub count: u16,
    pub filesize: u32,
}

impl Header {
    /// A fresh header for a newly created, empty database file.
    #[must_use]
    pub fn new_empty() -> Self {
        Self {
            magic: MAGIC,
            version: PROTOCOL_VERSION,
            count: 0,
            #[allow(clippy::cast_possible_truncation)] // HEADER_SIZE is a small constant
            filesize: HEADER_SIZE as u32,
        }
    }

    /// The filesize a header with `count` records must report.
    #[must_use]
    pub fn expected_filesize(count: u16) -> u64 {
        HEADER_SIZE as u64 + u64::from(count) * crate::record::RECORD_SIZE as u64
    }

    #[must_use]
    pub fn to_bytes(self) -> Vec<u8> {
        // Fixed-layout struct of plain integers; encoding cannot fail.
        DekuContainerWrite::to_bytes(&self).expect("header encoding is infallible")
    }
}
