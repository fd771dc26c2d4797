//! A single employee record: fixed-width name, fixed-width address, hours.

use deku::prelude::*;

/// Width in bytes of the `name` field, including its trailing NUL.
pub const NAME_LEN: usize = 256;
/// Width in bytes of the `address` field, including its trailing NUL.
pub const ADDRESS_LEN: usize = 256;
/// Size in bytes of one encoded [`Record`].
pub const RECORD_SIZE: usize = NAME_LEN + ADDRESS_LEN + 4;

/// One fixed-size employee record, big-endian on disk.
///
/// `name` and `address` are NUL-padded byte arrays; `hours` is a plain
/// `u32`. There is no in-band length prefix for the string fields — the
/// first NUL byte terminates them.
#[derive(Clone, PartialEq, Eq, DekuRead, DekuWrite)]
#[deku(endian = "big")]
pub struct Record {
    pub name: [u8; NAME_LEN],
    pub address: [u8; ADDRESS_LEN],
    pub hours: u32,
}

impl std::fmt::Debug for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Record")
            .field("name", &self.name_str())
            .field("address", &self.address_str())
            .field("hours", &self.hours)
            .finish()
    }
}

/// Copy `src` into `dst`, truncating to `dst.len() - 1` bytes and always
/// leaving a trailing NUL. This is the documented truncation policy for
/// over-long `name`/`address` input.
fn write_nul_terminated(dst: &mut [u8], src: &str) {
    dst.fill(0);
    let max = dst.len() - 1;
    let bytes = src.as_bytes();
    let copy_len = bytes.len().min(max);
    dst[..copy_len].copy_from_slice(&bytes[..copy_len]);
}

fn read_nul_terminated(src: &[u8]) -> &str {
    let end = src.iter().position(|&b| b == 0).unwrap_or(src.len());
    std::str::from_utf8(&src[..end]).unwrap_or("<invalid utf-8>")
}

impl Record {
    /// Build a record from already-validated `name`/`address`/`hours`,
    /// truncating the string fields per policy (see [`write_nul_terminated`]).
    #[must_use]
    pub fn new(name: &str, address: &str, hours: u32) -> Self {
        let mut record = Self {
            name: [0; NAME_LEN],
            address: [0; ADDRESS_LEN],
            hours,
        };
        write_nul_terminated(&mut record.name, name);
        write_nul_terminated(&mut record.address, address);
        record
    }

    #[must_use]
    pub fn name_str(&self) -> &str {
        read_nul_terminated(&self.name)
    }

    #[must_use]
    pub fn address_str(&self) -> &str {
        read_nul_terminated(&self.address)
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        // Fixed-layout struct of plain integers and byte arrays; infallible.
        DekuContainerWrite::to_bytes(self).expect("record encoding is infallible")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_overlong_fields() {
        let long_name = "x".repeat(300);
        let record = Record::new(&long_name, "short", 10);
        assert_eq!(record.name_str().len(), 255);
        assert_eq!(record.name[255], 0);
    }

    #[test]
    fn short_fields_are_nul_terminated() {
        let record = Record::new("Alice", "1 Main St", 40);
        assert_eq!(record.name_str(), "Alice");
        assert_eq!(record.address_str(), "1 Main St");
        assert_eq!(record.name[5], 0);
    }

    #[test]
    fn encode_decode_roundtrip() {
        let record = Record::new("Bob", "2 Elm St", 37);
        let bytes = record.to_bytes();
        assert_eq!(bytes.len(), RECORD_SIZE);
        let decoded = Record::try_from(bytes.as_slice()).expect("should decode");
        assert_eq!(decoded.name_str(), "Bob");
        assert_eq!(decoded.address_str(), "2 Elm St");
        assert_eq!(decoded.hours, 37);
    }
}
