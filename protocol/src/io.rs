//! Retry-on-interrupt I/O helpers used when a frame must be written or read
//! to completion even though the underlying socket may return short writes,
//! be interrupted by a signal, or (for a non-blocking socket, such as the
//! server's mio connections) transiently report `WouldBlock` while the
//! kernel buffer drains.

use std::io::{self, Read, Write};
use std::time::Duration;

/// How long to sleep between retries after a `WouldBlock`. Mirrors this
/// codebase's own retry-on-`WouldBlock` pattern for a non-blocking socket.
const WOULD_BLOCK_RETRY_DELAY: Duration = Duration::from_millis(10);

/// Write all of `buf`, retrying on `ErrorKind::Interrupted` and
/// `ErrorKind::WouldBlock`, and failing with `WriteZero` if the peer closes
/// the socket mid-message.
pub fn write_all(writer: &mut impl Write, mut buf: &[u8]) -> io::Result<()> {
    while !buf.is_empty() {
        match writer.write(buf) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "peer closed the socket mid-message",
                ))
            }
            Ok(n) => buf = &buf[n..],
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                std::thread::sleep(WOULD_BLOCK_RETRY_DELAY);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Read until `buf` is completely filled, retrying on
/// `ErrorKind::Interrupted` and `ErrorKind::WouldBlock`, and failing with
/// `UnexpectedEof` if the peer closes the socket mid-message.
pub fn read_all(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "peer closed the socket mid-message",
                ))
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                std::thread::sleep(WOULD_BLOCK_RETRY_DELAY);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn write_all_writes_everything() {
        let mut out = Vec::new();
        write_all(&mut out, b"hello").expect("write");
        assert_eq!(out, b"hello");
    }

    #[test]
    fn read_all_fills_buffer() {
        let mut cursor = Cursor::new(b"hello world".to_vec());
        let mut buf = [0u8; 5];
        read_all(&mut cursor, &mut buf).expect("read");
        assert_eq!(&buf, b"hello");
    }

    #[test]
    fn read_all_fails_on_short_source() {
        let mut cursor = Cursor::new(b"hi".to_vec());
        let mut buf = [0u8; 5];
        let err = read_all(&mut cursor, &mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    /// A writer that reports `WouldBlock` a fixed number of times before
    /// accepting bytes, standing in for a non-blocking socket whose kernel
    /// send buffer is temporarily full.
    struct FlakyWriter {
        blocks_remaining: u32,
        written: Vec<u8>,
    }

    impl Write for FlakyWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.blocks_remaining > 0 {
                self.blocks_remaining -= 1;
                return Err(io::Error::new(io::ErrorKind::WouldBlock, "would block"));
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_all_retries_past_would_block() {
        let mut writer = FlakyWriter {
            blocks_remaining: 3,
            written: Vec::new(),
        };
        write_all(&mut writer, b"reply").expect("write should eventually succeed");
        assert_eq!(writer.written, b"reply");
    }
}
