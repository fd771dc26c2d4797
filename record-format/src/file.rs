//! On-disk record file: header validation, bulk load, atomic-ish save.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use log::{debug, info};

use crate::error::FileError;
use crate::header::{Header, HEADER_SIZE, MAGIC, PROTOCOL_VERSION};
use crate::record::{Record, RECORD_SIZE};

/// A handle to an open database file. Only consulted at startup (create or
/// open + `load_all`) and shutdown (`save_all`); the event loop mutates the
/// in-memory `(Header, Vec<Record>)` pair directly between those points.
pub struct RecordFile {
    file: File,
}

impl RecordFile {
    /// Create a new, empty database file. Fails with
    /// [`FileError::AlreadyExists`] if `path` already exists.
    pub fn create(path: impl AsRef<Path>) -> Result<(Self, Header), FileError> {
        let path = path.as_ref();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    FileError::AlreadyExists
                } else {
                    FileError::Io(e)
                }
            })?;

        let header = Header::new_empty();
        file.write_all(&header.to_bytes())?;
        file.flush()?;
        info!("created new database file at {}", path.display());
        Ok((Self { file }, header))
    }

    /// Open an existing database file and validate its header.
    pub fn open(path: impl AsRef<Path>) -> Result<(Self, Header), FileError> {
        let path = path.as_ref();
        let mut file = OpenOptions::new().read(true).write(true).open(path)?;

        let actual_len = file.metadata()?.len();
        let mut buf = [0u8; HEADER_SIZE];
        let read = read_fully(&mut file, &mut buf)?;
        if read < HEADER_SIZE {
            return Err(FileError::TruncatedHeader);
        }

        let header = Header::try_from(&buf[..]).map_err(|_| FileError::TruncatedHeader)?;
        if header.magic != MAGIC {
            return Err(FileError::BadMagic);
        }
        if header.version != PROTOCOL_VERSION {
            return Err(FileError::BadVersion);
        }
        let expected = Header::expected_filesize(header.count);
        if u64::from(header.filesize) != expected || actual_len != expected {
            return Err(FileError::SizeMismatch {
                stored: u64::from(header.filesize),
                actual: actual_len,
            });
        }

        info!(
            "opened database file at {} ({} records)",
            path.display(),
            header.count
        );
        Ok((Self { file }, header))
    }

    /// Read `count` contiguous records from just past the header.
    pub fn load_all(&mut self, count: u16) -> Result<Vec<Record>, FileError> {
        self.file.seek(SeekFrom::Start(HEADER_SIZE as u64))?;
        let mut records = Vec::with_capacity(usize::from(count));
        let mut buf = vec![0u8; RECORD_SIZE];
        for _ in 0..count {
            let read = read_fully(&mut self.file, &mut buf)?;
            if read < RECORD_SIZE {
                return Err(FileError::ShortRead);
            }
            let record = Record::try_from(buf.as_slice()).map_err(|_| FileError::ShortRead)?;
            records.push(record);
        }
        debug!("loaded {} records", records.len());
        Ok(records)
    }

    /// Rewrite the whole file: header followed by every record, then
    /// truncate to the exact expected length. Called once, at shutdown.
    pub fn save_all(&mut self, header: &Header, records: &[Record]) -> Result<(), FileError> {
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&header.to_bytes())?;
        for record in records {
            self.file.write_all(&record.to_bytes())?;
        }
        self.file.flush()?;
        let expected_len = Header::expected_filesize(header.count);
        self.file.set_len(expected_len)?;
        info!("saved {} records to disk", records.len());
        Ok(())
    }
}

/// Like `Read::read_exact`, but returns the number of bytes actually read on
/// an early EOF instead of erroring, so callers can distinguish a clean EOF
/// (zero bytes) from a mid-record truncation.
fn read_fully(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn create_then_open_roundtrip() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("employees.dat");

        let (mut file, header) = RecordFile::create(&path).expect("create");
        assert_eq!(header.count, 0);

        let records = vec![Record::new("Alice", "1 Main St", 40)];
        let mut header = header;
        header.count = 1;
        header.filesize = Header::expected_filesize(1) as u32;
        file.save_all(&header, &records).expect("save");
        drop(file);

        let (mut file, header) = RecordFile::open(&path).expect("open");
        assert_eq!(header.count, 1);
        let loaded = file.load_all(header.count).expect("load");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name_str(), "Alice");
    }

    #[test]
    fn create_fails_when_file_exists() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("employees.dat");
        RecordFile::create(&path).expect("first create");
        let err = RecordFile::create(&path).unwrap_err();
        assert!(matches!(err, FileError::AlreadyExists));
    }

    #[test]
    fn open_rejects_bad_magic() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("employees.dat");
        std::fs::write(&path, [0u8; HEADER_SIZE]).expect("write garbage");
        let err = RecordFile::open(&path).unwrap_err();
        assert!(matches!(err, FileError::BadMagic));
    }

    #[test]
    fn open_rejects_size_mismatch() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("employees.dat");
        let (_file, mut header) = RecordFile::create(&path).expect("create");
        header.count = 5; // lie about the record count
        std::fs::write(&path, header.to_bytes()).expect("overwrite header");
        let err = RecordFile::open(&path).unwrap_err();
        assert!(matches!(err, FileError::SizeMismatch { .. }));
    }
}
