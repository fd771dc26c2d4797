//! Error taxonomy for the on-disk file format and the in-memory engine.

use derive_more::{Display, Error, From};

/// Errors from [`crate::file::RecordFile`] construction and I/O.
#[derive(Debug, Display, Error, From)]
pub enum FileError {
    #[display("database file already exists")]
    AlreadyExists,
    #[display("bad magic number in file header")]
    BadMagic,
    #[display("unsupported file format version")]
    BadVersion,
    #[display("file header is truncated")]
    TruncatedHeader,
    #[display("stored filesize does not match actual file length: stored {stored}, actual {actual}")]
    SizeMismatch { stored: u64, actual: u64 },
    #[display("file is shorter than the declared record count")]
    ShortRead,
    #[display("I/O error: {_0}")]
    #[from]
    Io(#[error(source)] std::io::Error),
}

/// Errors from [`crate::engine`] operations on the in-memory record list.
#[derive(Debug, Display, Error, PartialEq, Eq, Clone)]
pub enum EngineError {
    #[display("add-string is malformed: {_0}")]
    MalformedAddString(String),
    #[display("record count would overflow 16 bits")]
    CountOverflow,
    #[display("allocation failed")]
    ResourceExhausted,
    #[display("no records to remove")]
    Empty,
}
