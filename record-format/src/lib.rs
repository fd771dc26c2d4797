//! On-disk file format and in-memory engine for the employee record
//! database.
//!
//! The file is a 12-byte [`Header`] followed by `count` fixed-size
//! [`Record`]s, all big-endian. [`RecordFile`] handles file-level
//! construction and bulk load/save; the [`engine`] free functions mutate the
//! in-memory `(Header, Vec<Record>)` pair that the file component loads and
//! persists. Neither module ever locks anything: the caller (the protocol
//! server's single-threaded event loop, or the batch CLI) serialises all
//! access on its own.

mod engine;
mod error;
mod file;
mod header;
mod record;

pub use engine::{add, list, remove_last};
pub use error::{EngineError, FileError};
pub use file::RecordFile;
pub use header::{Header, HEADER_SIZE, MAGIC, PROTOCOL_VERSION};
pub use record::{Record, ADDRESS_LEN, NAME_LEN, RECORD_SIZE};
