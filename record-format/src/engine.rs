//! In-memory mutation of the `(Header, Vec<Record>)` pair. Never touches the
//! file and never locks anything — the caller (the event loop) serialises
//! all access.

use crate::error::EngineError;
use crate::header::Header;
use crate::record::Record;

/// Parse `addstr` as `name-address-hours` and append one record.
///
/// `addstr` must split on `-` into exactly three non-empty fields, the last
/// of which must parse as a `u32`. `name`/`address` longer than 255 octets
/// are truncated by [`Record::new`]; that truncation is not itself an error.
pub fn add(header: &mut Header, records: &mut Vec<Record>, addstr: &str) -> Result<(), EngineError> {
    let fields: Vec<&str> = addstr.split('-').collect();
    let (name, address, hours_str) = match fields.as_slice() {
        [name, address, hours_str] => (*name, *address, *hours_str),
        _ => {
            return Err(EngineError::MalformedAddString(format!(
                "expected exactly 3 dash-separated fields, got {}",
                fields.len()
            )))
        }
    };

    if name.is_empty() || address.is_empty() || hours_str.is_empty() {
        return Err(EngineError::MalformedAddString(
            "name, address, and hours fields must not be empty".to_string(),
        ));
    }

    let hours: u32 = hours_str.parse().map_err(|_| {
        EngineError::MalformedAddString(format!("hours is not a valid u32: {hours_str:?}"))
    })?;

    if header.count == u16::MAX {
        return Err(EngineError::CountOverflow);
    }

    records.push(Record::new(name, address, hours));
    header.count += 1;
    sync_filesize(header);
    Ok(())
}

/// Drop the last record and decrement `count`. Fails with
/// [`EngineError::Empty`] when there are no records.
pub fn remove_last(header: &mut Header, records: &mut Vec<Record>) -> Result<(), EngineError> {
    if records.is_empty() {
        return Err(EngineError::Empty);
    }
    records.pop();
    header.count -= 1;
    sync_filesize(header);
    Ok(())
}

/// A lazy, finite, non-restartable view over all records in insertion order.
pub fn list(records: &[Record]) -> impl Iterator<Item = &Record> {
    records.iter()
}

fn sync_filesize(header: &mut Header) {
    #[allow(clippy::cast_possible_truncation)] // count * RECORD_SIZE + HEADER_SIZE fits comfortably in u32
    let filesize = Header::expected_filesize(header.count) as u32;
    header.filesize = filesize;
}
