//! Pure request handlers: `(state, frame) -> (next state, reply bytes)`.
//!
//! Handlers never touch sockets or the file; they only read the request
//! body, mutate the in-memory `(Header, Vec<Record>)` pair the event loop
//! owns, and return bytes ready to hand to `write_all`.

use empdb_protocol::{encode, FsmState, MessageKind};
use empdb_record_format::{Header, Record};
use log::{debug, warn};

const STATUS_OK: i32 = 0;
const STATUS_FAIL: i32 = -1;

/// Result of dispatching one frame: the connection's new FSM state and the
/// bytes, if any, to write back to the peer.
pub struct Outcome {
    pub next_state: FsmState,
    pub reply: Vec<u8>,
}

impl Outcome {
    fn reply(next_state: FsmState, reply: Vec<u8>) -> Self {
        Self { next_state, reply }
    }

    fn error_and_close() -> Self {
        Self::reply(FsmState::Closed, encode(MessageKind::Error, &[]))
    }
}

/// Dispatch one already-framed request against the connection's current
/// state and the shared record store.
pub fn dispatch(
    state: FsmState,
    kind: MessageKind,
    body: &[u8],
    protocol_version: u16,
    header: &mut Header,
    records: &mut Vec<Record>,
) -> Outcome {
    match state {
        FsmState::AwaitingHello => handle_hello(kind, body, protocol_version),
        FsmState::Ready => handle_ready(kind, body, header, records),
        FsmState::Closed => Outcome::error_and_close(),
    }
}

fn handle_hello(kind: MessageKind, body: &[u8], protocol_version: u16) -> Outcome {
    if kind != MessageKind::HelloReq || !has_expected_len(kind, body) {
        warn!("hello rejected: kind={kind:?} body_len={}", body.len());
        return Outcome::error_and_close();
    }
    let peer_version = u16::from_be_bytes([body[0], body[1]]);
    if peer_version != protocol_version {
        warn!("protocol mismatch: peer={peer_version} server={protocol_version}");
        return Outcome::error_and_close();
    }
    debug!("hello accepted, protocol version {peer_version}");
    let reply = encode(MessageKind::HelloResp, &protocol_version.to_be_bytes());
    Outcome::reply(FsmState::Ready, reply)
}

fn handle_ready(
    kind: MessageKind,
    body: &[u8],
    header: &mut Header,
    records: &mut Vec<Record>,
) -> Outcome {
    if !has_expected_len(kind, body) {
        return Outcome::error_and_close();
    }
    match kind {
        MessageKind::ListReq => handle_list(records),
        MessageKind::AddReq => handle_add(body, header, records),
        MessageKind::DelReq => handle_del(header, records),
        _ => Outcome::error_and_close(),
    }
}

/// `true` when `kind` is a request kind and `body` has exactly the fixed
/// length that kind requires. A kind with no fixed request size (a
/// response kind, or `Error`) never matches here.
fn has_expected_len(kind: MessageKind, body: &[u8]) -> bool {
    kind.request_body_len() == Some(body.len())
}

fn handle_list(records: &[Record]) -> Outcome {
    let count = u16::try_from(records.len()).expect("count already bounded to u16 by the engine");
    let mut reply = encode(MessageKind::ListResp, &count.to_be_bytes());
    for record in empdb_record_format::list(records) {
        reply.extend_from_slice(&record.to_bytes());
    }
    Outcome::reply(FsmState::Ready, reply)
}

fn handle_add(body: &[u8], header: &mut Header, records: &mut Vec<Record>) -> Outcome {
    let addstr = match std::str::from_utf8(body) {
        Ok(s) => s.trim_end_matches('\0'),
        Err(_) => {
            warn!("add-string is not valid UTF-8");
            return status_reply(MessageKind::AddResp, STATUS_FAIL);
        }
    };
    let status = match empdb_record_format::add(header, records, addstr) {
        Ok(()) => {
            debug!("record added, count now {}", records.len());
            STATUS_OK
        }
        Err(err) => {
            warn!("add rejected: {err}");
            STATUS_FAIL
        }
    };
    status_reply(MessageKind::AddResp, status)
}

fn handle_del(header: &mut Header, records: &mut Vec<Record>) -> Outcome {
    let status = match empdb_record_format::remove_last(header, records) {
        Ok(()) => {
            debug!("record removed, count now {}", records.len());
            STATUS_OK
        }
        Err(err) => {
            warn!("remove rejected: {err}");
            STATUS_FAIL
        }
    };
    status_reply(MessageKind::DelResp, status)
}

fn status_reply(kind: MessageKind, status: i32) -> Outcome {
    Outcome::reply(FsmState::Ready, encode(kind, &status.to_be_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use empdb_protocol::ADD_REQ_BODY_LEN;

    fn fresh() -> (Header, Vec<Record>) {
        (Header::new_empty(), Vec::new())
    }

    #[test]
    fn hello_with_matching_version_transitions_to_ready() {
        let outcome = handle_hello(MessageKind::HelloReq, &1u16.to_be_bytes(), 1);
        assert_eq!(outcome.next_state, FsmState::Ready);
    }

    #[test]
    fn hello_with_mismatched_version_closes() {
        let outcome = handle_hello(MessageKind::HelloReq, &99u16.to_be_bytes(), 1);
        assert_eq!(outcome.next_state, FsmState::Closed);
    }

    #[test]
    fn hello_wrong_kind_closes() {
        let outcome = handle_hello(MessageKind::ListReq, &1u16.to_be_bytes(), 1);
        assert_eq!(outcome.next_state, FsmState::Closed);
    }

    #[test]
    fn add_then_list_reflects_new_record() {
        let (mut header, mut records) = fresh();
        let mut body = vec![0u8; ADD_REQ_BODY_LEN];
        let addstr = b"Alice-1 Main St-40";
        body[..addstr.len()].copy_from_slice(addstr);

        let add_outcome = handle_ready(MessageKind::AddReq, &body, &mut header, &mut records);
        assert_eq!(add_outcome.next_state, FsmState::Ready);
        assert_eq!(&add_outcome.reply[add_outcome.reply.len() - 4..], &STATUS_OK.to_be_bytes());

        let list_outcome = handle_ready(MessageKind::ListReq, &[], &mut header, &mut records);
        assert_eq!(records.len(), 1);
        // 6-byte frame header + 2-byte count + one 516-byte record.
        assert_eq!(list_outcome.reply.len(), 6 + 2 + empdb_record_format::RECORD_SIZE);
    }

    #[test]
    fn del_on_empty_reports_failure_status() {
        let (mut header, mut records) = fresh();
        let outcome = handle_ready(MessageKind::DelReq, &[], &mut header, &mut records);
        assert_eq!(outcome.next_state, FsmState::Ready);
        assert_eq!(&outcome.reply[outcome.reply.len() - 4..], &STATUS_FAIL.to_be_bytes());
    }

    #[test]
    fn unknown_kind_in_ready_closes() {
        let (mut header, mut records) = fresh();
        let outcome = handle_ready(MessageKind::HelloReq, &[], &mut header, &mut records);
        assert_eq!(outcome.next_state, FsmState::Closed);
    }

    #[test]
    fn wrong_body_length_closes() {
        let (mut header, mut records) = fresh();
        let outcome = handle_ready(MessageKind::ListReq, &[0], &mut header, &mut records);
        assert_eq!(outcome.next_state, FsmState::Closed);
    }
}
