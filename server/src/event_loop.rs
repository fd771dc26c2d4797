//! The single-threaded, readiness-driven multiplexer: accepts connections,
//! reads whatever is available, dispatches complete frames, and persists
//! nothing itself — that is the process driver's job once this returns.

use std::io::{self, ErrorKind};
use std::net::SocketAddr;
use std::time::Duration;

use empdb_protocol::{encode, try_decode, write_all, DecodeResult, FsmState, MessageKind};
use empdb_record_format::{Header, Record};
use log::{debug, info, warn};
use mio::net::TcpListener;
use mio::{Events, Interest, Poll, Token};

use crate::connection::Connection;
use crate::handler;
use crate::shutdown::ShutdownFlag;

const LISTENER_TOKEN: Token = Token(0);
const FIRST_CONN_TOKEN: usize = 1;
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

pub struct EventLoop {
    poll: Poll,
    listener: TcpListener,
    table: Vec<Option<Connection>>,
    protocol_version: u16,
}

impl EventLoop {
    pub fn bind(addr: SocketAddr, capacity: usize, protocol_version: u16) -> io::Result<Self> {
        let poll = Poll::new()?;
        let mut listener = TcpListener::bind(addr)?;
        poll.registry()
            .register(&mut listener, LISTENER_TOKEN, Interest::READABLE)?;

        let mut table = Vec::with_capacity(capacity);
        table.resize_with(capacity, || None);

        Ok(Self {
            poll,
            listener,
            table,
            protocol_version,
        })
    }

    /// The address actually bound, useful when `bind` was given port 0.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run until the shutdown flag is observed set. Returns so the caller
    /// can persist `header`/`records` and close the file.
    pub fn run(
        &mut self,
        shutdown: &ShutdownFlag,
        header: &mut Header,
        records: &mut Vec<Record>,
    ) -> io::Result<()> {
        let mut events = Events::with_capacity(1024);
        loop {
            match self.poll.poll(&mut events, Some(POLL_TIMEOUT)) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }

            if shutdown.is_set() {
                info!("shutdown flag observed, leaving event loop");
                return Ok(());
            }

            let tokens: Vec<Token> = events.iter().map(|e| e.token()).collect();
            for token in tokens {
                if token == LISTENER_TOKEN {
                    self.accept_one()?;
                    continue;
                }
                let index = token.0 - FIRST_CONN_TOKEN;
                self.service_readable(index, header, records);
            }

            self.reap_closed();
        }
    }

    /// mio's epoll backend is edge-triggered: a listener-readiness
    /// notification fires once regardless of how many connections are
    /// actually waiting in the accept backlog. Drain it fully, or a burst of
    /// simultaneous connections beyond the first would never get another
    /// wakeup.
    fn accept_one(&mut self) -> io::Result<()> {
        loop {
            let (mut socket, peer) = match self.listener.accept() {
                Ok(pair) => pair,
                Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(()),
                Err(e) => return Err(e),
            };
            debug!("accepted connection from {peer}");

            match self.table.iter().position(Option::is_none) {
                Some(index) => {
                    let token = Token(index + FIRST_CONN_TOKEN);
                    self.poll
                        .registry()
                        .register(&mut socket, token, Interest::READABLE)?;
                    self.table[index] = Some(Connection::new(socket));
                }
                None => {
                    warn!("connection table full ({} slots); closing {peer}", self.table.len());
                    drop(socket);
                }
            }
        }
    }

    /// Read from the connection at `index` until its socket reports
    /// `WouldBlock` (the same edge-triggering reasoning as `accept_one`
    /// applies per-connection: a client that pipelines several frames in one
    /// write needs every one of them drained on this single readiness
    /// notification), then dispatch every complete frame now buffered.
    fn service_readable(&mut self, index: usize, header: &mut Header, records: &mut Vec<Record>) {
        {
            let Some(conn) = self.table[index].as_mut() else {
                return;
            };
            loop {
                if conn.buffer.is_full() {
                    break;
                }
                match conn.read_once() {
                    Ok(0) => {
                        conn.state = FsmState::Closed;
                        break;
                    }
                    Ok(_) => continue,
                    Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::Interrupted => break,
                    Err(e) => {
                        warn!("read error on slot {index}: {e}");
                        conn.state = FsmState::Closed;
                        break;
                    }
                }
            }
        }
        self.drain_and_dispatch(index, header, records);
    }

    fn drain_and_dispatch(&mut self, index: usize, header: &mut Header, records: &mut Vec<Record>) {
        loop {
            let Some(conn) = self.table[index].as_mut() else {
                return;
            };
            if conn.is_closed() {
                return;
            }

            let (kind, body, consumed) = match try_decode(conn.buffer.filled()) {
                DecodeResult::Incomplete => return,
                DecodeResult::Malformed(reason) => {
                    warn!("malformed frame on slot {index}: {reason}");
                    let reply = encode(MessageKind::Error, &[]);
                    let _ = write_all(&mut conn.socket, &reply);
                    conn.state = FsmState::Closed;
                    return;
                }
                DecodeResult::Frame { kind, body, consumed } => (kind, body.to_vec(), consumed),
            };

            let outcome = handler::dispatch(conn.state, kind, &body, self.protocol_version, header, records);
            conn.buffer.consume(consumed);
            conn.state = outcome.next_state;

            if write_all(&mut conn.socket, &outcome.reply).is_err() {
                conn.state = FsmState::Closed;
                return;
            }
        }
    }

    fn reap_closed(&mut self) {
        for slot in self.table.iter_mut() {
            if matches!(slot, Some(conn) if conn.is_closed()) {
                if let Some(mut conn) = slot.take() {
                    let _ = self.poll.registry().deregister(&mut conn.socket);
                }
            }
        }
    }
}
