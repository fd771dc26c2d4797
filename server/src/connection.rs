//! Per-peer socket plus the framing buffer and FSM state that travel with
//! it for the lifetime of one connection-table slot.

use std::io;

use empdb_protocol::{ConnectionBuffer, FsmState};
use mio::net::TcpStream;

pub struct Connection {
    pub socket: TcpStream,
    pub state: FsmState,
    pub buffer: ConnectionBuffer,
}

impl Connection {
    pub fn new(socket: TcpStream) -> Self {
        Self {
            socket,
            state: FsmState::AwaitingHello,
            buffer: ConnectionBuffer::new(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state == FsmState::Closed
    }

    /// Read once from the socket into the free tail of the buffer.
    /// `Ok(0)` or any error other than `WouldBlock`/`Interrupted` means the
    /// peer is gone and the connection should be marked `Closed`.
    pub fn read_once(&mut self) -> io::Result<usize> {
        self.buffer.fill_once(&mut self.socket)
    }
}
