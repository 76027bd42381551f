//! Framed TCP transport (spec.md §4.6/§4.7 — "non-blocking poll" each
//! tick). The teacher has no networking layer of its own; this is
//! grounded directly in spec.md's transport contract, built on
//! `std::net` the way the teacher builds its other I/O-adjacent code on
//! plain `std` (e.g. `world::storage::file`) rather than reaching for an
//! async runtime.

use std::io::{self, Read, Write};
use std::net::TcpStream;

use crate::protocol::codec::{decode_header, decode_payload, encode_frame, HEADER_LEN};
use crate::protocol::error::{ProtocolError, ProtocolResult};
use crate::protocol::message::Message;

const READ_CHUNK: usize = 4096;

/// One reliable, in-order connection. Wraps a non-blocking `TcpStream`
/// and accumulates partial frames across polls — a single tick's worth
/// of bytes rarely lines up with message boundaries (spec.md §4.6).
pub struct Connection {
    stream: TcpStream,
    recv_buf: Vec<u8>,
}

impl Connection {
    pub fn new(stream: TcpStream) -> io::Result<Self> {
        stream.set_nonblocking(true)?;
        stream.set_nodelay(true)?;
        Ok(Self {
            stream,
            recv_buf: Vec::new(),
        })
    }

    /// Drains whatever bytes are currently available without blocking,
    /// then decodes every complete frame buffered so far. A malformed
    /// frame (bad type byte / size mismatch) is reported as `Err` for
    /// the caller to log and drop per spec.md §4.9 — it does not poison
    /// the connection; the next call resumes from where decoding left
    /// off is not possible once corrupted, so callers should close on
    /// error.
    pub fn poll_messages(&mut self) -> ProtocolResult<Vec<Message>> {
        self.read_available()?;

        let mut messages = Vec::new();
        let mut cursor = 0;
        loop {
            if self.recv_buf.len() - cursor < HEADER_LEN {
                break;
            }
            let header: [u8; HEADER_LEN] = self.recv_buf[cursor..cursor + HEADER_LEN]
                .try_into()
                .expect("slice is exactly HEADER_LEN");
            let (message_type, payload_size) = decode_header(&header)?;
            let payload_size = payload_size as usize;
            let frame_len = HEADER_LEN + payload_size;
            if self.recv_buf.len() - cursor < frame_len {
                break;
            }
            let payload_start = cursor + HEADER_LEN;
            let payload = &self.recv_buf[payload_start..payload_start + payload_size];
            messages.push(decode_payload(message_type, payload)?);
            cursor += frame_len;
        }

        self.recv_buf.drain(..cursor);
        Ok(messages)
    }

    fn read_available(&mut self) -> ProtocolResult<()> {
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            match self.stream.read(&mut chunk) {
                Ok(0) => return Err(ProtocolError::ConnectionClosed),
                Ok(n) => self.recv_buf.extend_from_slice(&chunk[..n]),
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(err) => return Err(ProtocolError::Io(err)),
            }
        }
    }

    /// Encodes and writes one message, blocking only as long as the TCP
    /// send buffer is briefly full.
    pub fn send(&mut self, message: &Message) -> ProtocolResult<()> {
        let frame = encode_frame(message);
        self.write_all_nonblocking(&frame)
    }

    fn write_all_nonblocking(&mut self, mut buf: &[u8]) -> ProtocolResult<()> {
        while !buf.is_empty() {
            match self.stream.write(buf) {
                Ok(0) => return Err(ProtocolError::ConnectionClosed),
                Ok(n) => buf = &buf[n..],
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => continue,
                Err(err) => return Err(ProtocolError::Io(err)),
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> ProtocolResult<()> {
        self.stream.flush().map_err(ProtocolError::Io)
    }

    pub fn peer_addr(&self) -> io::Result<std::net::SocketAddr> {
        self.stream.peer_addr()
    }
}
