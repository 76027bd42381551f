//! Wire-protocol failures (spec.md §4.6/§4.9). Grounded on the teacher's
//! per-subsystem `thiserror` enum convention (`utils::core::error`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("connection closed mid-message")]
    ConnectionClosed,

    #[error("unknown message type byte: {0}")]
    UnknownMessageType(u8),

    #[error("payload_size {declared} does not match decoded payload shape for {message_type}")]
    PayloadSizeMismatch { message_type: &'static str, declared: u32 },

    #[error("message payload too short: need {need} bytes, have {have}")]
    PayloadTooShort { need: usize, have: usize },

    #[error("string field is not valid UTF-8")]
    InvalidUtf8,

    #[error("client protocol version {client} does not match server version {server}")]
    VersionMismatch { client: u32, server: u32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type ProtocolResult<T> = std::result::Result<T, ProtocolError>;
