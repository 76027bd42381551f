//! Wire protocol: message catalogue and byte-level framing (spec.md
//! §4.6).
pub mod codec;
pub mod error;
pub mod message;

pub use codec::{decode_header, decode_payload, encode_frame, HEADER_LEN};
pub use error::{ProtocolError, ProtocolResult};
pub use message::{Message, MessageType, NAME_FIELD_LEN, PROTOCOL_VERSION};
