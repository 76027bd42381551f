//! Byte-level (de)serialization for `Message` (spec.md §4.6): little-
//! endian integers, packed layout, fixed-width name fields. Grounded on
//! `original_source/include/network/NetworkProtocol.h` and
//! `include/shared/Protocol.hpp` for the exact field order and framing;
//! hand-rolled rather than serde-derived because the wire format is
//! fully prescriptive (see SPEC_FULL.md §2.5).

use glam::{IVec3, Vec3};

use crate::block::BlockType;
use crate::protocol::error::{ProtocolError, ProtocolResult};
use crate::protocol::message::{Message, MessageType, NAME_FIELD_LEN};
use crate::world::ChunkCoord;

/// `{type: u8, payload_size: u32}` header, little-endian (spec.md §4.6).
pub const HEADER_LEN: usize = 1 + 4;

/// Encodes a full frame: header followed by payload.
pub fn encode_frame(message: &Message) -> Vec<u8> {
    let payload = encode_payload(message);
    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
    frame.push(message.message_type() as u8);
    frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    frame.extend_from_slice(&payload);
    frame
}

/// Parses a just-received header into `(MessageType, payload_size)`.
pub fn decode_header(header: &[u8; HEADER_LEN]) -> ProtocolResult<(MessageType, u32)> {
    let message_type =
        MessageType::from_byte(header[0]).ok_or(ProtocolError::UnknownMessageType(header[0]))?;
    let payload_size = u32::from_le_bytes([header[1], header[2], header[3], header[4]]);
    Ok((message_type, payload_size))
}

fn encode_payload(message: &Message) -> Vec<u8> {
    let mut out = Vec::new();
    match message {
        Message::ClientJoin { name, client_version } => {
            write_name(&mut out, name);
            write_u32(&mut out, *client_version);
        }
        Message::PlayerMove { position, velocity, yaw, pitch, input_flags } => {
            write_vec3(&mut out, *position);
            write_vec3(&mut out, *velocity);
            write_f32(&mut out, *yaw);
            write_f32(&mut out, *pitch);
            out.push(*input_flags);
        }
        Message::BlockPlace { position, block_type } => {
            write_ivec3(&mut out, *position);
            write_u16(&mut out, *block_type as u16);
        }
        Message::BlockBreak { position } => {
            write_ivec3(&mut out, *position);
        }
        Message::ChunkData { coord, payload } => {
            write_chunk_coord(&mut out, *coord);
            write_u32(&mut out, payload.len() as u32);
            out.extend_from_slice(payload);
        }
        Message::ChunkUnload { coord } => {
            write_chunk_coord(&mut out, *coord);
        }
        Message::BlockUpdate { position, block_type } => {
            write_ivec3(&mut out, *position);
            write_u16(&mut out, *block_type as u16);
        }
        Message::PlayerSpawn { player_id, spawn, name } => {
            write_u32(&mut out, *player_id);
            write_vec3(&mut out, *spawn);
            write_name(&mut out, name);
        }
        Message::PlayerPositionUpdate { player_id, position, yaw, pitch } => {
            write_u32(&mut out, *player_id);
            write_vec3(&mut out, *position);
            write_f32(&mut out, *yaw);
            write_f32(&mut out, *pitch);
        }
        Message::PlayerRemove { player_id } => {
            write_u32(&mut out, *player_id);
        }
        Message::KeepAlive { timestamp } => {
            write_u64(&mut out, *timestamp);
        }
        Message::Disconnect { reason } => {
            write_u32(&mut out, reason.len() as u32);
            out.extend_from_slice(reason.as_bytes());
        }
    }
    out
}

/// Decodes `payload` according to `message_type`, the type already
/// having been read off the header.
pub fn decode_payload(message_type: MessageType, payload: &[u8]) -> ProtocolResult<Message> {
    let mut r = Reader::new(payload);
    let message = match message_type {
        MessageType::ClientJoin => Message::ClientJoin {
            name: r.read_name()?,
            client_version: r.read_u32()?,
        },
        MessageType::PlayerMove => Message::PlayerMove {
            position: r.read_vec3()?,
            velocity: r.read_vec3()?,
            yaw: r.read_f32()?,
            pitch: r.read_f32()?,
            input_flags: r.read_u8()?,
        },
        MessageType::BlockPlace => Message::BlockPlace {
            position: r.read_ivec3()?,
            block_type: BlockType::from_u16(r.read_u16()?),
        },
        MessageType::BlockBreak => Message::BlockBreak { position: r.read_ivec3()? },
        MessageType::ChunkData => {
            let coord = r.read_chunk_coord()?;
            let size = r.read_u32()? as usize;
            let payload = r.read_bytes(size)?.to_vec();
            Message::ChunkData { coord, payload }
        }
        MessageType::ChunkUnload => Message::ChunkUnload { coord: r.read_chunk_coord()? },
        MessageType::BlockUpdate => Message::BlockUpdate {
            position: r.read_ivec3()?,
            block_type: BlockType::from_u16(r.read_u16()?),
        },
        MessageType::PlayerSpawn => Message::PlayerSpawn {
            player_id: r.read_u32()?,
            spawn: r.read_vec3()?,
            name: r.read_name()?,
        },
        MessageType::PlayerPositionUpdate => Message::PlayerPositionUpdate {
            player_id: r.read_u32()?,
            position: r.read_vec3()?,
            yaw: r.read_f32()?,
            pitch: r.read_f32()?,
        },
        MessageType::PlayerRemove => Message::PlayerRemove { player_id: r.read_u32()? },
        MessageType::KeepAlive => Message::KeepAlive { timestamp: r.read_u64()? },
        MessageType::Disconnect => {
            let len = r.read_u32()? as usize;
            let bytes = r.read_bytes(len)?;
            let reason = std::str::from_utf8(bytes)
                .map_err(|_| ProtocolError::InvalidUtf8)?
                .to_owned();
            Message::Disconnect { reason }
        }
    };
    r.expect_exhausted(message_type)?;
    Ok(message)
}

fn write_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}
fn write_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}
fn write_u64(out: &mut Vec<u8>, v: u64) {
    out.extend_from_slice(&v.to_le_bytes());
}
fn write_f32(out: &mut Vec<u8>, v: f32) {
    out.extend_from_slice(&v.to_le_bytes());
}
fn write_vec3(out: &mut Vec<u8>, v: Vec3) {
    write_f32(out, v.x);
    write_f32(out, v.y);
    write_f32(out, v.z);
}
fn write_ivec3(out: &mut Vec<u8>, v: IVec3) {
    out.extend_from_slice(&v.x.to_le_bytes());
    out.extend_from_slice(&v.y.to_le_bytes());
    out.extend_from_slice(&v.z.to_le_bytes());
}
fn write_chunk_coord(out: &mut Vec<u8>, c: ChunkCoord) {
    write_ivec3(out, c.as_ivec3());
}

/// Writes `name` truncated/zero-padded to exactly `NAME_FIELD_LEN` bytes
/// (spec.md §4.6 — "32-byte name").
fn write_name(out: &mut Vec<u8>, name: &str) {
    let mut buf = [0u8; NAME_FIELD_LEN];
    let bytes = name.as_bytes();
    let n = bytes.len().min(NAME_FIELD_LEN);
    buf[..n].copy_from_slice(&bytes[..n]);
    out.extend_from_slice(&buf);
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn read_bytes(&mut self, n: usize) -> ProtocolResult<&'a [u8]> {
        if self.pos + n > self.data.len() {
            return Err(ProtocolError::PayloadTooShort { need: n, have: self.data.len() - self.pos });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u8(&mut self) -> ProtocolResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_u16(&mut self) -> ProtocolResult<u16> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn read_u32(&mut self) -> ProtocolResult<u32> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_u64(&mut self) -> ProtocolResult<u64> {
        let b = self.read_bytes(8)?;
        Ok(u64::from_le_bytes(b.try_into().expect("8 bytes read")))
    }

    fn read_f32(&mut self) -> ProtocolResult<f32> {
        let b = self.read_bytes(4)?;
        Ok(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_vec3(&mut self) -> ProtocolResult<Vec3> {
        Ok(Vec3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }

    fn read_ivec3(&mut self) -> ProtocolResult<IVec3> {
        let x = self.read_u32()? as i32;
        let y = self.read_u32()? as i32;
        let z = self.read_u32()? as i32;
        Ok(IVec3::new(x, y, z))
    }

    fn read_chunk_coord(&mut self) -> ProtocolResult<ChunkCoord> {
        let v = self.read_ivec3()?;
        Ok(ChunkCoord::new(v.x, v.y, v.z))
    }

    /// Trims trailing NUL padding and requires the remainder be valid
    /// UTF-8 (spec.md §4.6 — fixed-width name field).
    fn read_name(&mut self) -> ProtocolResult<String> {
        let bytes = self.read_bytes(NAME_FIELD_LEN)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        std::str::from_utf8(&bytes[..end])
            .map(str::to_owned)
            .map_err(|_| ProtocolError::InvalidUtf8)
    }

    fn expect_exhausted(&self, message_type: MessageType) -> ProtocolResult<()> {
        if self.pos != self.data.len() {
            return Err(ProtocolError::PayloadSizeMismatch {
                message_type: message_type.name(),
                declared: self.data.len() as u32,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(message: Message) {
        let encoded = encode_payload(&message);
        let decoded = decode_payload(message.message_type(), &encoded).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn client_join_round_trips_with_name_padding_stripped() {
        round_trip(Message::ClientJoin {
            name: "Steve".to_owned(),
            client_version: 1,
        });
    }

    #[test]
    fn player_move_round_trips() {
        round_trip(Message::PlayerMove {
            position: Vec3::new(1.0, 2.0, 3.0),
            velocity: Vec3::new(0.0, -9.8, 0.0),
            yaw: 45.0,
            pitch: -10.0,
            input_flags: 0b0000_0101,
        });
    }

    #[test]
    fn block_place_round_trips() {
        round_trip(Message::BlockPlace {
            position: IVec3::new(-5, 10, 3),
            block_type: BlockType::Stone,
        });
    }

    #[test]
    fn chunk_data_round_trips_with_payload_bytes_intact() {
        round_trip(Message::ChunkData {
            coord: ChunkCoord::new(1, -2, 3),
            payload: vec![4, 0, 0, 0, 8, 0, 1, 0],
        });
    }

    #[test]
    fn disconnect_round_trips_reason_string() {
        round_trip(Message::Disconnect { reason: "protocol version mismatch".to_owned() });
    }

    #[test]
    fn full_frame_header_round_trips_type_and_length() {
        let message = Message::KeepAlive { timestamp: 123456 };
        let frame = encode_frame(&message);
        let header: [u8; HEADER_LEN] = frame[..HEADER_LEN].try_into().unwrap();
        let (message_type, payload_size) = decode_header(&header).unwrap();
        assert_eq!(message_type, MessageType::KeepAlive);
        assert_eq!(payload_size as usize, frame.len() - HEADER_LEN);
    }

    #[test]
    fn unknown_type_byte_is_rejected() {
        let header: [u8; HEADER_LEN] = [255, 0, 0, 0, 0];
        assert!(matches!(decode_header(&header), Err(ProtocolError::UnknownMessageType(255))));
    }

    #[test]
    fn truncated_payload_is_rejected() {
        let err = decode_payload(MessageType::KeepAlive, &[0, 0, 0]).unwrap_err();
        assert!(matches!(err, ProtocolError::PayloadTooShort { .. }));
    }

    #[test]
    fn name_longer_than_field_is_truncated_not_rejected() {
        let long_name = "x".repeat(64);
        let mut out = Vec::new();
        write_name(&mut out, &long_name);
        assert_eq!(out.len(), NAME_FIELD_LEN);
    }
}
