//! The message catalogue (spec.md §4.6). Fields are typed with the
//! engine's own `ChunkCoord`/`BlockType` rather than raw wire integers;
//! `protocol::codec` owns the byte-level (de)serialization.

use glam::{IVec3, Vec3};

use crate::block::BlockType;
use crate::world::ChunkCoord;

/// Current protocol revision, carried in every `ClientJoin` (spec.md
/// §4.6 — "versioned by ClientJoin.client_version").
pub const PROTOCOL_VERSION: u32 = 1;

/// Fixed width of the name field on the wire (spec.md §4.6).
pub const NAME_FIELD_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    ClientJoin {
        name: String,
        client_version: u32,
    },
    PlayerMove {
        position: Vec3,
        velocity: Vec3,
        yaw: f32,
        pitch: f32,
        input_flags: u8,
    },
    BlockPlace {
        position: IVec3,
        block_type: BlockType,
    },
    BlockBreak {
        position: IVec3,
    },
    ChunkData {
        coord: ChunkCoord,
        payload: Vec<u8>,
    },
    ChunkUnload {
        coord: ChunkCoord,
    },
    BlockUpdate {
        position: IVec3,
        block_type: BlockType,
    },
    PlayerSpawn {
        player_id: u32,
        spawn: Vec3,
        name: String,
    },
    PlayerPositionUpdate {
        player_id: u32,
        position: Vec3,
        yaw: f32,
        pitch: f32,
    },
    PlayerRemove {
        player_id: u32,
    },
    KeepAlive {
        timestamp: u64,
    },
    Disconnect {
        reason: String,
    },
}

/// Wire type tag. Grouped as the spec's catalogue groups them:
/// client-originated, server-originated, then bidirectional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    ClientJoin = 1,
    PlayerMove = 2,
    BlockPlace = 3,
    BlockBreak = 4,
    ChunkData = 10,
    ChunkUnload = 11,
    BlockUpdate = 12,
    PlayerSpawn = 13,
    PlayerPositionUpdate = 14,
    PlayerRemove = 15,
    KeepAlive = 20,
    Disconnect = 21,
}

impl MessageType {
    pub fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            1 => Self::ClientJoin,
            2 => Self::PlayerMove,
            3 => Self::BlockPlace,
            4 => Self::BlockBreak,
            10 => Self::ChunkData,
            11 => Self::ChunkUnload,
            12 => Self::BlockUpdate,
            13 => Self::PlayerSpawn,
            14 => Self::PlayerPositionUpdate,
            15 => Self::PlayerRemove,
            20 => Self::KeepAlive,
            21 => Self::Disconnect,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ClientJoin => "ClientJoin",
            Self::PlayerMove => "PlayerMove",
            Self::BlockPlace => "BlockPlace",
            Self::BlockBreak => "BlockBreak",
            Self::ChunkData => "ChunkData",
            Self::ChunkUnload => "ChunkUnload",
            Self::BlockUpdate => "BlockUpdate",
            Self::PlayerSpawn => "PlayerSpawn",
            Self::PlayerPositionUpdate => "PlayerPositionUpdate",
            Self::PlayerRemove => "PlayerRemove",
            Self::KeepAlive => "KeepAlive",
            Self::Disconnect => "Disconnect",
        }
    }
}

impl Message {
    pub fn message_type(&self) -> MessageType {
        match self {
            Message::ClientJoin { .. } => MessageType::ClientJoin,
            Message::PlayerMove { .. } => MessageType::PlayerMove,
            Message::BlockPlace { .. } => MessageType::BlockPlace,
            Message::BlockBreak { .. } => MessageType::BlockBreak,
            Message::ChunkData { .. } => MessageType::ChunkData,
            Message::ChunkUnload { .. } => MessageType::ChunkUnload,
            Message::BlockUpdate { .. } => MessageType::BlockUpdate,
            Message::PlayerSpawn { .. } => MessageType::PlayerSpawn,
            Message::PlayerPositionUpdate { .. } => MessageType::PlayerPositionUpdate,
            Message::PlayerRemove { .. } => MessageType::PlayerRemove,
            Message::KeepAlive { .. } => MessageType::KeepAlive,
            Message::Disconnect { .. } => MessageType::Disconnect,
        }
    }
}
