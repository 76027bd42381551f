//! Per-player chunk streaming diff (spec.md §4.8): decides what to ship
//! and what to retract as a player moves.

use std::collections::HashSet;

use crate::protocol::{Message, ProtocolResult};
use crate::world::rle;
use crate::world::{ChunkCoord, World};

use super::session::PlayerSession;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct StreamDiff {
    pub to_send: Vec<ChunkCoord>,
    pub to_unload: Vec<ChunkCoord>,
}

/// `desired = world.chunks_in_radius(position, load_radius)`, then
/// `to_send = desired - loaded`, `to_unload = loaded - desired`
/// (spec.md §4.8 steps 1-3).
pub fn compute_diff(world: &World, session: &PlayerSession, load_radius: f64) -> StreamDiff {
    let desired: HashSet<ChunkCoord> = world
        .chunks_in_radius(session.position, load_radius)
        .into_iter()
        .collect();
    StreamDiff {
        to_send: desired.difference(&session.loaded_chunks).copied().collect(),
        to_unload: session.loaded_chunks.difference(&desired).copied().collect(),
    }
}

/// Computes the diff and applies it: sends `ChunkUnload` for everything
/// retracted, loads (generating if absent) and RLE-encodes everything
/// newly in range, updates `session.loaded_chunks`/
/// `last_streamed_position`, and flushes the connection (spec.md §4.8
/// steps 4-6).
pub fn stream_to_session(world: &World, session: &mut PlayerSession, load_radius: f64) -> ProtocolResult<()> {
    let diff = compute_diff(world, session, load_radius);

    for coord in diff.to_unload {
        session.connection.send(&Message::ChunkUnload { coord })?;
        session.loaded_chunks.remove(&coord);
    }

    for coord in diff.to_send {
        let payload = {
            let chunk = world.load_chunk(coord);
            rle::encode(chunk.blocks())
        };
        session.connection.send(&Message::ChunkData { coord, payload })?;
        session.loaded_chunks.insert(coord);
    }

    session.last_streamed_position = session.position;
    session.connection.flush()
}
