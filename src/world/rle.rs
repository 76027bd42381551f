//! Run-length codec for the on-wire chunk payload (spec.md §4.2).
//!
//! No teacher equivalent exists verbatim — the teacher's
//! `CompressedRegion`/`CompressedBlock` types (world/chunk.rs,
//! world/storage/core.rs) establish the "compress chunk data before it
//! leaves the world" idiom; this generalizes it into the exact
//! `(run_length: u16, block_type: u16)` scheme spec.md requires.

use crate::block::{Block, BlockType};
use crate::world::chunk::CHUNK_VOLUME;
use crate::world::error::{WorldError, WorldResult};

/// Walks `blocks` in index order and emits `(run_length, block_type)`
/// pairs, little-endian, as raw bytes. A run that reaches `u16::MAX`
/// closes and a new run begins for the same type if more remain.
pub fn encode(blocks: &[Block]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4);
    let mut iter = blocks.iter();
    let Some(&first) = iter.next() else {
        return out;
    };
    let mut current = first.block_type;
    let mut run: u16 = 1;

    let mut flush = |run: u16, block_type: BlockType, out: &mut Vec<u8>| {
        out.extend_from_slice(&run.to_le_bytes());
        out.extend_from_slice(&(block_type as u16).to_le_bytes());
    };

    for block in iter {
        if block.block_type == current && run < u16::MAX {
            run += 1;
        } else {
            flush(run, current, &mut out);
            current = block.block_type;
            run = 1;
        }
    }
    flush(run, current, &mut out);
    out
}

/// Decodes a run-length payload back into exactly `CHUNK_VOLUME` blocks.
///
/// Fails if the input ends mid-pair, if the decoded count exceeds the
/// fixed chunk volume, or if it falls short of it (spec.md §4.2).
pub fn decode(payload: &[u8]) -> WorldResult<Vec<Block>> {
    let mut blocks = Vec::with_capacity(CHUNK_VOLUME);
    let mut cursor = payload.chunks_exact(4);

    for pair in &mut cursor {
        let run = u16::from_le_bytes([pair[0], pair[1]]) as usize;
        let block_type = BlockType::from_u16(u16::from_le_bytes([pair[2], pair[3]]));
        if blocks.len() + run > CHUNK_VOLUME {
            return Err(WorldError::RleWrongVolume(blocks.len() + run, CHUNK_VOLUME));
        }
        blocks.extend(std::iter::repeat(Block::new(block_type)).take(run));
    }

    if !cursor.remainder().is_empty() {
        return Err(WorldError::RleTruncated);
    }
    if blocks.len() != CHUNK_VOLUME {
        return Err(WorldError::RleWrongVolume(blocks.len(), CHUNK_VOLUME));
    }
    Ok(blocks)
}
