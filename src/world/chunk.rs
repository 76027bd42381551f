//! A 32³ cube of blocks, the unit of storage, streaming, and meshing.
//! Grounded on the teacher's `world::chunk::{CHUNK_SIZE, CHUNK_VOLUME}`
//! constants and serializable chunk struct shape, generalized to the
//! spec's flat `Block` array + `dirty` flag (spec.md §3).

use serde::{Deserialize, Serialize};

use crate::block::{Block, BlockType};
use crate::world::chunk_coord::ChunkCoord;

pub const CHUNK_SIZE: u32 = 32;
pub const CHUNK_VOLUME: usize = (CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE) as usize;

/// Cache-friendly horizontal-iteration layout: `index = y*1024 + z*32 + x`.
#[inline]
pub const fn block_index(x: u32, y: u32, z: u32) -> usize {
    (y * CHUNK_SIZE * CHUNK_SIZE + z * CHUNK_SIZE + x) as usize
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub coord: ChunkCoord,
    blocks: Vec<Block>,
    #[serde(skip)]
    dirty: bool,
}

impl Chunk {
    /// A freshly generated chunk is clean (disk-equivalent); callers that
    /// want an initial save may mark it dirty themselves (spec.md §3).
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            blocks: vec![Block::AIR; CHUNK_VOLUME],
            dirty: false,
        }
    }

    pub fn from_blocks(coord: ChunkCoord, blocks: Vec<Block>) -> Self {
        debug_assert_eq!(
            blocks.len(),
            CHUNK_VOLUME,
            "chunk block array must have exactly CHUNK_VOLUME entries"
        );
        Self {
            coord,
            blocks,
            dirty: false,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Only the persistence layer may clear the dirty flag (spec.md §3).
    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn get_block(&self, x: u32, y: u32, z: u32) -> Block {
        debug_assert!(x < CHUNK_SIZE && y < CHUNK_SIZE && z < CHUNK_SIZE);
        self.blocks[block_index(x, y, z)]
    }

    pub fn get_block_type(&self, x: u32, y: u32, z: u32) -> BlockType {
        self.get_block(x, y, z).block_type
    }

    /// `dirty` transitions false -> true on any `set_block` call
    /// (spec.md §3), regardless of whether the new value differs from
    /// the old one — this matches the teacher's storage layer which never
    /// attempts a no-op-write optimization.
    pub fn set_block(&mut self, x: u32, y: u32, z: u32, block: Block) {
        debug_assert!(x < CHUNK_SIZE && y < CHUNK_SIZE && z < CHUNK_SIZE);
        self.blocks[block_index(x, y, z)] = block;
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_chunk_is_all_air_and_clean() {
        let chunk = Chunk::new(ChunkCoord::new(0, 0, 0));
        assert!(!chunk.is_dirty());
        assert!(chunk.blocks().iter().all(|b| b.is_air()));
    }

    #[test]
    fn set_block_marks_dirty() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0, 0));
        chunk.set_block(5, 1, 5, Block::new(BlockType::Stone));
        assert!(chunk.is_dirty());
        assert_eq!(chunk.get_block_type(5, 1, 5), BlockType::Stone);
    }

    #[test]
    fn clear_dirty_resets_flag() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0, 0));
        chunk.set_block(0, 0, 0, Block::new(BlockType::Stone));
        chunk.clear_dirty();
        assert!(!chunk.is_dirty());
    }

    #[test]
    #[should_panic]
    fn out_of_range_access_traps_in_debug() {
        let chunk = Chunk::new(ChunkCoord::new(0, 0, 0));
        chunk.get_block(32, 0, 0);
    }

    #[test]
    fn block_index_is_y_major_for_cache_friendly_horizontal_iteration() {
        assert_eq!(block_index(0, 0, 0), 0);
        assert_eq!(block_index(1, 0, 0), 1);
        assert_eq!(block_index(0, 0, 1), 32);
        assert_eq!(block_index(0, 1, 0), 1024);
    }
}
