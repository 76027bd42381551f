//! Pluggable world generation. Grounded on the teacher's
//! `terrain::WorldGenerator` trait (`generate_chunk`/`get_block`) and its
//! `SimpleGenerator`, generalized to the spec's placeholder rule
//! (spec.md §4.1): grass at y=0, stone below, air above.

use crate::block::{Block, BlockType};
use crate::world::chunk::{Chunk, CHUNK_SIZE};
use crate::world::chunk_coord::ChunkCoord;

/// A function object `Fn(ChunkCoord) -> Chunk` implementations may
/// substitute for more sophisticated terrain (spec.md explicitly scopes
/// out biomes/caves/structures — this trait is the seam for later work).
pub trait WorldGenerator: Send + Sync {
    fn generate_chunk(&self, coord: ChunkCoord) -> Chunk;
}

/// The default, intentionally trivial rule: grass at `grass_level`,
/// stone below, air above. `grass_level` is configurable
/// (`config::WorldGenConfig::grass_level`) even though the rule itself
/// stays a single deterministic band — the seed field exists for a
/// future noise-based generator and this one ignores it.
pub struct FlatWorldGenerator {
    grass_level: i32,
}

impl FlatWorldGenerator {
    pub fn new(grass_level: i32) -> Self {
        Self { grass_level }
    }

    fn block_for(&self, world_y: i32) -> Block {
        match world_y.cmp(&self.grass_level) {
            std::cmp::Ordering::Equal => Block::new(BlockType::Grass),
            std::cmp::Ordering::Less => Block::new(BlockType::Stone),
            std::cmp::Ordering::Greater => Block::AIR,
        }
    }
}

impl Default for FlatWorldGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

impl WorldGenerator for FlatWorldGenerator {
    /// Built via `Chunk::from_blocks` rather than `Chunk::new` +
    /// `set_block` — the latter would mark every generated chunk dirty
    /// (spec.md §3: "a freshly generated chunk is clean (disk-equivalent)").
    fn generate_chunk(&self, coord: ChunkCoord) -> Chunk {
        let mut blocks = Vec::with_capacity(CHUNK_SIZE as usize * CHUNK_SIZE as usize * CHUNK_SIZE as usize);
        for y in 0..CHUNK_SIZE {
            let world_y = coord.y * CHUNK_SIZE as i32 + y as i32;
            let block = self.block_for(world_y);
            for _ in 0..(CHUNK_SIZE * CHUNK_SIZE) {
                blocks.push(block);
            }
        }
        Chunk::from_blocks(coord, blocks)
    }
}
