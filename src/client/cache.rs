//! The client's mirror of server-sent chunk state (spec.md §3
//! `ChunkCache`). Bounded only by what the server sends; `ChunkUnload`
//! removes entries.

use std::collections::HashMap;

use crate::world::{Chunk, ChunkCoord};

#[derive(Default)]
pub struct ChunkCache {
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl ChunkCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, chunk: Chunk) {
        self.chunks.insert(chunk.coord, chunk);
    }

    pub fn remove(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        self.chunks.remove(&coord)
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Clears the whole cache — the disconnect-path action spec.md §4.9
    /// calls for ("clear chunk cache, stop mesher tasks, transition to
    /// disconnected UI state").
    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    /// The six axis-neighbor coords of `coord`, in −x/+x/−y/+y/−z/+z
    /// order (spec.md §4.4 — "(a) the received chunk and (b) each of its
    /// six neighbors").
    pub fn neighbor_coords(coord: ChunkCoord) -> [ChunkCoord; 6] {
        [
            coord.neighbor(-1, 0, 0),
            coord.neighbor(1, 0, 0),
            coord.neighbor(0, -1, 0),
            coord.neighbor(0, 1, 0),
            coord.neighbor(0, 0, -1),
            coord.neighbor(0, 0, 1),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Block, BlockType};

    #[test]
    fn insert_then_get_round_trips_by_coord() {
        let mut cache = ChunkCache::new();
        let coord = ChunkCoord::new(1, 2, 3);
        cache.insert(Chunk::new(coord));
        assert!(cache.get(coord).is_some());
    }

    #[test]
    fn remove_evicts_the_entry() {
        let mut cache = ChunkCache::new();
        let coord = ChunkCoord::new(0, 0, 0);
        cache.insert(Chunk::new(coord));
        cache.remove(coord);
        assert!(!cache.contains(coord));
    }

    #[test]
    fn clear_empties_a_nonempty_cache() {
        let mut cache = ChunkCache::new();
        cache.insert(Chunk::new(ChunkCoord::new(0, 0, 0)));
        cache.insert(Chunk::new(ChunkCoord::new(1, 0, 0)));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn neighbor_coords_covers_all_six_axis_directions() {
        let neighbors = ChunkCache::neighbor_coords(ChunkCoord::new(0, 0, 0));
        let expected = [
            ChunkCoord::new(-1, 0, 0),
            ChunkCoord::new(1, 0, 0),
            ChunkCoord::new(0, -1, 0),
            ChunkCoord::new(0, 1, 0),
            ChunkCoord::new(0, 0, -1),
            ChunkCoord::new(0, 0, 1),
        ];
        assert_eq!(neighbors, expected);
    }

    #[test]
    fn insert_overwrites_stale_entry_for_same_coord() {
        let mut cache = ChunkCache::new();
        let coord = ChunkCoord::new(0, 0, 0);
        cache.insert(Chunk::new(coord));
        let mut updated = Chunk::new(coord);
        updated.set_block(0, 0, 0, Block::new(BlockType::Stone));
        cache.insert(updated);
        assert_eq!(cache.get(coord).unwrap().get_block_type(0, 0, 0), BlockType::Stone);
    }
}
