//! Chunk-space coordinates. Grounded on the teacher's
//! `world::chunk_coord::ChunkCoord(IVec3)` wrapper, generalized with the
//! floor-division world-to-chunk conversion and radius queries spec.md
//! §3/§4.1 require.

use glam::IVec3;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::chunk::CHUNK_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Floor-division from a world position: `cx = floor(wx / 32)`.
    pub fn from_world(wx: i32, wy: i32, wz: i32) -> Self {
        Self::new(
            wx.div_euclid(CHUNK_SIZE as i32),
            wy.div_euclid(CHUNK_SIZE as i32),
            wz.div_euclid(CHUNK_SIZE as i32),
        )
    }

    /// Splits a world position into its containing chunk coord and local
    /// `[0, 32)` block coordinates within that chunk.
    pub fn split_world(wx: i32, wy: i32, wz: i32) -> (ChunkCoord, u32, u32, u32) {
        let coord = Self::from_world(wx, wy, wz);
        let lx = wx.rem_euclid(CHUNK_SIZE as i32) as u32;
        let ly = wy.rem_euclid(CHUNK_SIZE as i32) as u32;
        let lz = wz.rem_euclid(CHUNK_SIZE as i32) as u32;
        (coord, lx, ly, lz)
    }

    pub const fn as_ivec3(self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }

    pub const fn neighbor(self, dx: i32, dy: i32, dz: i32) -> ChunkCoord {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Euclidean distance on the XZ plane, in chunk units, to another
    /// coord. Used by radius queries (spec.md §4.1) which intentionally
    /// ignore Y.
    pub fn xz_distance(self, other: ChunkCoord) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dz = (self.z - other.z) as f64;
        (dx * dx + dz * dz).sqrt()
    }
}

impl PartialOrd for ChunkCoord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ChunkCoord {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.x, self.y, self.z).cmp(&(other.x, other.y, other.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_world_coord_resolves_to_negative_chunk_and_high_local() {
        let (coord, lx, ly, lz) = ChunkCoord::split_world(-1, -1, -1);
        assert_eq!(coord, ChunkCoord::new(-1, -1, -1));
        assert_eq!((lx, ly, lz), (31, 31, 31));
    }

    #[test]
    fn origin_splits_to_chunk_zero_local_zero() {
        let (coord, lx, ly, lz) = ChunkCoord::split_world(0, 0, 0);
        assert_eq!(coord, ChunkCoord::new(0, 0, 0));
        assert_eq!((lx, ly, lz), (0, 0, 0));
    }

    #[test]
    fn world_coord_32_resolves_to_chunk_one() {
        let (coord, lx, _, _) = ChunkCoord::split_world(32, 0, 0);
        assert_eq!(coord, ChunkCoord::new(1, 0, 0));
        assert_eq!(lx, 0);
    }

    #[test]
    fn ordering_is_lexicographic() {
        assert!(ChunkCoord::new(0, 0, 0) < ChunkCoord::new(1, 0, 0));
        assert!(ChunkCoord::new(1, 0, 0) < ChunkCoord::new(1, 0, 1));
    }
}
