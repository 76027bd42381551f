//! The block atom. Blocks are plain values — 2 bytes each, room for future
//! metadata without a layout change (see spec.md §3).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag for the eleven block types the core knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum BlockType {
    Air = 0,
    Stone = 1,
    Dirt = 2,
    Cobblestone = 3,
    Wood = 4,
    Sand = 5,
    Brick = 6,
    Snow = 7,
    Grass = 8,
    GrassSide = 9,
    GrassTop = 10,
}

impl BlockType {
    const VARIANTS: [BlockType; 11] = [
        BlockType::Air,
        BlockType::Stone,
        BlockType::Dirt,
        BlockType::Cobblestone,
        BlockType::Wood,
        BlockType::Sand,
        BlockType::Brick,
        BlockType::Snow,
        BlockType::Grass,
        BlockType::GrassSide,
        BlockType::GrassTop,
    ];

    /// Round-trips a raw wire/disk value back into a `BlockType`.
    ///
    /// Unknown values fall back to `Air` rather than failing the whole
    /// decode — a single corrupt block shouldn't sink an entire chunk.
    pub fn from_u16(raw: u16) -> Self {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|v| *v as u16 == raw)
            .unwrap_or(BlockType::Air)
    }

    pub const fn is_air(self) -> bool {
        matches!(self, BlockType::Air)
    }

    /// `Air` is the only transparent value; everything else is solid and
    /// occluding (spec.md §3).
    pub const fn is_solid(self) -> bool {
        !self.is_air()
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockType::Air => "Air",
            BlockType::Stone => "Stone",
            BlockType::Dirt => "Dirt",
            BlockType::Cobblestone => "Cobblestone",
            BlockType::Wood => "Wood",
            BlockType::Sand => "Sand",
            BlockType::Brick => "Brick",
            BlockType::Snow => "Snow",
            BlockType::Grass => "Grass",
            BlockType::GrassSide => "GrassSide",
            BlockType::GrassTop => "GrassTop",
        };
        write!(f, "{name}")
    }
}

/// A single voxel. Two bytes on the wire and on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Block {
    pub block_type: BlockType,
}

impl Default for BlockType {
    fn default() -> Self {
        BlockType::Air
    }
}

impl Block {
    pub const AIR: Block = Block {
        block_type: BlockType::Air,
    };

    pub const fn new(block_type: BlockType) -> Self {
        Self { block_type }
    }

    pub const fn is_air(self) -> bool {
        self.block_type.is_air()
    }

    pub const fn is_solid(self) -> bool {
        self.block_type.is_solid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn air_is_the_only_transparent_value() {
        assert!(BlockType::Air.is_air());
        for &bt in BlockType::VARIANTS.iter().filter(|b| **b != BlockType::Air) {
            assert!(bt.is_solid(), "{bt} should be solid");
        }
    }

    #[test]
    fn from_u16_round_trips_known_values() {
        for &bt in &BlockType::VARIANTS {
            assert_eq!(BlockType::from_u16(bt as u16), bt);
        }
    }

    #[test]
    fn from_u16_falls_back_to_air_on_unknown_value() {
        assert_eq!(BlockType::from_u16(9999), BlockType::Air);
    }

    #[test]
    fn default_block_is_air() {
        assert_eq!(Block::default(), Block::AIR);
    }
}
