//! The mesher's one external dependency: a texture-atlas UV lookup. The
//! core consumes a ready atlas (spec.md §1); this trait is the capability
//! interface the design notes call the mesher's "only polymorphism
//! requirement" (spec.md §9).

use glam::IVec3;

use crate::block::BlockType;

/// `uv_for(block_type, normal) -> (u_min, v_min, u_max, v_max)`.
pub trait UvSource {
    fn uv_for(&self, block_type: BlockType, normal: IVec3) -> (f32, f32, f32, f32);
}

/// Resolves the per-face block type the atlas should be consulted with:
/// Grass uses `GrassTop`/`Dirt`/`GrassSide` depending on face; every other
/// block uses a single entry for all six faces (spec.md §4.3).
pub fn face_block_type(block_type: BlockType, normal: IVec3) -> BlockType {
    if block_type != BlockType::Grass {
        return block_type;
    }
    match normal.y {
        1 => BlockType::GrassTop,
        -1 => BlockType::Dirt,
        _ => BlockType::GrassSide,
    }
}
