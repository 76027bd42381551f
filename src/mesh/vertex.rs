//! GPU vertex layout (spec.md §3). `bytemuck::Pod`/`Zeroable` so the
//! vertex buffer can be uploaded as raw bytes, following the teacher's
//! `#[repr(transparent)] unsafe impl bytemuck::Pod` idiom for POD wire
//! types (`world::block_id::BlockId`).

use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
    pub atlas_offset: [f32; 2],
    pub atlas_size: [f32; 2],
}

pub const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

/// Tint applied to the +Y face of Grass to colorize its otherwise
/// grayscale top texture (spec.md §4.3).
pub const GRASS_TOP_TINT: [f32; 3] = [0.4, 0.8, 0.3];
