//! The GPU upload sink contract (spec.md §6): what the rendering backend
//! promises the core. The core treats it purely as a capability
//! interface — pipeline creation, swapchain, descriptor sets, and the
//! rest of the Vulkan/GL plumbing are explicitly out of scope (spec.md
//! §1) and live entirely behind this trait.

use glam::Vec3;

use crate::mesh::Vertex;
use crate::world::ChunkCoord;

/// `{model, view, projection, light_pos, view_pos}` per spec.md §1's
/// sink contract; `model` is omitted here since the core always uploads
/// chunk geometry pre-transformed into world space (spec.md §4.3 emits
/// world-space positions directly).
#[derive(Debug, Clone, Copy)]
pub struct FrameUniforms {
    pub view: glam::Mat4,
    pub projection: glam::Mat4,
    pub light_pos: Vec3,
    pub view_pos: Vec3,
}

pub trait GpuSink {
    /// Replaces any prior buffers for `coord`.
    fn upload_chunk(&mut self, coord: ChunkCoord, vertices: &[Vertex], indices: &[u32]);

    /// Releases GPU resources for `coord`; a subsequent upload for the
    /// same coord is legal.
    fn evict_chunk(&mut self, coord: ChunkCoord);

    /// Renders every currently uploaded chunk in one batched draw;
    /// returns whether the swap presented cleanly.
    fn draw_frame(&mut self, uniforms: FrameUniforms) -> bool;
}

/// A sink that does nothing but bookkeeping — exercises the core's
/// upload/evict/draw call pattern without a real graphics backend.
/// Grounded on the teacher's own test doubles for subsystems it stubs
/// (e.g. `FlatWorldGenerator` standing in for a real terrain generator).
#[derive(Debug, Default)]
pub struct NullSink {
    pub uploaded: std::collections::HashSet<ChunkCoord>,
    pub draw_calls: u64,
}

impl GpuSink for NullSink {
    fn upload_chunk(&mut self, coord: ChunkCoord, _vertices: &[Vertex], _indices: &[u32]) {
        self.uploaded.insert(coord);
    }

    fn evict_chunk(&mut self, coord: ChunkCoord) {
        self.uploaded.remove(&coord);
    }

    fn draw_frame(&mut self, _uniforms: FrameUniforms) -> bool {
        self.draw_calls += 1;
        true
    }
}
