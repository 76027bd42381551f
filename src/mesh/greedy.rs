//! Greedy meshing: per-axis sweep over a chunk and its (up to six) live
//! neighbors, merging coplanar same-type faces into the largest possible
//! rectangles (spec.md §4.3).
//!
//! The vertex-buffer output shape is grounded on the teacher's
//! `render::mesh::MeshData` (`vertices`/`normals`/`tex_coords`/`indices`);
//! the merge algorithm itself has no teacher equivalent (the teacher's
//! own chunk mesher is a stub) and is grounded on the
//! `other_examples` greedy-mesher/notcraft/sixthsurge-voxels reference
//! implementations, expressed in the teacher's module and naming idiom.

use glam::IVec3;

use crate::block::{Block, BlockType};
use crate::mesh::atlas::{face_block_type, UvSource};
use crate::mesh::vertex::{Vertex, GRASS_TOP_TINT, WHITE};
use crate::world::chunk::{Chunk, CHUNK_SIZE};

/// Up to six live neighbor chunks, one per face direction. Absent
/// neighbors are treated as all-air (spec.md §4.3).
#[derive(Default)]
pub struct Neighbors<'a> {
    pub neg_x: Option<&'a Chunk>,
    pub pos_x: Option<&'a Chunk>,
    pub neg_y: Option<&'a Chunk>,
    pub pos_y: Option<&'a Chunk>,
    pub neg_z: Option<&'a Chunk>,
    pub pos_z: Option<&'a Chunk>,
}

#[derive(Debug, Default, Clone)]
pub struct MeshOutput {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshOutput {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

const SIZE: i32 = CHUNK_SIZE as i32;

/// Samples a block at local coordinates that may run one step outside
/// `[0, 32)` on a single axis, dispatching into the appropriate neighbor
/// (or treating it as air if that neighbor isn't loaded). At most one
/// axis is ever out of range for a call the mesher makes — the sweep
/// only steps the normal axis past the chunk boundary.
fn sample(chunk: &Chunk, neighbors: &Neighbors, x: i32, y: i32, z: i32) -> Block {
    let from = |c: Option<&Chunk>, x: i32, y: i32, z: i32| -> Block {
        match c {
            Some(c) => c.get_block(x as u32, y as u32, z as u32),
            None => Block::AIR,
        }
    };
    if x < 0 {
        return from(neighbors.neg_x, x + SIZE, y, z);
    }
    if x >= SIZE {
        return from(neighbors.pos_x, x - SIZE, y, z);
    }
    if y < 0 {
        return from(neighbors.neg_y, x, y + SIZE, z);
    }
    if y >= SIZE {
        return from(neighbors.pos_y, x, y - SIZE, z);
    }
    if z < 0 {
        return from(neighbors.neg_z, x, y, z + SIZE);
    }
    if z >= SIZE {
        return from(neighbors.pos_z, x, y, z - SIZE);
    }
    chunk.get_block(x as u32, y as u32, z as u32)
}

/// Tangent-axis assignment per sweep axis. ±X faces swap U/V relative to
/// the "natural" assignment so merged textures don't appear rotated when
/// viewed from the side (spec.md §4.3).
fn tangent_axes(axis: usize) -> (usize, usize) {
    match axis {
        0 => (2, 1), // X faces: U = Z, V = Y
        1 => (0, 2), // Y faces: U = X, V = Z
        _ => (0, 1), // Z faces: U = X, V = Y
    }
}

fn axis_point(axis: usize, u_axis: usize, v_axis: usize, a_coord: i32, u: i32, v: i32) -> [i32; 3] {
    let mut p = [0i32; 3];
    p[axis] = a_coord;
    p[u_axis] = u;
    p[v_axis] = v;
    p
}

fn face_normal(axis: usize, dir: i32) -> IVec3 {
    let mut n = [0i32; 3];
    n[axis] = dir;
    IVec3::new(n[0], n[1], n[2])
}

/// Runs the full six-sweep greedy mesh for `chunk` against `neighbors`,
/// consulting `atlas` for per-face texture coordinates.
pub fn mesh_chunk(chunk: &Chunk, neighbors: &Neighbors, atlas: &dyn UvSource) -> MeshOutput {
    let mut out = MeshOutput::default();
    for axis in 0..3 {
        for &dir in &[-1i32, 1i32] {
            mesh_slice_sweep(chunk, neighbors, atlas, axis, dir, &mut out);
        }
    }
    out
}

fn mesh_slice_sweep(
    chunk: &Chunk,
    neighbors: &Neighbors,
    atlas: &dyn UvSource,
    axis: usize,
    dir: i32,
    out: &mut MeshOutput,
) {
    let (u_axis, v_axis) = tangent_axes(axis);
    let normal = face_normal(axis, dir);

    for s in 0..SIZE {
        let mut mask: [[Option<BlockType>; CHUNK_SIZE as usize]; CHUNK_SIZE as usize] =
            [[None; CHUNK_SIZE as usize]; CHUNK_SIZE as usize];

        for u in 0..SIZE {
            for v in 0..SIZE {
                let p = axis_point(axis, u_axis, v_axis, s, u, v);
                let current = sample(chunk, neighbors, p[0], p[1], p[2]);
                if current.is_air() {
                    continue;
                }
                let np = axis_point(axis, u_axis, v_axis, s + dir, u, v);
                let neighbor = sample(chunk, neighbors, np[0], np[1], np[2]);
                if neighbor.is_air() || neighbor.block_type != current.block_type {
                    mask[u as usize][v as usize] = Some(current.block_type);
                }
            }
        }

        greedy_merge_and_emit(&mut mask, axis, u_axis, v_axis, s, dir, normal, atlas, out);
    }
}

#[allow(clippy::too_many_arguments)]
fn greedy_merge_and_emit(
    mask: &mut [[Option<BlockType>; CHUNK_SIZE as usize]; CHUNK_SIZE as usize],
    axis: usize,
    u_axis: usize,
    v_axis: usize,
    s: i32,
    dir: i32,
    normal: IVec3,
    atlas: &dyn UvSource,
    out: &mut MeshOutput,
) {
    let size = CHUNK_SIZE as usize;
    for v0 in 0..size {
        let mut u0 = 0;
        while u0 < size {
            let Some(block_type) = mask[u0][v0] else {
                u0 += 1;
                continue;
            };

            let mut w = 1;
            while u0 + w < size && mask[u0 + w][v0] == Some(block_type) {
                w += 1;
            }

            let mut h = 1;
            'grow_height: while v0 + h < size {
                for du in 0..w {
                    if mask[u0 + du][v0 + h] != Some(block_type) {
                        break 'grow_height;
                    }
                }
                h += 1;
            }

            for dv in 0..h {
                for du in 0..w {
                    mask[u0 + du][v0 + dv] = None;
                }
            }

            emit_quad(
                axis, u_axis, v_axis, s, dir, u0 as i32, v0 as i32, w as i32, h as i32,
                block_type, normal, atlas, out,
            );

            u0 += w;
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn emit_quad(
    axis: usize,
    u_axis: usize,
    v_axis: usize,
    s: i32,
    dir: i32,
    u0: i32,
    v0: i32,
    w: i32,
    h: i32,
    block_type: BlockType,
    normal: IVec3,
    atlas: &dyn UvSource,
    out: &mut MeshOutput,
) {
    // +faces sit on the far side of the voxel (spec.md §4.3 step 3).
    let a_coord = if dir > 0 { s + 1 } else { s };

    let corners_uv = [(u0, v0), (u0 + w, v0), (u0 + w, v0 + h), (u0, v0 + h)];
    let tex_coords = [(0.0, 0.0), (w as f32, 0.0), (w as f32, h as f32), (0.0, h as f32)];

    let face_type = face_block_type(block_type, normal);
    let (u_min, v_min, u_max, v_max) = atlas.uv_for(face_type, normal);
    let atlas_offset = [u_min, v_min];
    let atlas_size = [u_max - u_min, v_max - v_min];

    let color = if block_type == BlockType::Grass && normal.y == 1 {
        GRASS_TOP_TINT
    } else {
        WHITE
    };

    let mut positions = [[0.0f32; 3]; 4];
    for (i, &(u, v)) in corners_uv.iter().enumerate() {
        let p = axis_point(axis, u_axis, v_axis, a_coord, u, v);
        positions[i] = [p[0] as f32, p[1] as f32, p[2] as f32];
    }

    let base = out.vertices.len() as u32;
    for i in 0..4 {
        let (tu, tv) = tex_coords[i];
        // Flip V on emission to match top-down atlas UV conventions
        // (spec.md §4.3).
        let tv_flipped = h as f32 - tv;
        out.vertices.push(Vertex {
            position: positions[i],
            color,
            normal: [normal.x as f32, normal.y as f32, normal.z as f32],
            tex_coord: [tu, tv_flipped],
            atlas_offset,
            atlas_size,
        });
    }

    // Winding: the four corners above are CCW when viewed from the +dir
    // side; for dir < 0 the triangle order is reversed so the face still
    // fronts the outward normal.
    if dir > 0 {
        out.indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    } else {
        out.indices.extend_from_slice(&[base, base + 2, base + 1, base + 2, base, base + 3]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::atlas::UvSource;
    use crate::world::chunk_coord::ChunkCoord;

    struct UnitAtlas;
    impl UvSource for UnitAtlas {
        fn uv_for(&self, _block_type: BlockType, _normal: IVec3) -> (f32, f32, f32, f32) {
            (0.0, 0.0, 1.0, 1.0)
        }
    }

    fn solid_chunk(coord: ChunkCoord, block_type: BlockType) -> Chunk {
        Chunk::from_blocks(coord, vec![Block::new(block_type); crate::world::chunk::CHUNK_VOLUME])
    }

    #[test]
    fn empty_chunk_produces_no_triangles() {
        let chunk = Chunk::new(ChunkCoord::new(0, 0, 0));
        let mesh = mesh_chunk(&chunk, &Neighbors::default(), &UnitAtlas);
        assert!(mesh.is_empty());
    }

    #[test]
    fn lone_solid_chunk_meshes_exactly_six_outer_faces() {
        let chunk = solid_chunk(ChunkCoord::new(0, 0, 0), BlockType::Stone);
        let mesh = mesh_chunk(&chunk, &Neighbors::default(), &UnitAtlas);
        // Every outer face is one 32x32 merged quad: 6 faces * 2 triangles.
        assert_eq!(mesh.indices.len(), 6 * 6);
        assert_eq!(mesh.vertices.len(), 6 * 4);
    }

    #[test]
    fn fully_enclosed_solid_chunk_produces_zero_triangles() {
        let chunk = solid_chunk(ChunkCoord::new(0, 0, 0), BlockType::Stone);
        let neg_x = solid_chunk(ChunkCoord::new(-1, 0, 0), BlockType::Stone);
        let pos_x = solid_chunk(ChunkCoord::new(1, 0, 0), BlockType::Stone);
        let neg_y = solid_chunk(ChunkCoord::new(0, -1, 0), BlockType::Stone);
        let pos_y = solid_chunk(ChunkCoord::new(0, 1, 0), BlockType::Stone);
        let neg_z = solid_chunk(ChunkCoord::new(0, 0, -1), BlockType::Stone);
        let pos_z = solid_chunk(ChunkCoord::new(0, 0, 1), BlockType::Stone);

        let neighbors = Neighbors {
            neg_x: Some(&neg_x),
            pos_x: Some(&pos_x),
            neg_y: Some(&neg_y),
            pos_y: Some(&pos_y),
            neg_z: Some(&neg_z),
            pos_z: Some(&pos_z),
        };

        let mesh = mesh_chunk(&chunk, &neighbors, &UnitAtlas);
        assert!(mesh.is_empty());
    }

    #[test]
    fn cross_chunk_face_culling_hides_shared_boundary() {
        let mut a = Chunk::new(ChunkCoord::new(0, 0, 0));
        let mut b = Chunk::new(ChunkCoord::new(1, 0, 0));
        for z in 0..32 {
            for y in 0..32 {
                a.set_block(31, y, z, Block::new(BlockType::Stone));
                b.set_block(0, y, z, Block::new(BlockType::Stone));
            }
        }

        let mesh_a = mesh_chunk(
            &a,
            &Neighbors {
                pos_x: Some(&b),
                ..Default::default()
            },
            &UnitAtlas,
        );
        let mesh_b = mesh_chunk(
            &b,
            &Neighbors {
                neg_x: Some(&a),
                ..Default::default()
            },
            &UnitAtlas,
        );

        let has_face_at_x = |mesh: &MeshOutput, x: f32| {
            mesh.vertices.iter().any(|v| v.position[0] == x && v.normal[0] != 0.0)
        };
        assert!(!has_face_at_x(&mesh_a, 32.0));
        assert!(!has_face_at_x(&mesh_b, 0.0));
    }

    #[test]
    fn grass_top_face_gets_tint_and_other_faces_stay_white() {
        let chunk = solid_chunk(ChunkCoord::new(0, 0, 0), BlockType::Grass);
        let mesh = mesh_chunk(&chunk, &Neighbors::default(), &UnitAtlas);
        let top_tinted = mesh
            .vertices
            .iter()
            .any(|v| v.normal == [0.0, 1.0, 0.0] && v.color == GRASS_TOP_TINT);
        let side_white = mesh
            .vertices
            .iter()
            .any(|v| v.normal == [1.0, 0.0, 0.0] && v.color == WHITE);
        assert!(top_tinted);
        assert!(side_white);
    }
}
