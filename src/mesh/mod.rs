//! Greedy meshing pipeline (spec.md §4.3): turns a chunk plus its six
//! neighbors into a vertex/index buffer, merging coplanar same-type faces
//! into the largest rectangles the mask allows.
pub mod atlas;
pub mod greedy;
pub mod vertex;

pub use atlas::UvSource;
pub use greedy::{mesh_chunk, MeshOutput, Neighbors};
pub use vertex::Vertex;
