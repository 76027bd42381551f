//! World storage & chunk lifecycle (spec.md §3/§4.1), the RLE wire codec
//! (§4.2), and the on-disk chunk format (§3/§6).
pub mod chunk;
pub mod chunk_coord;
pub mod chunk_file;
pub mod error;
pub mod generator;
pub mod rle;
pub mod world;

pub use chunk::{Chunk, CHUNK_SIZE, CHUNK_VOLUME};
pub use chunk_coord::ChunkCoord;
pub use error::{WorldError, WorldResult};
pub use generator::{FlatWorldGenerator, WorldGenerator};
pub use world::World;
