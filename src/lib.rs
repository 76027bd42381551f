//! Networked voxel sandbox core engine: world storage, chunk streaming,
//! greedy meshing, and the server tick loop.

pub mod block;
pub mod client;
pub mod config;
pub mod error;
pub mod mesh;
pub mod net;
pub mod protocol;
pub mod raycast;
pub mod server;
pub mod world;

pub use error::{EngineError, Result};

/// Engine prelude: the handful of types most call sites need in scope.
pub mod prelude {
    pub use crate::block::{Block, BlockType};
    pub use crate::error::{EngineError, Result};
    pub use crate::world::{Chunk, ChunkCoord, World};

    pub use glam::{IVec3, Mat4, Vec2, Vec3, Vec4};
    pub use parking_lot::{Mutex, RwLock};
}

/// Current engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
