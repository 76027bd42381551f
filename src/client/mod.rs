//! Client-side chunk cache, mesh pipeline, GPU sink boundary, and input
//! dispatch (spec.md §4.4/§6).
pub mod cache;
pub mod input;
pub mod pipeline;
pub mod sink;

pub use cache::ChunkCache;
pub use input::{InputState, Key, MouseButton};
pub use pipeline::{ChunkPipeline, MeshResult};
pub use sink::{FrameUniforms, GpuSink, NullSink};
