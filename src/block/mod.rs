//! Block atom and per-type property table.
pub mod registry;
pub mod types;

pub use registry::{properties, BlockProperties};
pub use types::{Block, BlockType};
