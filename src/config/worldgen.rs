//! Generator tuning (spec.md §4.1 — "the generator is a function object
//! implementations may substitute"). Grounded on the teacher's
//! `config::worldgen::WorldGenConfig`, narrowed to the placeholder
//! rule's actual parameters instead of the teacher's unused `world_seed`
//! alone.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldGenConfig {
    pub seed: u64,
    /// World-Y at which the flat generator places Grass; Stone below,
    /// Air above (spec.md §4.1).
    pub grass_level: i32,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            grass_level: 0,
        }
    }
}
