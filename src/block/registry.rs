//! Per-block-type properties, built once at init and then passed around by
//! reference — not a process-wide singleton (design notes, spec.md §9:
//! "Re-architect [global mutable state] as values owned by the Client
//! struct and passed by reference").

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::types::BlockType;

/// Static (but not global-mutable) per-type metadata. Built once and
/// shared via `&'static` reference — nothing in here is ever mutated.
#[derive(Debug, Clone, Copy)]
pub struct BlockProperties {
    pub display_name: &'static str,
    pub solid: bool,
    pub transparent: bool,
}

static PROPERTIES: Lazy<HashMap<BlockType, BlockProperties>> = Lazy::new(|| {
    use BlockType::*;
    let mut map = HashMap::new();
    let mut add = |bt: BlockType, display_name: &'static str| {
        map.insert(
            bt,
            BlockProperties {
                display_name,
                solid: bt.is_solid(),
                transparent: bt.is_air(),
            },
        );
    };
    add(Air, "Air");
    add(Stone, "Stone");
    add(Dirt, "Dirt");
    add(Cobblestone, "Cobblestone");
    add(Wood, "Wood");
    add(Sand, "Sand");
    add(Brick, "Brick");
    add(Snow, "Snow");
    add(Grass, "Grass");
    add(GrassSide, "Grass Side");
    add(GrassTop, "Grass Top");
    map
});

/// Look up the static properties for a block type.
///
/// Every `BlockType` variant is populated at construction, so this never
/// fails in practice; unknown/out-of-range discriminants are normalized to
/// `Air` upstream by `BlockType::from_u16` before they ever reach here.
pub fn properties(block_type: BlockType) -> BlockProperties {
    *PROPERTIES
        .get(&block_type)
        .unwrap_or(&PROPERTIES[&BlockType::Air])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_has_properties() {
        for bt in [
            BlockType::Air,
            BlockType::Stone,
            BlockType::Dirt,
            BlockType::Cobblestone,
            BlockType::Wood,
            BlockType::Sand,
            BlockType::Brick,
            BlockType::Snow,
            BlockType::Grass,
            BlockType::GrassSide,
            BlockType::GrassTop,
        ] {
            let props = properties(bt);
            assert_eq!(props.solid, bt.is_solid());
        }
    }

    #[test]
    fn air_is_transparent_all_else_opaque() {
        assert!(properties(BlockType::Air).transparent);
        assert!(!properties(BlockType::Stone).transparent);
    }
}
