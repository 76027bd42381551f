//! Block-edit validation (spec.md §4.7 step 1 / §4.9): distance check,
//! loaded-chunk check, and current-block check, applied before any
//! `BlockPlace`/`BlockBreak` is allowed to mutate the world.

use glam::{IVec3, Vec3};
use thiserror::Error;

use crate::world::World;

/// spec.md §4.7: "validate (distance from player ≤ 15 blocks; ...)".
pub const MAX_EDIT_DISTANCE: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Place,
    Break,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum EditRejection {
    #[error("target is {0:.1} blocks away, exceeds the maximum edit distance")]
    TooFar(f32),
    #[error("containing chunk is not loaded")]
    ChunkNotLoaded,
    #[error("target block is not air")]
    NotAir,
    #[error("target block is air")]
    IsAir,
}

/// Validates one block edit against the rules in spec.md §4.7: the
/// target must be within `MAX_EDIT_DISTANCE` of the player, its chunk
/// must already be loaded (edits never auto-load, per `World::
/// set_block_at`'s contract), and for a place the current block must be
/// air while for a break it must not be.
pub fn validate_edit(world: &World, player_pos: Vec3, target: IVec3, kind: EditKind) -> Result<(), EditRejection> {
    let target_center = Vec3::new(target.x as f32, target.y as f32, target.z as f32) + Vec3::splat(0.5);
    let distance = target_center.distance(player_pos);
    if distance > MAX_EDIT_DISTANCE {
        return Err(EditRejection::TooFar(distance));
    }

    let current = world
        .get_block_at(target.x, target.y, target.z)
        .ok_or(EditRejection::ChunkNotLoaded)?;

    match kind {
        EditKind::Place if !current.is_air() => Err(EditRejection::NotAir),
        EditKind::Break if current.is_air() => Err(EditRejection::IsAir),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Block, BlockType};
    use crate::world::ChunkCoord;

    #[test]
    fn rejects_edit_far_outside_max_distance() {
        let dir = tempfile::tempdir().unwrap();
        let world = World::with_default_generator(dir.path());
        world.load_chunk(ChunkCoord::new(0, 0, 0));
        let result = validate_edit(&world, Vec3::new(0.0, 5.0, 0.0), IVec3::new(100, 5, 0), EditKind::Break);
        assert!(matches!(result, Err(EditRejection::TooFar(_))));
    }

    #[test]
    fn rejects_edit_in_an_unloaded_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let world = World::with_default_generator(dir.path());
        let result = validate_edit(&world, Vec3::new(0.0, 5.0, 0.0), IVec3::new(1, 5, 1), EditKind::Place);
        assert_eq!(result, Err(EditRejection::ChunkNotLoaded));
    }

    #[test]
    fn rejects_placing_on_a_solid_block() {
        let dir = tempfile::tempdir().unwrap();
        let world = World::with_default_generator(dir.path());
        world.load_chunk(ChunkCoord::new(0, 0, 0));
        // y=0 is Grass under the default generator.
        let result = validate_edit(&world, Vec3::new(0.0, 5.0, 0.0), IVec3::new(0, 0, 0), EditKind::Place);
        assert_eq!(result, Err(EditRejection::NotAir));
    }

    #[test]
    fn rejects_breaking_air() {
        let dir = tempfile::tempdir().unwrap();
        let world = World::with_default_generator(dir.path());
        world.load_chunk(ChunkCoord::new(0, 0, 0));
        let result = validate_edit(&world, Vec3::new(0.0, 5.0, 0.0), IVec3::new(0, 1, 0), EditKind::Break);
        assert_eq!(result, Err(EditRejection::IsAir));
    }

    #[test]
    fn accepts_a_valid_place_and_a_valid_break() {
        let dir = tempfile::tempdir().unwrap();
        let world = World::with_default_generator(dir.path());
        world.load_chunk(ChunkCoord::new(0, 0, 0));
        assert!(validate_edit(&world, Vec3::new(0.0, 5.0, 0.0), IVec3::new(0, 1, 0), EditKind::Place).is_ok());
        assert!(validate_edit(&world, Vec3::new(0.0, 5.0, 0.0), IVec3::new(0, 0, 0), EditKind::Break).is_ok());
        assert!(world.set_block_at(0, 1, 0, Block::new(BlockType::Stone)));
    }
}
