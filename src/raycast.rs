//! Voxel ray traversal (spec.md §4.5): Amanatides & Woo DDA. Generalized
//! from the teacher's `utils::ray::Ray`, which only intersects AABBs, to
//! a full per-axis stepping traversal over a block lookup closure.

use glam::{IVec3, Vec3};

use crate::block::BlockType;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub block_pos: IVec3,
    pub face_normal: IVec3,
    pub distance: f32,
    pub block_type: BlockType,
}

/// Casts `dir` (need not be pre-normalized; this function normalizes it)
/// from `origin` out to `t_max`, calling `lookup` once per voxel
/// entered. Returns the first non-air hit, or `None` if the ray escapes
/// `t_max` without striking anything solid.
pub fn cast<F>(origin: Vec3, dir: Vec3, t_max: f32, mut lookup: F) -> Option<RayHit>
where
    F: FnMut(IVec3) -> BlockType,
{
    let dir = dir.normalize();

    let mut voxel = IVec3::new(
        origin.x.floor() as i32,
        origin.y.floor() as i32,
        origin.z.floor() as i32,
    );

    let step = IVec3::new(
        signum_step(dir.x),
        signum_step(dir.y),
        signum_step(dir.z),
    );

    let t_delta = Vec3::new(
        axis_t_delta(dir.x),
        axis_t_delta(dir.y),
        axis_t_delta(dir.z),
    );

    let mut t_max_axis = Vec3::new(
        initial_t_max(origin.x, dir.x, voxel.x, step.x),
        initial_t_max(origin.y, dir.y, voxel.y, step.y),
        initial_t_max(origin.z, dir.z, voxel.z, step.z),
    );

    // Normal of the face last crossed; undefined (zero) until the first
    // step, matching the "entry face" semantics spec.md §4.5 wants: the
    // voxel containing `origin` itself is checked with no normal yet.
    let mut last_normal = IVec3::ZERO;
    let mut distance = 0.0f32;

    loop {
        let block_type = lookup(voxel);
        if block_type != BlockType::Air {
            return Some(RayHit {
                block_pos: voxel,
                face_normal: last_normal,
                distance,
                block_type,
            });
        }

        // Step the axis with the smallest tMax.
        if t_max_axis.x < t_max_axis.y && t_max_axis.x < t_max_axis.z {
            distance = t_max_axis.x;
            if distance > t_max {
                return None;
            }
            voxel.x += step.x;
            t_max_axis.x += t_delta.x;
            last_normal = IVec3::new(-step.x, 0, 0);
        } else if t_max_axis.y < t_max_axis.z {
            distance = t_max_axis.y;
            if distance > t_max {
                return None;
            }
            voxel.y += step.y;
            t_max_axis.y += t_delta.y;
            last_normal = IVec3::new(0, -step.y, 0);
        } else {
            distance = t_max_axis.z;
            if distance > t_max {
                return None;
            }
            voxel.z += step.z;
            t_max_axis.z += t_delta.z;
            last_normal = IVec3::new(0, 0, -step.z);
        }
    }
}

fn signum_step(component: f32) -> i32 {
    if component > 0.0 {
        1
    } else if component < 0.0 {
        -1
    } else {
        0
    }
}

/// Distance along the ray to cross one voxel on this axis; `+inf` when
/// the ray is parallel to the perpendicular planes (spec.md §4.5 — "near
/// zero yields +inf, no epsilon-division hazard").
fn axis_t_delta(component: f32) -> f32 {
    if component == 0.0 {
        f32::INFINITY
    } else {
        (1.0 / component).abs()
    }
}

fn initial_t_max(origin: f32, dir: f32, voxel: i32, step: i32) -> f32 {
    if step == 0 {
        return f32::INFINITY;
    }
    let boundary = if step > 0 { (voxel + 1) as f32 } else { voxel as f32 };
    (boundary - origin) / dir
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn solid_plane_at_x(threshold: i32) -> impl FnMut(IVec3) -> BlockType {
        move |v| {
            if v.x >= threshold {
                BlockType::Stone
            } else {
                BlockType::Air
            }
        }
    }

    #[test]
    fn ray_hits_solid_plane_with_inward_facing_normal() {
        let hit = cast(
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(1.0, 0.0, 0.0),
            100.0,
            solid_plane_at_x(5),
        )
        .expect("ray should hit the plane");
        assert_eq!(hit.block_pos, IVec3::new(5, 0, 0));
        assert_eq!(hit.face_normal, IVec3::new(-1, 0, 0));
        assert_eq!(hit.block_type, BlockType::Stone);
    }

    /// spec.md §8 scenario 5: a single Stone block at (3, 0, 0), cast from
    /// (0, 0.5, 0) along +X, expects distance ~= 3.0.
    #[test]
    fn cast_against_a_single_known_block_matches_the_documented_scenario() {
        let hit = cast(
            Vec3::new(0.0, 0.5, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            10.0,
            |v| if v == IVec3::new(3, 0, 0) { BlockType::Stone } else { BlockType::Air },
        )
        .expect("ray should hit the lone block");
        assert_eq!(hit.block_pos, IVec3::new(3, 0, 0));
        assert_eq!(hit.face_normal, IVec3::new(-1, 0, 0));
        assert_relative_eq!(hit.distance, 3.0, epsilon = 1e-4);
        assert_eq!(hit.block_type, BlockType::Stone);
    }

    #[test]
    fn ray_through_all_air_escapes_within_t_max() {
        let hit = cast(Vec3::new(0.5, 0.5, 0.5), Vec3::new(1.0, 0.0, 0.0), 10.0, |_| {
            BlockType::Air
        });
        assert!(hit.is_none());
    }

    #[test]
    fn ray_stops_exactly_at_t_max_without_reaching_block() {
        let hit = cast(
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(1.0, 0.0, 0.0),
            2.0,
            solid_plane_at_x(50),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn axis_aligned_ray_never_divides_by_zero() {
        let hit = cast(
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(0.0, 1.0, 0.0),
            5.0,
            |v| if v.y >= 3 { BlockType::Stone } else { BlockType::Air },
        )
        .expect("vertical ray should hit the plane");
        assert_eq!(hit.block_pos, IVec3::new(0, 3, 0));
        assert_eq!(hit.face_normal, IVec3::new(0, -1, 0));
    }

    #[test]
    fn immediate_hit_when_origin_voxel_is_already_solid() {
        let hit = cast(Vec3::new(0.5, 0.5, 0.5), Vec3::new(1.0, 0.0, 0.0), 10.0, |_| {
            BlockType::Stone
        })
        .expect("origin voxel is solid");
        assert_eq!(hit.block_pos, IVec3::new(0, 0, 0));
        assert_eq!(hit.face_normal, IVec3::ZERO);
        assert_eq!(hit.distance, 0.0);
    }
}
