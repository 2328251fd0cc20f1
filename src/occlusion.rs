//! Separating-axis tests and front/behind decisions for pairs of blocks.

use crate::bounds::{bounds, iso_bounds};
use crate::types::{Block, Front, IsoAxis, SpaceAxis};

/// True if `[amin, amax)` and `[bmin, bmax)` do not overlap.
///
/// Ranges sharing only an endpoint count as disjoint, so blocks that exactly
/// abut never occlude each other.
pub fn ranges_disjoint(amin: f64, amax: f64, bmin: f64, bmax: f64) -> bool {
    amax <= bmin || bmax <= amin
}

/// First space axis (X, then Y, then Z) on which the blocks are disjoint.
///
/// `None` means the blocks intersect in space.
pub fn space_sep_axis(a: &Block, b: &Block) -> Option<SpaceAxis> {
    let (a, b) = (bounds(a), bounds(b));
    if ranges_disjoint(a.min_x, a.max_x, b.min_x, b.max_x) {
        Some(SpaceAxis::X)
    } else if ranges_disjoint(a.min_y, a.max_y, b.min_y, b.max_y) {
        Some(SpaceAxis::Y)
    } else if ranges_disjoint(a.min_z, a.max_z, b.min_z, b.max_z) {
        Some(SpaceAxis::Z)
    } else {
        None
    }
}

/// First iso axis (X, then Y, then H) on which the projections are disjoint.
///
/// `None` means the silhouettes overlap on screen.
pub fn iso_sep_axis(a: &Block, b: &Block) -> Option<IsoAxis> {
    let (a, b) = (iso_bounds(a), iso_bounds(b));
    if ranges_disjoint(a.min_x, a.max_x, b.min_x, b.max_x) {
        Some(IsoAxis::X)
    } else if ranges_disjoint(a.min_y, a.max_y, b.min_y, b.max_y) {
        Some(IsoAxis::Y)
    } else if ranges_disjoint(a.min_h, a.max_h, b.min_h, b.max_h) {
        Some(IsoAxis::H)
    } else {
        None
    }
}

/// True when the two silhouettes overlap on screen (no iso separating axis).
pub fn blocks_overlap(a: &Block, b: &Block) -> bool {
    iso_sep_axis(a, b).is_none()
}

/// True when the two blocks share interior volume.
pub fn blocks_intersect(a: &Block, b: &Block) -> bool {
    space_sep_axis(a, b).is_none()
}

/// Which block is drawn in front, decided on the first disjoint space axis.
///
/// On X and Y the block with the smaller minimum is nearer the viewer; on Z
/// the higher block is in front. Intersecting blocks have no defined front.
pub fn front_block(a: &Block, b: &Block) -> Option<Front> {
    let axis = space_sep_axis(a, b)?;
    let (ba, bb) = (bounds(a), bounds(b));
    let first_in_front = match axis {
        SpaceAxis::X => ba.min_x < bb.min_x,
        SpaceAxis::Y => ba.min_y < bb.min_y,
        SpaceAxis::Z => ba.min_z > bb.min_z,
    };
    Some(if first_in_front {
        Front::First
    } else {
        Front::Second
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{DVec3, dvec3};

    fn unit(x: f64, y: f64, z: f64) -> Block {
        Block::unit(dvec3(x, y, z))
    }

    #[test]
    fn disjointness_is_symmetric() {
        let samples = [-2.0, -0.5, 0.0, 0.5, 1.0, 1.5, 3.0];
        for &amin in &samples {
            for &alen in &[0.0, 0.5, 1.0, 2.0] {
                for &bmin in &samples {
                    for &blen in &[0.0, 1.0, 2.5] {
                        let (amax, bmax) = (amin + alen, bmin + blen);
                        assert_eq!(
                            ranges_disjoint(amin, amax, bmin, bmax),
                            ranges_disjoint(bmin, bmax, amin, amax),
                            "[{amin},{amax}) vs [{bmin},{bmax})"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn touching_ranges_are_disjoint() {
        assert!(ranges_disjoint(0.0, 1.0, 1.0, 2.0));
        assert!(!ranges_disjoint(0.0, 1.0, 0.5, 2.0));
    }

    #[test]
    fn space_axes_are_tested_in_order() {
        let a = unit(0.0, 0.0, 0.0);
        assert_eq!(space_sep_axis(&a, &unit(2.0, 2.0, 2.0)), Some(SpaceAxis::X));
        assert_eq!(space_sep_axis(&a, &unit(0.0, 1.0, 5.0)), Some(SpaceAxis::Y));
        assert_eq!(space_sep_axis(&a, &unit(0.0, 0.0, 1.0)), Some(SpaceAxis::Z));
        assert_eq!(space_sep_axis(&a, &unit(0.5, 0.5, 0.5)), None);
        assert!(blocks_intersect(&a, &unit(0.5, 0.5, 0.5)));
    }

    #[test]
    fn stacked_block_is_in_front() {
        let a = unit(0.0, 0.0, 0.0);
        let b = unit(0.0, 0.0, 1.0);
        assert_eq!(front_block(&a, &b), Some(Front::Second));
        assert_eq!(front_block(&b, &a), Some(Front::First));
    }

    #[test]
    fn nearer_ground_block_is_in_front() {
        let near = unit(0.0, 0.0, 0.0);
        assert_eq!(front_block(&near, &unit(1.0, 0.0, 0.0)), Some(Front::First));
        assert_eq!(front_block(&unit(0.0, 1.0, 0.0), &near), Some(Front::Second));
    }

    #[test]
    fn intersecting_blocks_have_no_front() {
        let a = Block::new(DVec3::ZERO, dvec3(2.0, 2.0, 2.0));
        assert_eq!(front_block(&a, &unit(1.0, 1.0, 1.0)), None);
    }

    #[test]
    fn far_apart_blocks_separate_on_screen() {
        let a = unit(0.0, 0.0, 0.0);
        let b = unit(2.0, 2.0, 0.0);
        assert_eq!(iso_sep_axis(&a, &b), Some(IsoAxis::X));
        assert!(!blocks_overlap(&a, &b));
        assert!(blocks_overlap(&a, &unit(1.0, 1.0, 0.0)));
    }
}
