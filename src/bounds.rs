//! Bounds and named corners of a block in space and iso coordinates.

use glam::{DVec3, dvec3};

use crate::camera::Camera;
use crate::types::{Block, Bounds, IsoBounds, IsoPoint, Verts};

/// Min and max of a block along each space axis.
pub fn bounds(block: &Block) -> Bounds {
    let DVec3 { x, y, z } = block.position;
    let DVec3 { x: sx, y: sy, z: sz } = block.size;
    Bounds {
        min_x: x,
        max_x: x + sx,
        min_y: y,
        max_y: y + sy,
        min_z: z,
        max_z: z + sz,
    }
}

/// Min and max of a block's projection along the iso `x`, `y` and `h` axes.
///
/// `front_down`/`back_up` are the extremes on both ground axes, and
/// `left_down`/`right_down` bound the hexagonal silhouette horizontally.
pub fn iso_bounds(block: &Block) -> IsoBounds {
    let v = iso_verts(block);
    IsoBounds {
        min_x: v.front_down.x,
        max_x: v.back_up.x,
        min_y: v.front_down.y,
        max_y: v.back_up.y,
        min_h: v.left_down.h,
        max_h: v.right_down.h,
    }
}

/// The eight corners of a block in space, named by apparent screen role.
pub fn named_space_verts(block: &Block) -> Verts<DVec3> {
    let DVec3 { x, y, z } = block.position;
    let DVec3 { x: sx, y: sy, z: sz } = block.size;
    Verts {
        right_down: dvec3(x + sx, y, z),
        left_down: dvec3(x, y + sy, z),
        back_down: dvec3(x + sx, y + sy, z),
        front_down: dvec3(x, y, z),
        right_up: dvec3(x + sx, y, z + sz),
        left_up: dvec3(x, y + sy, z + sz),
        back_up: dvec3(x + sx, y + sy, z + sz),
        front_up: dvec3(x, y, z + sz),
    }
}

/// The eight named corners flattened into iso coordinates.
pub fn iso_verts(block: &Block) -> Verts<IsoPoint> {
    named_space_verts(block).map(Camera::space_to_iso)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_bounds_span_size() {
        let b = bounds(&Block::new(dvec3(1.0, 2.0, 3.0), dvec3(1.0, 2.0, 0.5)));
        assert_eq!((b.min_x, b.max_x), (1.0, 2.0));
        assert_eq!((b.min_y, b.max_y), (2.0, 4.0));
        assert_eq!((b.min_z, b.max_z), (3.0, 3.5));
    }

    #[test]
    fn iso_bounds_of_unit_cube() {
        let b = iso_bounds(&Block::unit(DVec3::ZERO));
        assert_eq!((b.min_x, b.max_x), (0.0, 2.0));
        assert_eq!((b.min_y, b.max_y), (0.0, 2.0));
        assert!(b.min_h < 0.0 && b.max_h > 0.0);
        assert_eq!(b.min_h, -b.max_h);
    }

    #[test]
    fn front_down_is_the_minimum_corner() {
        let block = Block::new(dvec3(4.0, 5.0, 6.0), dvec3(2.0, 3.0, 1.0));
        let v = named_space_verts(&block);
        assert_eq!(v.front_down, block.position);
        assert_eq!(v.back_up, block.position + block.size);
        assert_eq!(v.front_up - v.front_down, dvec3(0.0, 0.0, 1.0));
    }
}
