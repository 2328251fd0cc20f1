//! Vector geometry for blocks
//!
//! This module is organized into submodules:
//! - `path_data`: the path data builder every geometry string is made of
//!
//! [`Painter`] turns a block's projected corners and its neighbors into
//! faces, a silhouette, an outline and a neighbor-aware edge.

pub mod path_data;

pub use path_data::PathData;

use glam::DVec2;

use crate::camera::Camera;
use crate::types::{Adjacent, Block, Direction, Verts};

/// Derived path data for one block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockGeometry {
    /// Top, left and right faces, each a closed quadrilateral.
    pub faces: [PathData; 3],
    /// Silhouette plus the three inner edges meeting at the front-up corner.
    pub outline: PathData,
    /// Closed hexagonal outer boundary.
    pub silhouette: PathData,
    /// Silhouette segments not shared with a neighbor.
    pub edge: PathData,
}

impl BlockGeometry {
    pub const TOP: usize = 0;
    pub const LEFT: usize = 1;
    pub const RIGHT: usize = 2;
}

/// Builds block geometry in screen space for one camera.
#[derive(Debug, Clone, Copy)]
pub struct Painter<'a> {
    camera: &'a Camera,
}

impl<'a> Painter<'a> {
    pub fn new(camera: &'a Camera) -> Self {
        Self { camera }
    }

    /// All geometry for `block` given its neighbors.
    pub fn paint(&self, block: &Block, adjacent: &Adjacent) -> BlockGeometry {
        let v = self.camera.screen_verts(block);
        BlockGeometry {
            faces: faces(&v),
            outline: outline(&v),
            silhouette: silhouette(&v),
            edge: edge(&v, adjacent),
        }
    }

    pub fn faces(&self, block: &Block) -> [PathData; 3] {
        faces(&self.camera.screen_verts(block))
    }

    pub fn silhouette(&self, block: &Block) -> PathData {
        silhouette(&self.camera.screen_verts(block))
    }

    pub fn outline(&self, block: &Block) -> PathData {
        outline(&self.camera.screen_verts(block))
    }

    pub fn edge(&self, block: &Block, adjacent: &Adjacent) -> PathData {
        edge(&self.camera.screen_verts(block), adjacent)
    }
}

fn faces(v: &Verts<DVec2>) -> [PathData; 3] {
    [
        PathData::polygon(&[v.front_up, v.left_up, v.back_up, v.right_up]),
        PathData::polygon(&[v.front_down, v.left_down, v.left_up, v.front_up]),
        PathData::polygon(&[v.front_down, v.right_down, v.right_up, v.front_up]),
    ]
}

fn silhouette_points(v: &Verts<DVec2>) -> [DVec2; 6] {
    [
        v.front_down,
        v.left_down,
        v.left_up,
        v.back_up,
        v.right_up,
        v.right_down,
    ]
}

fn silhouette(v: &Verts<DVec2>) -> PathData {
    PathData::polygon(&silhouette_points(v))
}

fn outline(v: &Verts<DVec2>) -> PathData {
    let mut path = silhouette(v);
    path.extend(PathData::polygon(&[v.front_up, v.front_down]));
    path.extend(PathData::polygon(&[v.front_up, v.left_up]));
    path.extend(PathData::polygon(&[v.front_up, v.right_up]));
    path
}

/// Each silhouette segment borders two faces; it is drawn only when neither
/// of those faces has a neighbor.
fn edge(v: &Verts<DVec2>, adjacent: &Adjacent) -> PathData {
    use Direction::*;

    let open = |a: Direction, b: Direction| !adjacent.has(a) && !adjacent.has(b);
    let segments = [
        (West, Above, v.back_up, v.left_up),
        (West, South, v.left_up, v.left_down),
        (South, Below, v.left_down, v.front_down),
        (North, Above, v.back_up, v.right_up),
        (North, East, v.right_up, v.right_down),
        (East, Below, v.right_down, v.front_down),
    ];

    let mut path = PathData::new();
    for (a, b, from, to) in segments {
        if open(a, b) {
            path.push_polyline(&[from, to]);
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BlockId;
    use glam::{DVec3, dvec2};

    fn camera() -> Camera {
        Camera::new(dvec2(200.0, 450.0), 20.0).unwrap()
    }

    #[test]
    fn unit_cube_silhouette() {
        let cam = camera();
        let path = Painter::new(&cam).silhouette(&Block::unit(DVec3::ZERO));
        insta::assert_snapshot!(
            path,
            @"M200,450 L182.679,440 L182.679,420 L200,410 L217.321,420 L217.321,440 Z"
        );
    }

    #[test]
    fn unit_cube_faces() {
        let cam = camera();
        let [top, left, right] = Painter::new(&cam).faces(&Block::unit(DVec3::ZERO));
        insta::assert_snapshot!(top, @"M200,430 L182.679,420 L200,410 L217.321,420 Z");
        insta::assert_snapshot!(left, @"M200,450 L182.679,440 L182.679,420 L200,430 Z");
        insta::assert_snapshot!(right, @"M200,450 L217.321,440 L217.321,420 L200,430 Z");
    }

    #[test]
    fn outline_adds_three_inner_edges() {
        let cam = camera();
        let outline = Painter::new(&cam).outline(&Block::unit(DVec3::ZERO));
        assert_eq!(outline.subpath_count(), 4);
        assert!(
            outline
                .to_string()
                .ends_with("M200,430 L200,450 Z M200,430 L182.679,420 Z M200,430 L217.321,420 Z")
        );
    }

    #[test]
    fn isolated_block_edge_traces_whole_silhouette() {
        let cam = camera();
        let edge = Painter::new(&cam).edge(&Block::unit(DVec3::ZERO), &Adjacent::default());
        assert_eq!(edge.subpath_count(), 6);
    }

    #[test]
    fn neighbor_hides_shared_segments() {
        let cam = camera();
        let mut adjacent = Adjacent::default();
        adjacent.set(Direction::North, Some(BlockId(1)));
        let edge = Painter::new(&cam).edge(&Block::unit(DVec3::ZERO), &adjacent);
        // back-up/right-up and right-up/right-down border the north face
        assert_eq!(edge.subpath_count(), 4);
        assert!(!edge.to_string().contains("M217.321,420 L217.321,440"));

        adjacent.set(Direction::Above, Some(BlockId(2)));
        adjacent.set(Direction::West, Some(BlockId(3)));
        let edge = Painter::new(&cam).edge(&Block::unit(DVec3::ZERO), &adjacent);
        assert_eq!(edge.subpath_count(), 2);
    }

    #[test]
    fn faces_close_regardless_of_neighbors() {
        let cam = camera();
        let mut adjacent = Adjacent::default();
        for dir in Direction::ALL {
            adjacent.set(dir, Some(BlockId(9)));
        }
        let geometry = Painter::new(&cam).paint(&Block::unit(DVec3::ZERO), &adjacent);
        assert!(geometry.edge.is_empty());
        for face in &geometry.faces {
            assert!(face.to_string().ends_with('Z'));
        }
        assert_eq!(
            geometry.faces[BlockGeometry::TOP].to_string(),
            "M200,430 L182.679,420 L200,410 L217.321,420 Z"
        );
        assert!(geometry.faces[BlockGeometry::LEFT].to_string().starts_with("M200,450 L182.679"));
        assert!(geometry.faces[BlockGeometry::RIGHT].to_string().starts_with("M200,450 L217.321"));
    }
}
