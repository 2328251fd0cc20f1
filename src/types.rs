//! Core value types shared by the camera, sorter, painter and world.
//!
//! Space points are `glam::DVec3` (world units), screen points are
//! `glam::DVec2` (pixels). Iso points are their own type because their four
//! fields are always derived together.

use std::fmt;

use glam::DVec3;

/// Identity of a block inside a [`World`](crate::World).
///
/// Ids are issued in increasing order and never reused within one world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An axis-aligned box: minimum corner plus non-negative extents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Block {
    pub position: DVec3,
    pub size: DVec3,
}

impl Block {
    pub const UNIT: DVec3 = DVec3::ONE;

    pub fn new(position: DVec3, size: DVec3) -> Self {
        Self { position, size }
    }

    /// A 1x1x1 block with its minimum corner at `position`.
    pub fn unit(position: DVec3) -> Self {
        Self::new(position, Self::UNIT)
    }

    pub fn move_to(&mut self, position: DVec3) {
        self.position = position;
    }

    pub fn resize_to(&mut self, size: DVec3) {
        self.size = size;
    }

    /// The integer grid cell holding the block's minimum corner.
    pub fn cell(&self) -> DVec3 {
        self.position.floor()
    }

    /// Height of the block's top face.
    pub fn top(&self) -> f64 {
        self.position.z + self.size.z
    }
}

/// A point in flattened isometric space.
///
/// `x`/`y` are the apparent ground coordinates once height has been folded in;
/// `h`/`v` are the horizontal and vertical oblique projections.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct IsoPoint {
    pub x: f64,
    pub y: f64,
    pub h: f64,
    pub v: f64,
}

/// Min/max of a block along the three space axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
}

/// Min/max of a block's projection along the iso `x`, `y` and `h` axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IsoBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_h: f64,
    pub max_h: f64,
}

/// The eight corners of a block, named by their apparent place on screen.
///
/// The same naming is used for space, iso and screen vertices; face, outline
/// and edge construction all index by these names.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Verts<T> {
    pub right_down: T,
    pub left_down: T,
    pub back_down: T,
    pub front_down: T,
    pub right_up: T,
    pub left_up: T,
    pub back_up: T,
    pub front_up: T,
}

impl<T: Copy> Verts<T> {
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Verts<U> {
        Verts {
            right_down: f(self.right_down),
            left_down: f(self.left_down),
            back_down: f(self.back_down),
            front_down: f(self.front_down),
            right_up: f(self.right_up),
            left_up: f(self.left_up),
            back_up: f(self.back_up),
            front_up: f(self.front_up),
        }
    }
}

/// A space axis on which two blocks were found to be disjoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpaceAxis {
    X,
    Y,
    Z,
}

/// An iso axis on which two blocks' projections were found to be disjoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IsoAxis {
    X,
    Y,
    H,
}

/// Which of two compared blocks is drawn in front.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Front {
    First,
    Second,
}

/// One of the six neighbor directions of a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Above,
    Below,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Above,
        Direction::Below,
    ];

    /// Unit offset from a cell to its neighbor in this direction.
    pub fn offset(self) -> DVec3 {
        match self {
            Direction::North => DVec3::X,
            Direction::South => DVec3::NEG_X,
            Direction::West => DVec3::Y,
            Direction::East => DVec3::NEG_Y,
            Direction::Above => DVec3::Z,
            Direction::Below => DVec3::NEG_Z,
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// A ground-plane movement direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    pub fn direction(self) -> Direction {
        match self {
            Heading::North => Direction::North,
            Heading::East => Direction::East,
            Heading::South => Direction::South,
            Heading::West => Direction::West,
        }
    }
}

/// Nearest neighbor of a block in each of the six directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Adjacent {
    slots: [Option<BlockId>; 6],
}

impl Adjacent {
    pub fn get(&self, dir: Direction) -> Option<BlockId> {
        self.slots[dir.slot()]
    }

    pub fn set(&mut self, dir: Direction, id: Option<BlockId>) {
        self.slots[dir.slot()] = id;
    }

    pub fn has(&self, dir: Direction) -> bool {
        self.get(dir).is_some()
    }

    pub fn north(&self) -> Option<BlockId> {
        self.get(Direction::North)
    }

    pub fn south(&self) -> Option<BlockId> {
        self.get(Direction::South)
    }

    pub fn east(&self) -> Option<BlockId> {
        self.get(Direction::East)
    }

    pub fn west(&self) -> Option<BlockId> {
        self.get(Direction::West)
    }

    pub fn above(&self) -> Option<BlockId> {
        self.get(Direction::Above)
    }

    pub fn below(&self) -> Option<BlockId> {
        self.get(Direction::Below)
    }

    /// True when no neighbor was found in any direction.
    pub fn is_isolated(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}
