//! Isometric depth sorting and projection for axis-aligned blocks.
//!
//! A [`World`] owns blocks positioned in 3D space. Every render pass sorts
//! them back to front with a topological sort over the pairwise "behind"
//! relation, works out which neighbors touch each block, and paints faces,
//! silhouettes and edges as SVG path data for a host to draw.
//!
//! Scenes can also be described in a small line-oriented text format, see
//! [`scene`].

use glam::{DVec2, DVec3};
use pest_derive::Parser;

pub mod bounds;
pub mod camera;
pub mod errors;
pub mod log;
pub mod occlusion;
pub mod render;
pub mod scene;
pub mod sort;
pub mod types;
pub mod world;

pub use camera::{Anchor, Camera, CameraConfig};
pub use errors::{IsoError, SceneError};
pub use render::{BlockGeometry, Painter, PathData};
pub use scene::SceneDesc;
pub use sort::{DrawOrder, sort_blocks};
pub use types::{Adjacent, Block, BlockId, Direction, Heading, IsoPoint, Verts};
pub use world::{Cursor, RenderedBlock, World};

#[derive(Parser)]
#[grammar = "scene.pest"]
pub struct SceneParser;

/// Parse a scene description and return its draw list, back to front.
pub fn render_scene(source: &str) -> Result<Vec<RenderedBlock>, miette::Report> {
    let scene = scene::parse(source)?;
    let world = scene.into_world()?;
    Ok(world.sorted().to_vec())
}

/// Project a space point to screen pixels for a camera at `origin`.
pub fn project(point: DVec3, origin: DVec2, scale: f64) -> Result<DVec2, IsoError> {
    Ok(Camera::new(origin, scale)?.space_to_screen(point))
}

/// Resolve a screen point at height `z` back to iso coordinates.
pub fn unproject(
    screen: DVec2,
    origin: DVec2,
    scale: f64,
    z: f64,
    floor: bool,
) -> Result<IsoPoint, IsoError> {
    Ok(Camera::new(origin, scale)?.screen_to_iso(screen, z, floor))
}
