//! Camera: conversions between space, iso and screen coordinates.
//!
//! Three coordinate systems are in play:
//!
//! - **Space** (3D): blocks are positioned with `x, y, z`.
//! - **Iso** (2D): height is folded into the ground axes (`x + z`, `y + z`), so
//!   a block raised by one unit looks exactly like one moved one unit along
//!   both ground axes. `h`/`v` are the projections onto the horizontal and
//!   vertical screen directions of the two oblique axes, 120 degrees apart.
//! - **Screen** (2D pixels): `h`/`v` multiplied by `scale` (zoom) and offset
//!   by `origin` (pan). Screen `y` grows downward.

use glam::{DVec2, DVec3, dvec2};

use crate::bounds::named_space_verts;
use crate::errors::IsoError;
use crate::types::{Block, IsoPoint, Verts};

/// cos(30deg), the horizontal component of each oblique iso axis.
const COS_30: f64 = 0.866_025_403_784_438_6;

/// Distance under which a solved coordinate snaps to the nearest grid line
/// before flooring.
const FLOOR_SNAP: f64 = 1e-9;

/// Where the space origin lands inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Anchor {
    /// Middle of the viewport.
    #[default]
    Center,
    /// Fraction of width and height, e.g. `(0.5, 0.75)`.
    Fraction { x: f64, y: f64 },
    /// Absolute pixel position.
    Fixed(DVec2),
}

/// Camera parameters supplied by the host at construction time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub width: f64,
    pub height: f64,
    /// Pixels per world unit.
    pub scale: f64,
    pub anchor: Anchor,
}

impl CameraConfig {
    pub const DEFAULT_SCALE: f64 = 32.0;

    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scale: Self::DEFAULT_SCALE,
            anchor: Anchor::Center,
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Pixel location of the space origin for this viewport.
    pub fn origin(&self) -> DVec2 {
        match self.anchor {
            Anchor::Center => dvec2(self.width / 2.0, self.height / 2.0),
            Anchor::Fraction { x, y } => dvec2(self.width * x, self.height * y),
            Anchor::Fixed(point) => point,
        }
    }
}

/// Pan/zoom state plus the projections that depend on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Pixel location of the space origin.
    pub origin: DVec2,
    /// Pixels per world unit.
    pub scale: f64,
}

impl Camera {
    pub fn new(origin: DVec2, scale: f64) -> Result<Self, IsoError> {
        check_scale(scale)?;
        Ok(Self { origin, scale })
    }

    pub fn from_config(config: &CameraConfig) -> Result<Self, IsoError> {
        Self::new(config.origin(), config.scale)
    }

    /// Move the space origin by `delta` pixels.
    pub fn pan(&mut self, delta: DVec2) {
        self.origin += delta;
    }

    /// Multiply the scale by `factor`.
    pub fn zoom(&mut self, factor: f64) -> Result<(), IsoError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(IsoError::InvalidZoom { value: factor });
        }
        let scale = self.scale * factor;
        check_scale(scale)?;
        self.scale = scale;
        Ok(())
    }

    /// Flatten a space point into iso coordinates.
    pub fn space_to_iso(point: DVec3) -> IsoPoint {
        let x = point.x + point.z;
        let y = point.y + point.z;
        IsoPoint {
            x,
            y,
            h: (x - y) * COS_30,
            v: (x + y) / 2.0,
        }
    }

    pub fn iso_to_screen(&self, iso: IsoPoint) -> DVec2 {
        dvec2(
            iso.h * self.scale + self.origin.x,
            -iso.v * self.scale + self.origin.y,
        )
    }

    pub fn space_to_screen(&self, point: DVec3) -> DVec2 {
        self.iso_to_screen(Self::space_to_iso(point))
    }

    /// Resolve a screen point at height `z` back to ground coordinates.
    ///
    /// A screen point matches a whole line through space, so the caller picks
    /// the height. With `floor` the result is the containing integer cell.
    /// `h` is recomputed from the solved `x, y` with the opposite sign of
    /// [`space_to_iso`](Self::space_to_iso).
    pub fn screen_to_iso(&self, screen: DVec2, z: f64, floor: bool) -> IsoPoint {
        let px = screen.x - self.origin.x;
        let py = screen.y - self.origin.y + z * self.scale;

        let half_height = self.scale / 2.0;
        let half_width = self.scale * COS_30;

        let mut y = (-px / half_width - py / half_height) / 2.0;
        let mut x = (-py / half_height + px / half_width) / 2.0;

        if floor {
            x = floor_cell(x);
            y = floor_cell(y);
        }

        IsoPoint {
            x,
            y,
            h: -((x - y) * COS_30),
            v: (x + y) / 2.0,
        }
    }

    /// Screen positions of a block's eight named corners.
    pub fn screen_verts(&self, block: &Block) -> Verts<DVec2> {
        named_space_verts(block).map(|p| self.space_to_screen(p))
    }
}

fn check_scale(scale: f64) -> Result<(), IsoError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(IsoError::InvalidScale { value: scale })
    }
}

fn floor_cell(value: f64) -> f64 {
    let nearest = value.round();
    if (value - nearest).abs() < FLOOR_SNAP {
        nearest
    } else {
        value.floor()
    }
}
