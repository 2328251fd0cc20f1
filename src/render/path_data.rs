//! SVG path data for block geometry, backed by [`kurbo::BezPath`].
//!
//! Only straight segments are needed, so the fluent API is move, line and
//! close. `Display` writes the `d` attribute with coordinates rounded to three
//! decimals: `M200,450 L182.679,440 Z`.

use std::fmt;

use glam::{DVec2, dvec2};
use kurbo::{BezPath, PathEl, Point, Shape};

/// A path, possibly holding several sub-paths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    path: BezPath,
}

fn point(p: DVec2) -> Point {
    Point::new(p.x, p.y)
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to `(x, y)`, starting a new sub-path.
    pub fn m(mut self, x: f64, y: f64) -> Self {
        self.path.move_to((x, y));
        self
    }

    /// Straight line to `(x, y)`.
    pub fn l(mut self, x: f64, y: f64) -> Self {
        self.path.line_to((x, y));
        self
    }

    /// Close the current sub-path.
    pub fn z(mut self) -> Self {
        self.path.close_path();
        self
    }

    /// An open polyline through `points`.
    pub fn polyline(points: &[DVec2]) -> Self {
        let mut path = Self::new();
        path.push_polyline(points);
        path
    }

    /// A closed polygon through `points`.
    pub fn polygon(points: &[DVec2]) -> Self {
        let path = Self::polyline(points);
        if path.is_empty() { path } else { path.z() }
    }

    /// Append an open polyline as a new sub-path.
    pub fn push_polyline(&mut self, points: &[DVec2]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.path.move_to(point(*first));
        for p in rest {
            self.path.line_to(point(*p));
        }
    }

    /// Append every sub-path of `other`.
    pub fn extend(&mut self, other: PathData) {
        self.path.extend(other.path.elements().iter().copied());
    }

    pub fn as_bez_path(&self) -> &BezPath {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        self.path.elements().is_empty()
    }

    /// Number of sub-paths (move commands).
    pub fn subpath_count(&self) -> usize {
        self.path
            .elements()
            .iter()
            .filter(|el| matches!(el, PathEl::MoveTo(_)))
            .count()
    }

    /// Every point visited, in order.
    pub fn points(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.path.elements().iter().filter_map(|el| match el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => Some(dvec2(p.x, p.y)),
            _ => None,
        })
    }

    /// Nonzero-winding containment of a screen point.
    pub fn contains(&self, p: DVec2) -> bool {
        self.path.contains(point(p))
    }
}

impl From<BezPath> for PathData {
    fn from(path: BezPath) -> Self {
        Self { path }
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, el) in self.path.elements().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match el {
                PathEl::MoveTo(p) => write!(f, "M{},{}", Coord(p.x), Coord(p.y))?,
                PathEl::LineTo(p) => write!(f, "L{},{}", Coord(p.x), Coord(p.y))?,
                PathEl::QuadTo(p1, p2) => write!(
                    f,
                    "Q{},{} {},{}",
                    Coord(p1.x),
                    Coord(p1.y),
                    Coord(p2.x),
                    Coord(p2.y)
                )?,
                PathEl::CurveTo(p1, p2, p3) => write!(
                    f,
                    "C{},{} {},{} {},{}",
                    Coord(p1.x),
                    Coord(p1.y),
                    Coord(p2.x),
                    Coord(p2.y),
                    Coord(p3.x),
                    Coord(p3.y)
                )?,
                PathEl::ClosePath => f.write_str("Z")?,
            }
        }
        Ok(())
    }
}

/// A coordinate printed with at most three decimals.
struct Coord(f64);

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = (self.0 * 1000.0).round() / 1000.0;
        // Avoid printing "-0".
        let rounded = if rounded == 0.0 { 0.0 } else { rounded };
        write!(f, "{rounded}")
    }
}
