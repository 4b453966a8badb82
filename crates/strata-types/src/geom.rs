//! Geometry primitives carried by features.
//!
//! Strata does not implement geometry algorithms; it stores coordinate data
//! verbatim and derives axis-aligned [`Extent`]s so tree entries can carry
//! bounding information without decoding feature payloads.

use serde::{Deserialize, Serialize};

/// A single x/y coordinate pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box.
///
/// An extent is empty until the first coordinate is folded in. Folding is
/// order-independent, so extents computed from differently-ordered
/// coordinate sequences over the same points are equal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    /// An empty extent that expands to fit the first coordinate folded in.
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Returns `true` if no coordinate has been folded in yet.
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x
    }

    /// Grow to include `coord`.
    pub fn expand(&mut self, coord: Coord) {
        self.min_x = self.min_x.min(coord.x);
        self.min_y = self.min_y.min(coord.y);
        self.max_x = self.max_x.max(coord.x);
        self.max_y = self.max_y.max(coord.y);
    }

    /// Grow to include another extent.
    pub fn expand_to_include(&mut self, other: &Extent) {
        if other.is_empty() {
            return;
        }
        self.expand(Coord::new(other.min_x, other.min_y));
        self.expand(Coord::new(other.max_x, other.max_y));
    }

    /// Returns `true` if the two extents overlap (inclusive of edges).
    pub fn intersects(&self, other: &Extent) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }
}

impl Default for Extent {
    fn default() -> Self {
        Self::empty()
    }
}

/// Coordinate geometry attached to a feature.
///
/// Polygons are stored as rings (outer first); no winding or validity rules
/// are enforced here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Point(Coord),
    Line(Vec<Coord>),
    Polygon(Vec<Vec<Coord>>),
}

impl Geometry {
    /// The bounding extent of this geometry.
    pub fn extent(&self) -> Extent {
        let mut extent = Extent::empty();
        match self {
            Geometry::Point(c) => extent.expand(*c),
            Geometry::Line(coords) => {
                for c in coords {
                    extent.expand(*c);
                }
            }
            Geometry::Polygon(rings) => {
                for ring in rings {
                    for c in ring {
                        extent.expand(*c);
                    }
                }
            }
        }
        extent
    }

    /// Total number of coordinates across all parts.
    pub fn coord_count(&self) -> usize {
        match self {
            Geometry::Point(_) => 1,
            Geometry::Line(coords) => coords.len(),
            Geometry::Polygon(rings) => rings.iter().map(Vec::len).sum(),
        }
    }
}
