use std::{fmt, str::FromStr};

use crate::error::JitterError;

/// An (x, y) pair in the dataset's native planar units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    #[inline] pub fn new(x: f64, y: f64) -> Self { Self { x, y } }
}

impl From<(f64, f64)> for Coordinate {
    #[inline] fn from((x, y): (f64, f64)) -> Self { Self { x, y } }
}

/// An ordered run of coordinates: one ring of a polygon, one line of a
/// polyline, or a single point of a multipoint.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Part(Vec<Coordinate>);

impl Part {
    #[inline] pub fn new(coords: Vec<Coordinate>) -> Self { Self(coords) }

    /// Get the number of coordinates.
    #[inline] pub fn len(&self) -> usize { self.0.len() }

    /// Check if the part has no coordinates.
    #[inline] pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Get the coordinates in order.
    #[inline] pub fn coords(&self) -> &[Coordinate] { &self.0 }

    #[inline] pub fn first(&self) -> Option<&Coordinate> { self.0.first() }

    #[inline] pub fn last(&self) -> Option<&Coordinate> { self.0.last() }

    /// A part is closed when it has points and its first and last points coincide.
    pub fn is_closed(&self) -> bool {
        matches!((self.first(), self.last()), (Some(a), Some(b)) if a == b)
    }

    /// Twice the signed area of the part read as a ring (negative when clockwise).
    pub(crate) fn signed_area(&self) -> f64 {
        let mut a = 0.0;
        for w in self.0.windows(2) {
            a += w[0].x * w[1].y - w[1].x * w[0].y;
        }
        a / 2.0
    }

    pub fn into_coords(self) -> Vec<Coordinate> { self.0 }
}

impl From<Vec<Coordinate>> for Part {
    fn from(coords: Vec<Coordinate>) -> Self { Self(coords) }
}

impl FromIterator<Coordinate> for Part {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The closed set of shape kinds a layer may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Point,
    Multipoint,
    Polyline,
    Polygon,
}

impl ShapeKind {
    pub fn to_str(&self) -> &'static str {
        match self {
            ShapeKind::Point => "Point",
            ShapeKind::Multipoint => "Multipoint",
            ShapeKind::Polyline => "Polyline",
            ShapeKind::Polygon => "Polygon",
        }
    }

    pub fn all() -> [ShapeKind; 4] {
        [ShapeKind::Point, ShapeKind::Multipoint, ShapeKind::Polyline, ShapeKind::Polygon]
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.to_str()) }
}

impl FromStr for ShapeKind {
    type Err = JitterError;

    /// Resolve a layer's shape type identifier. Anything outside the four
    /// recognized kinds (`Annotation`, `PointZ`, `Multipatch`, ...) is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeKind::all()
            .into_iter()
            .find(|kind| kind.to_str() == s)
            .ok_or_else(|| JitterError::UnsupportedGeometryType(s.to_string()))
    }
}

/// A feature geometry. Point holds its coordinate directly; the other kinds
/// hold an ordered sequence of parts.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Coordinate),
    Multipoint(Vec<Part>),
    Polyline(Vec<Part>),
    Polygon(Vec<Part>),
}

impl Geometry {
    /// Build a multipoint with one part per point.
    pub fn multipoint(points: impl IntoIterator<Item = Coordinate>) -> Self {
        Geometry::Multipoint(points.into_iter().map(|c| Part::new(vec![c])).collect())
    }

    #[inline]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Geometry::Point(_) => ShapeKind::Point,
            Geometry::Multipoint(_) => ShapeKind::Multipoint,
            Geometry::Polyline(_) => ShapeKind::Polyline,
            Geometry::Polygon(_) => ShapeKind::Polygon,
        }
    }

    /// Get the parts, or an empty slice for a Point.
    #[inline]
    pub fn parts(&self) -> &[Part] {
        match self {
            Geometry::Point(_) => &[],
            Geometry::Multipoint(parts) | Geometry::Polyline(parts) | Geometry::Polygon(parts) => parts,
        }
    }

    /// Get the number of parts (zero for a Point).
    #[inline] pub fn num_parts(&self) -> usize { self.parts().len() }

    /// Iterate over every coordinate in part order.
    pub fn coords(&self) -> Box<dyn Iterator<Item = &Coordinate> + '_> {
        match self {
            Geometry::Point(c) => Box::new(std::iter::once(c)),
            _ => Box::new(self.parts().iter().flat_map(|part| part.coords().iter())),
        }
    }

    /// Get the total number of coordinates.
    pub fn num_coords(&self) -> usize {
        match self {
            Geometry::Point(_) => 1,
            _ => self.parts().iter().map(Part::len).sum(),
        }
    }
}
