use geo::{BoundingRect, Coord, MultiPoint, Point, Rect};

use crate::geom::Geometry;

impl Geometry {
    /// Compute the bounding rectangle of all coordinates, or None if there are none.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        MultiPoint::new(self.coords().map(|c| Point::new(c.x, c.y)).collect()).bounding_rect()
    }
}

/// Compute the bounding rectangle of a collection of geometries.
pub fn bounds_of<'a>(geoms: impl IntoIterator<Item = &'a Geometry>) -> Option<Rect<f64>> {
    geoms.into_iter()
        .filter_map(Geometry::bounds)
        .reduce(union_rect)
}

/// Smallest rectangle covering both `a` and `b`.
pub(crate) fn union_rect(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        Coord {
            x: a.min().x.min(b.min().x),
            y: a.min().y.min(b.min().y),
        },
        Coord {
            x: a.max().x.max(b.max().x),
            y: a.max().y.max(b.max().y),
        }
    )
}
