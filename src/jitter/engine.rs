use crate::geom::{Coordinate, Geometry, Part};
use crate::jitter::DisplacementVector;

impl Coordinate {
    /// Shift the coordinate by `v`.
    #[inline]
    pub fn offset(self, v: DisplacementVector) -> Self {
        Coordinate { x: self.x + v.dx, y: self.y + v.dy }
    }
}

/// Translate every coordinate of a part by `v`, keeping order and length.
/// Knows nothing of rings or winding; a closed ring stays closed because its
/// closing vertex moves by the same vector as its first.
pub fn jitter_part(part: &Part, v: DisplacementVector) -> Part {
    part.coords().iter().map(|&c| c.offset(v)).collect()
}

fn jitter_parts(parts: &[Part], v: DisplacementVector) -> Vec<Part> {
    parts.iter().map(|part| jitter_part(part, v)).collect()
}

/// Build a new geometry of the same kind and structure with every vertex
/// shifted by `v`. The input is left untouched.
pub fn jitter_geometry(geometry: &Geometry, v: DisplacementVector) -> Geometry {
    match geometry {
        Geometry::Point(c) => Geometry::Point(c.offset(v)),
        Geometry::Multipoint(parts) => Geometry::Multipoint(jitter_parts(parts, v)),
        Geometry::Polyline(parts) => Geometry::Polyline(jitter_parts(parts, v)),
        Geometry::Polygon(parts) => Geometry::Polygon(jitter_parts(parts, v)),
    }
}

impl Geometry {
    /// Shorthand for `jitter_geometry(self, DisplacementVector::new(dx, dy))`.
    #[inline]
    pub fn jittered(&self, dx: f64, dy: f64) -> Geometry {
        jitter_geometry(self, DisplacementVector::new(dx, dy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(pts: &[(f64, f64)]) -> Part {
        pts.iter().copied().map(Coordinate::from).collect()
    }

    fn square() -> Part {
        part(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)])
    }

    #[test]
    fn point_moves_exactly_by_offset() {
        let g = Geometry::Point(Coordinate::new(100.0, 200.0));
        assert_eq!(g.jittered(12.5, -7.25), Geometry::Point(Coordinate::new(112.5, 192.75)));
    }

    #[test]
    fn polygon_square_scenario() {
        let g = Geometry::Polygon(vec![square()]);
        let out = jitter_geometry(&g, DisplacementVector::new(5.0, -3.0));
        let expected = part(&[(5.0, -3.0), (15.0, -3.0), (15.0, 7.0), (5.0, 7.0), (5.0, -3.0)]);
        assert_eq!(out, Geometry::Polygon(vec![expected]));
    }

    #[test]
    fn structure_is_preserved() {
        let hole = part(&[(2.0, 2.0), (4.0, 2.0), (4.0, 4.0), (2.0, 2.0)]);
        let g = Geometry::Polygon(vec![square(), hole]);
        let out = g.jittered(-1.0, 3.0);

        assert_eq!(out.kind(), g.kind());
        assert_eq!(out.num_parts(), g.num_parts());
        for (a, b) in g.parts().iter().zip(out.parts()) {
            assert_eq!(a.len(), b.len());
        }
    }

    #[test]
    fn ring_closure_is_preserved() {
        let g = Geometry::Polygon(vec![square()]);
        let out = g.jittered(1234.5678, -0.1);
        assert!(out.parts().iter().all(Part::is_closed));
    }

    #[test]
    fn every_vertex_gets_the_same_offset() {
        let g = Geometry::Polyline(vec![
            part(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]),
            part(&[(10.0, 10.0), (11.0, 12.0)]),
        ]);
        let out = g.jittered(3.0, 4.0);
        for (a, b) in g.coords().zip(out.coords()) {
            assert_eq!((b.x - a.x, b.y - a.y), (3.0, 4.0));
        }
    }

    #[test]
    fn zero_offset_is_identity() {
        let g = Geometry::multipoint([Coordinate::new(1.5, -2.5), Coordinate::new(8.0, 9.0)]);
        assert_eq!(jitter_geometry(&g, DisplacementVector::ZERO), g);
    }

    #[test]
    fn translations_compose() {
        let g = Geometry::Polyline(vec![part(&[(0.0, 0.0), (3.0, 4.0)])]);
        let (v1, v2) = (DisplacementVector::new(1.0, 2.0), DisplacementVector::new(-4.0, 0.5));
        assert_eq!(jitter_geometry(&jitter_geometry(&g, v1), v2), jitter_geometry(&g, v1 + v2));
    }

    #[test]
    fn empty_parts_stay_empty() {
        let g = Geometry::Polyline(vec![Part::default()]);
        let out = g.jittered(1.0, 1.0);
        assert_eq!(out.num_parts(), 1);
        assert!(out.parts()[0].is_empty());
    }

    #[test]
    fn jitter_part_is_shape_agnostic() {
        let p = part(&[(0.0, 0.0), (0.0, 0.0), (5.0, 5.0)]);
        let out = jitter_part(&p, DisplacementVector::new(1.0, 1.0));
        assert_eq!(out, part(&[(1.0, 1.0), (1.0, 1.0), (6.0, 6.0)]));
    }
}
