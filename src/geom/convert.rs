use geo::Area;

use crate::geom::{Coordinate, Geometry, Part};

impl From<Coordinate> for geo::Coord<f64> {
    #[inline] fn from(c: Coordinate) -> Self { geo::Coord { x: c.x, y: c.y } }
}

impl From<geo::Coord<f64>> for Coordinate {
    #[inline] fn from(c: geo::Coord<f64>) -> Self { Coordinate { x: c.x, y: c.y } }
}

impl Part {
    fn to_line_string(&self) -> geo::LineString<f64> {
        geo::LineString(self.coords().iter().map(|&c| c.into()).collect())
    }
}

impl Geometry {
    /// Convert to the equivalent `geo` geometry.
    ///
    /// Polygon parts are grouped into polygons by winding: a ring wound the
    /// same way as the first ring starts a new polygon, a ring wound the
    /// other way is a hole of the current one. This reads both the Shapefile
    /// (clockwise exterior) and GeoJSON (counter-clockwise exterior) layouts.
    pub fn to_geo(&self) -> geo::Geometry<f64> {
        match self {
            Geometry::Point(c) => geo::Geometry::Point(geo::Point::new(c.x, c.y)),
            Geometry::Multipoint(parts) => geo::Geometry::MultiPoint(geo::MultiPoint(
                parts.iter()
                    .flat_map(|part| part.coords().iter())
                    .map(|c| geo::Point::new(c.x, c.y))
                    .collect(),
            )),
            Geometry::Polyline(parts) => geo::Geometry::MultiLineString(geo::MultiLineString(
                parts.iter().map(Part::to_line_string).collect(),
            )),
            Geometry::Polygon(parts) => geo::Geometry::MultiPolygon(rings_to_multipolygon(parts)),
        }
    }

    /// Planar area enclosed by the geometry (zero for points and lines).
    pub fn area(&self) -> f64 {
        self.to_geo().unsigned_area()
    }
}

/// Group a flat ring list into polygons (see `Geometry::to_geo`).
fn rings_to_multipolygon(rings: &[Part]) -> geo::MultiPolygon<f64> {
    let Some(outer_sign) = rings.first().map(|r| r.signed_area().signum()) else {
        return geo::MultiPolygon(vec![]);
    };

    let mut polys: Vec<geo::Polygon<f64>> = Vec::new();
    let mut current_exterior: Option<geo::LineString<f64>> = None;
    let mut current_holes: Vec<geo::LineString<f64>> = Vec::new();

    for ring in rings {
        let ls = ring.to_line_string();
        if ring.signed_area().signum() == outer_sign {
            // flush previous polygon
            if let Some(ext) = current_exterior.take() {
                polys.push(geo::Polygon::new(ext, std::mem::take(&mut current_holes)));
            }
            current_exterior = Some(ls);
        } else {
            current_holes.push(ls);
        }
    }
    if let Some(ext) = current_exterior {
        polys.push(geo::Polygon::new(ext, current_holes));
    }

    geo::MultiPolygon(polys)
}
