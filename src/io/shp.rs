use std::{fs, path::{Path, PathBuf}};

use anyhow::{bail, Context, Result};
use shapefile::{self as shp, dbase, Reader, Shape, ShapeType, Writer};

use crate::error::JitterError;
use crate::geom::{Coordinate, Geometry, Part, ShapeKind};
use crate::layer::{Feature, Layer};

/// Sidecar files copied verbatim from the input to the output.
const SIDECARS: [&str; 2] = ["prj", "cpg"];

/// Every file extension that belongs to one shapefile dataset.
pub(super) const COMPONENTS: [&str; 5] = ["shp", "shx", "dbf", "prj", "cpg"];

/// Name of a shapefile header shape type, used as the layer's shape type identifier.
pub fn shape_type_name(shape_type: ShapeType) -> &'static str {
    match shape_type {
        ShapeType::NullShape => "NullShape",
        ShapeType::Point => "Point",
        ShapeType::Polyline => "Polyline",
        ShapeType::Polygon => "Polygon",
        ShapeType::Multipoint => "Multipoint",
        ShapeType::PointZ => "PointZ",
        ShapeType::PolylineZ => "PolylineZ",
        ShapeType::PolygonZ => "PolygonZ",
        ShapeType::MultipointZ => "MultipointZ",
        ShapeType::PointM => "PointM",
        ShapeType::PolylineM => "PolylineM",
        ShapeType::PolygonM => "PolygonM",
        ShapeType::MultipointM => "MultipointM",
        ShapeType::Multipatch => "Multipatch",
    }
}

/// An ESRI Shapefile loaded into memory: its features plus the dBase table
/// layout needed to write the attributes back unchanged.
pub struct Shapefile {
    layer: Layer<dbase::Record>,
    table_info: dbase::TableInfo,
    source: PathBuf,
}

impl Shapefile {
    /// Read all shapes and attribute records from the `.shp` at `path`.
    ///
    /// The header shape type is resolved first; anything but 2D Point,
    /// Multipoint, Polyline or Polygon fails before records are read.
    pub fn read(path: &Path) -> Result<Self> {
        let mut reader = Reader::from_path(path)
            .with_context(|| format!("Failed to open shapefile: {}", path.display()))?;

        let shape_type = shape_type_name(reader.header().shape_type);
        let kind: ShapeKind = shape_type.parse()?;

        let mut features = Vec::with_capacity(reader.shape_count()?);
        for (i, result) in reader.iter_shapes_and_records().enumerate() {
            let (shape, record) = result.with_context(|| format!("Error reading shape+record {i}"))?;
            let geometry = shape_to_geometry(shape, kind)
                .with_context(|| format!("Invalid shape at record {i} of {}", path.display()))?;
            features.push(Feature::new(geometry, record));
        }

        Ok(Self {
            layer: Layer::new(shape_type, features),
            table_info: reader.into_table_info(),
            source: path.to_path_buf(),
        })
    }

    #[inline] pub fn layer(&self) -> &Layer<dbase::Record> { &self.layer }

    #[inline] pub fn layer_mut(&mut self) -> &mut Layer<dbase::Record> { &mut self.layer }

    /// Write shapes and records to a new shapefile at `path`, and copy the
    /// `.prj`/`.cpg` sidecars of the source dataset next to it.
    pub fn write(&self, path: &Path) -> Result<()> {
        let persistence = |e: shp::Error| JitterError::Persistence(e.to_string());

        {
            let mut writer = Writer::from_path_with_info(path, self.table_info.clone())
                .map_err(persistence)
                .with_context(|| format!("Failed to create shapefile: {}", path.display()))?;

            for (i, feature) in self.layer.features().iter().enumerate() {
                let record = feature.attributes();
                let written = match feature.geometry() {
                    Geometry::Point(c) => writer.write_shape_and_record(&to_shp_point(c), record),
                    Geometry::Multipoint(parts) => writer.write_shape_and_record(
                        &shp::Multipoint::new(parts.iter().flat_map(|p| p.coords()).map(to_shp_point).collect()),
                        record,
                    ),
                    Geometry::Polyline(parts) => writer.write_shape_and_record(
                        &shp::Polyline::with_parts(parts.iter().map(to_shp_points).collect()),
                        record,
                    ),
                    Geometry::Polygon(parts) => writer.write_shape_and_record(
                        &shp::Polygon::with_rings(parts.iter().map(to_shp_ring).collect()),
                        record,
                    ),
                };
                written
                    .map_err(persistence)
                    .with_context(|| format!("Failed to write record {i} to {}", path.display()))?;
            }
        }

        for ext in SIDECARS {
            let from = self.source.with_extension(ext);
            if from.is_file() {
                let to = path.with_extension(ext);
                fs::copy(&from, &to)
                    .with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))?;
            }
        }
        Ok(())
    }
}

#[inline]
fn from_shp_point(p: &shp::Point) -> Coordinate { Coordinate::new(p.x, p.y) }

#[inline]
fn to_shp_point(c: &Coordinate) -> shp::Point { shp::Point::new(c.x, c.y) }

fn to_shp_points(part: &Part) -> Vec<shp::Point> {
    part.coords().iter().map(to_shp_point).collect()
}

/// Clockwise rings are exteriors in a shapefile; translation keeps the winding.
fn to_shp_ring(part: &Part) -> shp::PolygonRing<shp::Point> {
    let points = to_shp_points(part);
    if part.signed_area() <= 0.0 {
        shp::PolygonRing::Outer(points)
    } else {
        shp::PolygonRing::Inner(points)
    }
}

/// Convert a shape read from a layer of shape kind `kind`.
fn shape_to_geometry(shape: Shape, kind: ShapeKind) -> Result<Geometry> {
    let geometry = match shape {
        Shape::Point(p) => Geometry::Point(from_shp_point(&p)),
        Shape::Multipoint(mp) => Geometry::multipoint(mp.points().iter().map(from_shp_point)),
        Shape::Polyline(line) => Geometry::Polyline(
            line.parts().iter()
                .map(|part| part.iter().map(from_shp_point).collect())
                .collect(),
        ),
        Shape::Polygon(poly) => Geometry::Polygon(
            poly.rings().iter()
                .map(|ring| ring.points().iter().map(from_shp_point).collect())
                .collect(),
        ),
        other => bail!("{} shape in a {kind} layer", shape_type_name(other.shapetype())),
    };
    if geometry.kind() != kind {
        bail!("{} shape in a {kind} layer", geometry.kind());
    }
    Ok(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_type_names_resolve_to_kinds() {
        assert_eq!(shape_type_name(ShapeType::Polygon).parse::<ShapeKind>(), Ok(ShapeKind::Polygon));
        assert_eq!(shape_type_name(ShapeType::Multipoint).parse::<ShapeKind>(), Ok(ShapeKind::Multipoint));
        assert!(shape_type_name(ShapeType::PointZ).parse::<ShapeKind>().is_err());
        assert!(shape_type_name(ShapeType::Multipatch).parse::<ShapeKind>().is_err());
    }

    #[test]
    fn ring_role_follows_winding() {
        let cw: Part = [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0), (0.0, 0.0)]
            .into_iter().map(Coordinate::from).collect();
        let ccw = Part::new(cw.coords().iter().rev().copied().collect());
        assert!(matches!(to_shp_ring(&cw), shp::PolygonRing::Outer(_)));
        assert!(matches!(to_shp_ring(&ccw), shp::PolygonRing::Inner(_)));
    }

    #[test]
    fn multipoint_shape_becomes_single_point_parts() {
        let shape = Shape::Multipoint(shp::Multipoint::new(vec![shp::Point::new(1.0, 2.0), shp::Point::new(3.0, 4.0)]));
        let geometry = shape_to_geometry(shape, ShapeKind::Multipoint).unwrap();
        assert_eq!(geometry, Geometry::multipoint([Coordinate::new(1.0, 2.0), Coordinate::new(3.0, 4.0)]));
    }

    #[test]
    fn mismatched_shape_is_rejected() {
        let shape = Shape::Point(shp::Point::new(1.0, 2.0));
        assert!(shape_to_geometry(shape, ShapeKind::Polygon).is_err());
        assert!(shape_to_geometry(Shape::NullShape, ShapeKind::Point).is_err());
    }
}
