use std::{fs, path::Path};

use anyhow::{anyhow, bail, ensure, Context, Result};
use serde_json::{json, Map, Value};

use crate::geom::{Coordinate, Geometry, Part};
use crate::layer::{Feature, Layer};

/// Shape type reported for a collection with no features.
const EMPTY_SHAPE_TYPE: &str = "Empty";

/// The GeoJSON geometry type a feature was read as, so it is written back
/// the same way. `MultiPolygon` keeps the ring count of each polygon, since
/// its rings are flattened into parts.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoJsonLayout {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon(Vec<usize>),
}

/// Everything of a GeoJSON feature except its geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonAttributes {
    pub id: Option<Value>,
    pub properties: Value,
    pub layout: GeoJsonLayout,
}

/// A GeoJSON FeatureCollection loaded into memory.
#[derive(Debug)]
pub struct GeoJson {
    layer: Layer<GeoJsonAttributes>,
    /// Collection members other than `type`, `features` and `bbox` (e.g. `name`, `crs`).
    members: Map<String, Value>,
}

impl GeoJson {
    /// Read a FeatureCollection from the file at `path`.
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read GeoJSON file {}", path.display()))?;
        Self::from_bytes(&bytes)
            .with_context(|| format!("Invalid GeoJSON in {}", path.display()))
    }

    /// Parse a FeatureCollection. Every feature must carry a geometry of the
    /// same shape kind as the first one.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes).context("Failed to parse GeoJSON bytes")?;
        let Value::Object(mut members) = value else { bail!("GeoJSON root is not an object") };
        ensure!(
            members.get("type").and_then(Value::as_str) == Some("FeatureCollection"),
            "GeoJSON root is not a FeatureCollection"
        );
        members.remove("type");
        members.remove("bbox");
        let features = match members.remove("features") {
            Some(Value::Array(features)) => features,
            _ => bail!("FeatureCollection has no features array"),
        };

        let mut parsed = Vec::with_capacity(features.len());
        for (i, feature) in features.into_iter().enumerate() {
            parsed.push(parse_feature(feature).with_context(|| format!("Invalid feature {i}"))?);
        }

        let shape_type = parsed.first()
            .map(|f| f.geometry().kind().to_str())
            .unwrap_or(EMPTY_SHAPE_TYPE);
        if let Some((i, f)) = parsed.iter().enumerate().find(|(_, f)| f.geometry().kind().to_str() != shape_type) {
            bail!("feature {i} is a {} but the collection holds {shape_type} features", f.geometry().kind());
        }

        Ok(Self { layer: Layer::new(shape_type, parsed), members })
    }

    #[inline] pub fn layer(&self) -> &Layer<GeoJsonAttributes> { &self.layer }

    #[inline] pub fn is_empty(&self) -> bool { self.layer.is_empty() }

    #[inline] pub fn layer_mut(&mut self) -> &mut Layer<GeoJsonAttributes> { &mut self.layer }

    /// Serialize the collection back to GeoJSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let features = self.layer.features().iter()
            .enumerate()
            .map(|(i, feature)| write_feature(feature).with_context(|| format!("Failed to encode feature {i}")))
            .collect::<Result<Vec<_>>>()?;

        let mut collection = Map::new();
        collection.insert("type".into(), json!("FeatureCollection"));
        for (key, value) in &self.members {
            collection.insert(key.clone(), value.clone());
        }
        collection.insert("features".into(), Value::Array(features));

        serde_json::to_vec(&Value::Object(collection)).context("Failed to serialize GeoJSON to bytes")
    }

    /// Write the collection to a new file at `path`.
    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_bytes()?)
            .with_context(|| format!("Failed to write GeoJSON file {}", path.display()))
    }
}

fn parse_feature(value: Value) -> Result<Feature<GeoJsonAttributes>> {
    let Value::Object(mut feature) = value else { bail!("feature is not an object") };
    ensure!(feature.get("type").and_then(Value::as_str) == Some("Feature"), "object is not a Feature");

    let geometry = match feature.remove("geometry") {
        Some(Value::Object(geometry)) => geometry,
        _ => bail!("feature has no geometry"),
    };
    let (geometry, layout) = parse_geometry(&geometry)?;

    let attributes = GeoJsonAttributes {
        id: feature.remove("id"),
        properties: feature.remove("properties").unwrap_or(Value::Null),
        layout,
    };
    Ok(Feature::new(geometry, attributes))
}

fn parse_geometry(geometry: &Map<String, Value>) -> Result<(Geometry, GeoJsonLayout)> {
    let ty = geometry.get("type").and_then(Value::as_str)
        .ok_or_else(|| anyhow!("geometry has no type"))?;
    let coords = geometry.get("coordinates")
        .ok_or_else(|| anyhow!("{ty} geometry has no coordinates"))?;

    Ok(match ty {
        "Point" => (Geometry::Point(parse_position(coords)?), GeoJsonLayout::Point),
        "MultiPoint" => (Geometry::multipoint(parse_positions(coords)?.into_coords()), GeoJsonLayout::MultiPoint),
        "LineString" => (Geometry::Polyline(vec![parse_positions(coords)?]), GeoJsonLayout::LineString),
        "MultiLineString" => (Geometry::Polyline(parse_rings(coords)?), GeoJsonLayout::MultiLineString),
        "Polygon" => (Geometry::Polygon(parse_rings(coords)?), GeoJsonLayout::Polygon),
        "MultiPolygon" => {
            let polygons = as_array(coords)?.iter().map(parse_rings).collect::<Result<Vec<_>>>()?;
            let ring_counts = polygons.iter().map(Vec::len).collect();
            (Geometry::Polygon(polygons.into_iter().flatten().collect()), GeoJsonLayout::MultiPolygon(ring_counts))
        }
        other => bail!("unsupported GeoJSON geometry type {other}"),
    })
}

fn as_array(value: &Value) -> Result<&Vec<Value>> {
    value.as_array().ok_or_else(|| anyhow!("expected an array, found {value}"))
}

/// Parse `[x, y]`. Positions with a third (elevation) value are rejected.
fn parse_position(value: &Value) -> Result<Coordinate> {
    match as_array(value)?.as_slice() {
        [x, y] => Ok(Coordinate::new(
            x.as_f64().ok_or_else(|| anyhow!("invalid x ordinate {x}"))?,
            y.as_f64().ok_or_else(|| anyhow!("invalid y ordinate {y}"))?,
        )),
        [_, _, _, ..] => bail!("3D positions are not supported: {value}"),
        _ => bail!("invalid position {value}"),
    }
}

fn parse_positions(value: &Value) -> Result<Part> {
    as_array(value)?.iter().map(parse_position).collect()
}

fn parse_rings(value: &Value) -> Result<Vec<Part>> {
    as_array(value)?.iter().map(parse_positions).collect()
}

fn write_feature(feature: &Feature<GeoJsonAttributes>) -> Result<Value> {
    let attributes = feature.attributes();
    let mut out = Map::new();
    out.insert("type".into(), json!("Feature"));
    if let Some(id) = &attributes.id {
        out.insert("id".into(), id.clone());
    }
    out.insert("geometry".into(), write_geometry(feature.geometry(), &attributes.layout)?);
    out.insert("properties".into(), attributes.properties.clone());
    Ok(Value::Object(out))
}

fn position(c: &Coordinate) -> Value { json!([c.x, c.y]) }

fn positions(part: &Part) -> Value { Value::Array(part.coords().iter().map(position).collect()) }

fn rings(parts: &[Part]) -> Value { Value::Array(parts.iter().map(positions).collect()) }

fn write_geometry(geometry: &Geometry, layout: &GeoJsonLayout) -> Result<Value> {
    let (ty, coordinates) = match (layout, geometry) {
        (GeoJsonLayout::Point, Geometry::Point(c)) => ("Point", position(c)),
        (GeoJsonLayout::MultiPoint, Geometry::Multipoint(parts)) => (
            "MultiPoint",
            Value::Array(parts.iter().flat_map(|p| p.coords()).map(position).collect()),
        ),
        (GeoJsonLayout::LineString, Geometry::Polyline(parts)) if parts.len() == 1 => ("LineString", positions(&parts[0])),
        (GeoJsonLayout::MultiLineString, Geometry::Polyline(parts)) => ("MultiLineString", rings(parts)),
        (GeoJsonLayout::Polygon, Geometry::Polygon(parts)) => ("Polygon", rings(parts)),
        (GeoJsonLayout::MultiPolygon(ring_counts), Geometry::Polygon(parts))
            if ring_counts.iter().sum::<usize>() == parts.len() =>
        {
            let mut remaining: &[Part] = parts;
            let mut polygons = Vec::with_capacity(ring_counts.len());
            for &n in ring_counts {
                let (polygon, rest) = remaining.split_at(n);
                polygons.push(rings(polygon));
                remaining = rest;
            }
            ("MultiPolygon", Value::Array(polygons))
        }
        (layout, geometry) => bail!("{} geometry does not fit its {layout:?} layout", geometry.kind()),
    };
    Ok(json!({ "type": ty, "coordinates": coordinates }))
}
