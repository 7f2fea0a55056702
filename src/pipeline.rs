use std::time::{Duration, Instant};

use geo::Rect;
use rand::Rng;

use crate::error::JitterError;
use crate::geom::{union_rect, ShapeKind};
use crate::jitter::{jitter_geometry, DistanceBand};
use crate::layer::FeatureLayer;

/// Summary of one jitter pass over a layer.
#[derive(Debug, Clone, PartialEq)]
pub struct JitterReport {
    pub features: usize,
    /// `None` for an empty GeoJSON collection, which names no shape type.
    pub shape_kind: Option<ShapeKind>,
    pub band: DistanceBand,
    pub elapsed: Duration,
    pub input_bounds: Option<Rect<f64>>,
    pub output_bounds: Option<Rect<f64>>,
}

impl JitterReport {
    /// Report for a dataset copied through without any feature.
    pub fn empty(band: DistanceBand) -> Self {
        Self {
            features: 0,
            shape_kind: None,
            band,
            elapsed: Duration::ZERO,
            input_bounds: None,
            output_bounds: None,
        }
    }
}

fn extend(bounds: Option<Rect<f64>>, rect: Option<Rect<f64>>) -> Option<Rect<f64>> {
    match (bounds, rect) {
        (Some(a), Some(b)) => Some(union_rect(a, b)),
        (a, b) => a.or(b),
    }
}

/// Validate `[min_dist, max_dist]` and jitter every feature of `layer` in place.
///
/// The range is checked before the shape type, and both before the first write,
/// so a bad configuration never leaves a partially jittered layer behind.
pub fn jitter_layer<L, R>(layer: &mut L, min_dist: f64, max_dist: f64, rng: &mut R) -> Result<JitterReport, JitterError>
where
    L: FeatureLayer + ?Sized,
    R: Rng,
{
    let band = DistanceBand::new(min_dist, max_dist)?;
    jitter_features(layer, band, rng)
}

/// Jitter every feature of `layer` with one displacement drawn per feature.
///
/// A failed write stops the pass; features already written stay jittered, so
/// the caller must treat the layer as spoiled and start over from the source.
pub fn jitter_features<L, R>(layer: &mut L, band: DistanceBand, rng: &mut R) -> Result<JitterReport, JitterError>
where
    L: FeatureLayer + ?Sized,
    R: Rng,
{
    let start = Instant::now();
    let shape_kind: ShapeKind = layer.shape_type().parse()?;

    log::info!(
        "jittering {} {} features by [{}, {}]",
        layer.feature_count(), shape_kind, band.min_dist(), band.max_dist()
    );

    let mut input_bounds = None;
    let mut output_bounds = None;
    let mut count = 0;

    for id in layer.feature_ids() {
        let geometry = layer.geometry(id)
            .ok_or_else(|| JitterError::Persistence(format!("{id} has no geometry")))?;

        let v = band.sample(rng);
        let jittered = jitter_geometry(geometry, v);
        log::debug!("{id}: dx={:.3} dy={:.3}", v.dx, v.dy);
        log::trace!("{id}: {} parts, {} coordinates", jittered.num_parts(), jittered.num_coords());

        input_bounds = extend(input_bounds, geometry.bounds());
        output_bounds = extend(output_bounds, jittered.bounds());

        layer.replace_geometry(id, jittered)?;
        count += 1;
    }

    let elapsed = start.elapsed();
    log::info!("jittered {count} features in {:.3} seconds", elapsed.as_secs_f64());

    Ok(JitterReport { features: count, shape_kind: Some(shape_kind), band, elapsed, input_bounds, output_bounds })
}
