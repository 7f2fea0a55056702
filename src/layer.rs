use std::fmt;

use crate::error::JitterError;
use crate::geom::Geometry;

/// Position of a feature within its layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureId(pub usize);

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeatureId({})", self.0)
    }
}

/// One geometry plus attributes the jitter never reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature<A> {
    geometry: Geometry,
    attributes: A,
}

impl<A> Feature<A> {
    pub fn new(geometry: Geometry, attributes: A) -> Self {
        Self { geometry, attributes }
    }

    #[inline] pub fn geometry(&self) -> &Geometry { &self.geometry }

    #[inline] pub fn attributes(&self) -> &A { &self.attributes }
}

/// The feature store the jitter pass reads geometries from and writes them back to.
pub trait FeatureLayer {
    /// The shape type identifier reported by the store (e.g. `Polygon`, `PointZ`).
    fn shape_type(&self) -> &str;

    fn feature_count(&self) -> usize;

    fn geometry(&self, id: FeatureId) -> Option<&Geometry>;

    /// Substitute the geometry of feature `id` wholesale.
    fn replace_geometry(&mut self, id: FeatureId, geometry: Geometry) -> Result<(), JitterError>;

    /// Iterate over all feature ids in store order.
    fn feature_ids(&self) -> Box<dyn Iterator<Item = FeatureId>> {
        Box::new((0..self.feature_count()).map(FeatureId))
    }
}

/// An in-memory layer, used directly by the dataset drivers.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer<A> {
    shape_type: String,
    features: Vec<Feature<A>>,
}

impl<A> Layer<A> {
    pub fn new(shape_type: impl Into<String>, features: Vec<Feature<A>>) -> Self {
        Self { shape_type: shape_type.into(), features }
    }

    /// Get the number of features.
    #[inline] pub fn len(&self) -> usize { self.features.len() }

    /// Check if there are no features.
    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }

    #[inline] pub fn features(&self) -> &[Feature<A>] { &self.features }

    /// Iterate over all geometries in feature order.
    pub fn geometries(&self) -> impl Iterator<Item = &Geometry> {
        self.features.iter().map(Feature::geometry)
    }
}

impl<A> FeatureLayer for Layer<A> {
    fn shape_type(&self) -> &str { &self.shape_type }

    fn feature_count(&self) -> usize { self.features.len() }

    fn geometry(&self, id: FeatureId) -> Option<&Geometry> {
        self.features.get(id.0).map(Feature::geometry)
    }

    fn replace_geometry(&mut self, id: FeatureId, geometry: Geometry) -> Result<(), JitterError> {
        if geometry.kind().to_str() != self.shape_type {
            return Err(JitterError::Persistence(format!(
                "schema mismatch: layer holds {} features, got {}",
                self.shape_type, geometry.kind()
            )));
        }
        let feature = self.features.get_mut(id.0)
            .ok_or_else(|| JitterError::Persistence(format!("no feature with id {id}")))?;
        feature.geometry = geometry;
        Ok(())
    }
}
