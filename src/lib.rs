#![doc = "featurejitter public API"]
mod config;
mod error;
mod geom;
mod io;
mod jitter;
mod layer;
mod pipeline;

#[doc(inline)]
pub use config::JitterConfig;

#[doc(inline)]
pub use error::JitterError;

#[doc(inline)]
pub use geom::{bounds_of, Coordinate, Geometry, Part, ShapeKind};

#[doc(inline)]
pub use jitter::{generate_displacement, jitter_geometry, jitter_part, DisplacementVector, DistanceBand};

#[doc(inline)]
pub use layer::{Feature, FeatureId, FeatureLayer, Layer};

#[doc(inline)]
pub use pipeline::{jitter_features, jitter_layer, JitterReport};

#[doc(inline)]
pub use io::{jitter_dataset, shape_type_name, Dataset, Driver, GeoJson, GeoJsonAttributes, GeoJsonLayout, Shapefile};
