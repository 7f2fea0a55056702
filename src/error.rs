use std::fmt;

/// Errors raised by the jitter core and its feature stores.
#[derive(Debug, Clone, PartialEq)]
pub enum JitterError {
    /// The distance band is negative, not finite, or has `min_dist > max_dist`.
    InvalidRange { min_dist: f64, max_dist: f64 },
    /// The layer's shape type is not one of Point, Multipoint, Polyline, Polygon.
    UnsupportedGeometryType(String),
    /// The feature store rejected a geometry write.
    Persistence(String),
}

impl fmt::Display for JitterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JitterError::InvalidRange { min_dist, max_dist } => write!(
                f,
                "invalid distance range [{min_dist}, {max_dist}]: distances must be finite, non-negative and min <= max"
            ),
            JitterError::UnsupportedGeometryType(shape_type) => {
                write!(f, "feature layer of shape type {shape_type} not supported")
            }
            JitterError::Persistence(msg) => write!(f, "failed to write feature: {msg}"),
        }
    }
}

impl std::error::Error for JitterError {}
