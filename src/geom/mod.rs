mod bbox;
mod convert;
mod geom;

pub use bbox::bounds_of;
pub(crate) use bbox::union_rect;
pub use geom::{Coordinate, Geometry, Part, ShapeKind};
