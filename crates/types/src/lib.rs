pub mod color;
pub mod geometry;
pub mod ids;

pub use color::Color;
pub use geometry::{Bounds, Dimension, GeometryError, Micro, Point, MICROS_PER_UNIT};
pub use ids::BoxId;
