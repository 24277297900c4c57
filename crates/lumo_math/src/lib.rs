// Re-export glam for convenience
pub use glam::*;

// Lumo math types
mod bounding_box;
mod interval;
mod ray;

pub use bounding_box::{slab, BoundingBox};
pub use interval::Interval;
pub use ray::Ray;
