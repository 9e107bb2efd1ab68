//! Shape primitives for collision testing
//!
//! Provides axis-aligned rectangles, circles, and the [`BoundingShape`]
//! abstraction with pairwise intersection tests used by the narrow phase.

mod rect;
mod shape;

pub use rect::Rect;
pub use shape::{BoundingShape, Circle};
