//! Spatial partitioning data structures
//!
//! Provides broad-phase spatial indexing for collision detection: a
//! uniform-grid spatial hash and a quad tree behind a common trait, so the
//! strategy can be swapped per layer without changing game code.

mod quadtree;
mod spatial_hash;
mod spatial_index;

pub use quadtree::{QuadTree, QuadTreeConfig};
pub use spatial_hash::SpatialHash;
pub use spatial_index::SpatialIndex;
