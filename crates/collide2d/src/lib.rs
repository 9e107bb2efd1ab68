//! # Collide2D
//!
//! A 2D broad-phase collision detection library with pluggable spatial indexing.
//!
//! ## Features
//!
//! - **Pluggable Broad-Phase**: Swap between a uniform-grid spatial hash and a
//!   quad tree without touching game code
//! - **Collision Layers**: Named actor groups with explicit cross-layer pairings
//! - **Callback Dispatch**: Per-frame pairwise overlap callbacks, deduplicated
//!   per unordered actor pair
//! - **Shape Primitives**: Axis-aligned rectangles and circles with precise
//!   intersection tests
//!
//! ## Quick Start
//!
//! ```rust
//! use collide2d::prelude::*;
//!
//! fn main() -> Result<(), CollisionError> {
//!     let mut world = CollisionWorld::new();
//!     world.add_layer(Layer::new("ships", Box::new(SpatialHash::new(64.0))))?;
//!
//!     let ship = BasicActor::with_rect(Rect::from_xywh(10.0, 10.0, 20.0, 20.0)).into_ref();
//!     world.add_actor("ships", ship.clone())?;
//!
//!     // Once per frame: rebuild dynamic layers, then dispatch callbacks
//!     world.update(1.0 / 60.0);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod collision;
pub mod config;
pub mod foundation;
pub mod geometry;
pub mod spatial;

pub use collision::{Actor, ActorRef, BasicActor, CollisionError, CollisionInfo, CollisionWorld, Layer};
pub use geometry::{BoundingShape, Circle, Rect};
pub use spatial::{QuadTree, QuadTreeConfig, SpatialHash, SpatialIndex};

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        collision::{Actor, ActorRef, BasicActor, CollisionError, CollisionInfo, CollisionWorld, Layer},
        config::{BroadphaseConfig, Config, ConfigError},
        foundation::math::{Point2, Vec2},
        geometry::{BoundingShape, Circle, Rect},
        spatial::{QuadTree, QuadTreeConfig, SpatialHash, SpatialIndex},
    };
}
