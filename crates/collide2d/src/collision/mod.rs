//! Collision layers and per-frame callback dispatch
//!
//! Actors live in named [`Layer`]s, each backed by one spatial index. The
//! [`CollisionWorld`] runs the per-frame cycle: rebuild dynamic layers, then
//! query each configured layer pairing and dispatch collision callbacks.

mod actor;
mod layer;
mod world;

pub use actor::{Actor, ActorRef, BasicActor, CollisionInfo};
pub use layer::Layer;
pub use world::{CollisionError, CollisionWorld};

pub(crate) use actor::actor_key;
