//! Abstract spatial index interface for broad-phase collision detection
//!
//! This abstraction allows swapping different spatial partitioning schemes
//! (spatial hash, quad tree) without changing the collision system.

use crate::collision::ActorRef;
use crate::geometry::Rect;

/// Abstract interface for broad-phase spatial indexing
///
/// Implementations track actors by their bounding rectangle. Bounds are read
/// from the live actor at insert and reset time only; callers keep shapes in
/// sync with positions before each update cycle.
pub trait SpatialIndex {
    /// Insert an actor, registering its current bounding rectangle
    fn insert(&mut self, actor: ActorRef);

    /// Remove an actor from the index; returns `true` if it was present
    fn remove(&mut self, actor: &ActorRef) -> bool;

    /// Collect actors whose bounding rectangle intersects `region`
    ///
    /// Results are deduplicated and filtered by a true rectangle
    /// intersection; coarse cell or node membership alone is not enough.
    fn query(&self, region: &Rect) -> Vec<ActorRef>;

    /// Rebuild the index from every actor's live bounding rectangle
    ///
    /// This is how the index picks up actor motion between frames.
    fn reset(&mut self);

    /// All actors currently tracked by the index
    fn actors(&self) -> &[ActorRef];

    /// Number of tracked actors
    fn len(&self) -> usize {
        self.actors().len()
    }

    /// Whether the index tracks no actors
    fn is_empty(&self) -> bool {
        self.actors().is_empty()
    }

    /// Remove all actors from the index
    fn clear(&mut self);
}
