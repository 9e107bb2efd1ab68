//! Actor capability contract consumed by the collision system

use std::cell::RefCell;
use std::rc::Rc;

use crate::geometry::{BoundingShape, Circle, Rect};

/// Shared handle to a collision actor
///
/// The collision system holds these handles without owning actor state; it
/// only reads bounding geometry and invokes callbacks. Identity is the
/// allocation address, so clones of one handle always refer to the same actor.
/// `Rc`/`RefCell` make the collision types single-threaded by design.
pub type ActorRef = Rc<RefCell<dyn Actor>>;

/// Any object participating in collision detection
///
/// Implementors keep their bounding shape in sync with their position before
/// each update cycle; the spatial indexes read it at reset and query time and
/// never detect motion on their own.
pub trait Actor {
    /// The actor's current bounding shape
    fn bounding_shape(&self) -> BoundingShape;

    /// Invoked synchronously for every collision this actor takes part in
    fn on_collision(&mut self, info: &CollisionInfo);
}

/// Information handed to an actor's collision callback
#[derive(Clone)]
pub struct CollisionInfo {
    /// The other actor involved in the collision
    pub other: ActorRef,
    /// The other actor's bounding rectangle at test time
    pub other_bounds: Rect,
}

/// Stable identity for an actor handle (allocation address)
pub(crate) fn actor_key(actor: &ActorRef) -> usize {
    Rc::as_ptr(actor).cast::<()>() as usize
}

/// Minimal ready-made actor: a bounding shape plus a collision counter
///
/// Useful for prototyping and for tests that only need to observe how often
/// an actor collided.
pub struct BasicActor {
    /// The actor's bounding shape; mutate to move the actor
    pub shape: BoundingShape,
    /// Number of collisions reported to this actor so far
    pub collision_count: usize,
}

impl BasicActor {
    /// Create a basic actor with the given bounding shape
    pub fn new(shape: BoundingShape) -> Self {
        Self {
            shape,
            collision_count: 0,
        }
    }

    /// Create a basic actor bounded by a rectangle
    pub fn with_rect(rect: Rect) -> Self {
        Self::new(BoundingShape::Rect(rect))
    }

    /// Create a basic actor bounded by a circle
    pub fn with_circle(circle: Circle) -> Self {
        Self::new(BoundingShape::Circle(circle))
    }

    /// Wrap this actor in a shared handle for insertion into a layer
    pub fn into_ref(self) -> ActorRef {
        Rc::new(RefCell::new(self))
    }
}

impl Actor for BasicActor {
    fn bounding_shape(&self) -> BoundingShape {
        self.shape
    }

    fn on_collision(&mut self, _info: &CollisionInfo) {
        self.collision_count += 1;
    }
}
