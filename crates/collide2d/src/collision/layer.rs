//! Named actor grouping sharing one spatial index

use super::actor::ActorRef;
use crate::geometry::Rect;
use crate::spatial::SpatialIndex;

/// A named partition of actors sharing one spatial index
///
/// Layers control which groups of actors test against each other. A layer is
/// either dynamic (its index is rebuilt from live actor bounds every frame)
/// or static (its actors are assumed immobile and the rebuild is skipped).
pub struct Layer {
    name: String,
    is_dynamic: bool,
    index: Box<dyn SpatialIndex>,
}

impl Layer {
    /// Create a dynamic layer with the given name and spatial index
    pub fn new(name: impl Into<String>, index: Box<dyn SpatialIndex>) -> Self {
        Self {
            name: name.into(),
            is_dynamic: true,
            index,
        }
    }

    /// Create a static layer; its index is never rebuilt during updates
    ///
    /// Use this for immobile geometry like walls or terrain tiles.
    pub fn new_static(name: impl Into<String>, index: Box<dyn SpatialIndex>) -> Self {
        Self {
            name: name.into(),
            is_dynamic: false,
            index,
        }
    }

    /// The layer name, unique within a collision world
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this layer's index is rebuilt each frame
    pub fn is_dynamic(&self) -> bool {
        self.is_dynamic
    }

    /// Change the dynamic flag
    pub fn set_dynamic(&mut self, is_dynamic: bool) {
        self.is_dynamic = is_dynamic;
    }

    /// Insert an actor into this layer's index
    pub fn insert(&mut self, actor: ActorRef) {
        self.index.insert(actor);
    }

    /// Remove an actor from this layer; returns `true` if it was present
    pub fn remove(&mut self, actor: &ActorRef) -> bool {
        self.index.remove(actor)
    }

    /// Query this layer's index for actors intersecting `region`
    pub fn query(&self, region: &Rect) -> Vec<ActorRef> {
        self.index.query(region)
    }

    /// Rebuild this layer's index from live actor bounds
    pub fn reset(&mut self) {
        self.index.reset();
    }

    /// All actors tracked by this layer
    pub fn actors(&self) -> &[ActorRef] {
        self.index.actors()
    }

    /// Number of actors in this layer
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether this layer holds no actors
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
