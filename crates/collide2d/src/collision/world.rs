//! Per-frame collision orchestration across layers
//!
//! The world runs a two-phase cycle each update: rebuild every dynamic
//! layer's spatial index, then walk each configured layer pairing, query
//! candidate actors, and dispatch callbacks for true shape intersections.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use super::actor::{actor_key, ActorRef, CollisionInfo};
use super::layer::Layer;

/// Errors surfaced by [`CollisionWorld`] configuration calls
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollisionError {
    /// A layer name was referenced before being registered
    #[error("undefined layer: {0}")]
    UndefinedLayer(String),

    /// A layer with this name is already registered
    #[error("duplicate layer: {0}")]
    DuplicateLayer(String),
}

/// Collision world: named layers plus the pairings tested each update
///
/// Every layer is implicitly paired with itself; cross-layer tests must be
/// registered with [`add_collision_between_layers`]. A pair of actors is
/// reported to callbacks at most once per frame per layer pairing, and an
/// actor is never tested against itself.
///
/// [`add_collision_between_layers`]: CollisionWorld::add_collision_between_layers
pub struct CollisionWorld {
    layers: HashMap<String, Layer>,
    /// Registered cross-layer pairings, stored with names sorted
    pairings: HashSet<(String, String)>,
    /// Layer registration order, for deterministic dispatch
    layer_order: Vec<String>,
}

impl CollisionWorld {
    /// Create an empty collision world
    pub fn new() -> Self {
        Self {
            layers: HashMap::new(),
            pairings: HashSet::new(),
            layer_order: Vec::new(),
        }
    }

    /// Register a layer
    ///
    /// # Errors
    ///
    /// Returns [`CollisionError::DuplicateLayer`] if a layer with the same
    /// name is already registered.
    pub fn add_layer(&mut self, layer: Layer) -> Result<(), CollisionError> {
        if self.layers.contains_key(layer.name()) {
            return Err(CollisionError::DuplicateLayer(layer.name().to_owned()));
        }
        log::info!(
            "Registering collision layer '{}' ({})",
            layer.name(),
            if layer.is_dynamic() { "dynamic" } else { "static" }
        );
        self.layer_order.push(layer.name().to_owned());
        self.layers.insert(layer.name().to_owned(), layer);
        Ok(())
    }

    /// Remove a layer and every pairing that references it
    ///
    /// # Errors
    ///
    /// Returns [`CollisionError::UndefinedLayer`] if no layer with this name
    /// is registered.
    pub fn remove_layer(&mut self, name: &str) -> Result<Layer, CollisionError> {
        let layer = self
            .layers
            .remove(name)
            .ok_or_else(|| CollisionError::UndefinedLayer(name.to_owned()))?;
        self.layer_order.retain(|n| n != name);
        self.pairings.retain(|(a, b)| a != name && b != name);
        Ok(layer)
    }

    /// Enable collision testing between two layers
    ///
    /// Self-pairings are implicit and need not be registered; calling this
    /// with the same name twice is accepted and has no effect.
    ///
    /// # Errors
    ///
    /// Returns [`CollisionError::UndefinedLayer`] if either name is not
    /// registered.
    pub fn add_collision_between_layers(
        &mut self,
        layer_a: &str,
        layer_b: &str,
    ) -> Result<(), CollisionError> {
        for name in [layer_a, layer_b] {
            if !self.layers.contains_key(name) {
                return Err(CollisionError::UndefinedLayer(name.to_owned()));
            }
        }
        if layer_a == layer_b {
            return Ok(());
        }
        let pair = if layer_a < layer_b {
            (layer_a.to_owned(), layer_b.to_owned())
        } else {
            (layer_b.to_owned(), layer_a.to_owned())
        };
        self.pairings.insert(pair);
        Ok(())
    }

    /// Insert an actor into a layer
    ///
    /// # Errors
    ///
    /// Returns [`CollisionError::UndefinedLayer`] if the layer is not
    /// registered.
    pub fn add_actor(&mut self, layer: &str, actor: ActorRef) -> Result<(), CollisionError> {
        self.layer_checked_mut(layer)?.insert(actor);
        Ok(())
    }

    /// Remove an actor from a layer
    ///
    /// Returns `Ok(false)` when the actor was not present; absence is an
    /// expected, recoverable outcome, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`CollisionError::UndefinedLayer`] if the layer is not
    /// registered.
    pub fn remove_actor(&mut self, layer: &str, actor: &ActorRef) -> Result<bool, CollisionError> {
        Ok(self.layer_checked_mut(layer)?.remove(actor))
    }

    /// Look up a layer by name
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.get(name)
    }

    /// Mutable access to a layer by name
    pub fn layer_mut(&mut self, name: &str) -> Option<&mut Layer> {
        self.layers.get_mut(name)
    }

    /// Registered layer names in registration order
    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.layer_order.iter().map(String::as_str)
    }

    /// Total number of actors across all layers
    pub fn actor_count(&self) -> usize {
        self.layers.values().map(Layer::len).sum()
    }

    /// Run one collision cycle: reset dynamic layers, then dispatch callbacks
    ///
    /// Static layers are skipped during the reset phase as an optimization;
    /// their actors are assumed immobile. Callbacks fire synchronously on the
    /// calling thread, once per actor per colliding pair.
    pub fn update(&mut self, _delta_time: f32) {
        // Reset phase: rebuild every dynamic layer from live actor bounds.
        for name in &self.layer_order {
            if let Some(layer) = self.layers.get_mut(name) {
                if layer.is_dynamic() {
                    layer.reset();
                }
            }
        }

        // Dispatch phase: implicit self-pairs first, then cross pairings in
        // name order so callback ordering is reproducible.
        let mut pairs: Vec<(String, String)> = self
            .layer_order
            .iter()
            .map(|name| (name.clone(), name.clone()))
            .collect();
        let mut cross: Vec<(String, String)> = self.pairings.iter().cloned().collect();
        cross.sort();
        pairs.extend(cross);

        for (name_a, name_b) in &pairs {
            self.dispatch_pair(name_a, name_b);
        }
    }

    /// Test one layer pairing and invoke callbacks for every intersection
    fn dispatch_pair(&self, layer_a: &str, layer_b: &str) {
        let (Some(la), Some(lb)) = (self.layers.get(layer_a), self.layers.get(layer_b)) else {
            return;
        };

        // Snapshot the probe list; callbacks must not observe a partially
        // iterated borrow of the layer.
        let probes: Vec<ActorRef> = la.actors().to_vec();
        let mut processed: HashSet<(usize, usize)> = HashSet::new();
        let mut tested = 0_usize;
        let mut hits = 0_usize;

        for probe in probes {
            let shape = probe.borrow().bounding_shape();
            let region = shape.bounding_rect();
            for candidate in lb.query(&region) {
                let key_a = actor_key(&probe);
                let key_b = actor_key(&candidate);
                if key_a == key_b {
                    continue; // never test an actor against itself
                }
                let pair = (key_a.min(key_b), key_a.max(key_b));
                if !processed.insert(pair) {
                    continue; // already handled from the other direction
                }
                tested += 1;

                let other_shape = candidate.borrow().bounding_shape();
                if !shape.intersects(&other_shape) {
                    continue;
                }
                hits += 1;

                let info_for_probe = CollisionInfo {
                    other: candidate.clone(),
                    other_bounds: other_shape.bounding_rect(),
                };
                let info_for_candidate = CollisionInfo {
                    other: probe.clone(),
                    other_bounds: region,
                };
                probe.borrow_mut().on_collision(&info_for_probe);
                candidate.borrow_mut().on_collision(&info_for_candidate);
            }
        }

        log::trace!(
            "layer pair ({layer_a}, {layer_b}): {tested} narrow-phase tests, {hits} collisions"
        );
    }

    fn layer_checked_mut(&mut self, name: &str) -> Result<&mut Layer, CollisionError> {
        self.layers
            .get_mut(name)
            .ok_or_else(|| CollisionError::UndefinedLayer(name.to_owned()))
    }
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::BasicActor;
    use crate::foundation::math::Vec2;
    use crate::geometry::{BoundingShape, Circle, Rect};
    use crate::spatial::{QuadTree, QuadTreeConfig, SpatialHash, SpatialIndex};
    use std::cell::RefCell;
    use std::rc::Rc;

    type BasicHandle = Rc<RefCell<BasicActor>>;

    fn basic_rect_actor(rect: Rect) -> BasicHandle {
        Rc::new(RefCell::new(BasicActor::with_rect(rect)))
    }

    fn hash_layer(name: &str) -> Layer {
        Layer::new(name, Box::new(SpatialHash::new(16.0)))
    }

    #[test]
    fn test_two_overlapping_actors_collide_once_each() {
        let mut world = CollisionWorld::new();
        world.add_layer(hash_layer("ships")).unwrap();

        let a = basic_rect_actor(Rect::from_xywh(10.0, 10.0, 20.0, 20.0));
        let b = basic_rect_actor(Rect::from_xywh(10.0, 10.0, 20.0, 20.0));
        world.add_actor("ships", a.clone()).unwrap();
        world.add_actor("ships", b.clone()).unwrap();

        world.update(1.0 / 60.0);

        // Exactly once per actor, not twice from both iteration directions.
        assert_eq!(a.borrow().collision_count, 1);
        assert_eq!(b.borrow().collision_count, 1);
    }

    #[test]
    fn test_single_actor_never_self_collides() {
        let mut world = CollisionWorld::new();
        world.add_layer(hash_layer("ships")).unwrap();
        let lone = basic_rect_actor(Rect::from_xywh(0.0, 0.0, 10.0, 10.0));
        world.add_actor("ships", lone.clone()).unwrap();

        world.update(1.0 / 60.0);
        assert_eq!(lone.borrow().collision_count, 0);
    }

    #[test]
    fn test_disjoint_actors_do_not_collide() {
        let mut world = CollisionWorld::new();
        world.add_layer(hash_layer("ships")).unwrap();
        let a = basic_rect_actor(Rect::from_xywh(0.0, 0.0, 5.0, 5.0));
        let b = basic_rect_actor(Rect::from_xywh(50.0, 50.0, 5.0, 5.0));
        world.add_actor("ships", a.clone()).unwrap();
        world.add_actor("ships", b.clone()).unwrap();

        world.update(1.0 / 60.0);
        assert_eq!(a.borrow().collision_count, 0);
        assert_eq!(b.borrow().collision_count, 0);
    }

    #[test]
    fn test_cross_layer_requires_pairing() {
        let mut world = CollisionWorld::new();
        world.add_layer(hash_layer("ships")).unwrap();
        world.add_layer(hash_layer("bullets")).unwrap();

        let ship = basic_rect_actor(Rect::from_xywh(10.0, 10.0, 20.0, 20.0));
        let bullet = basic_rect_actor(Rect::from_xywh(15.0, 15.0, 2.0, 2.0));
        world.add_actor("ships", ship.clone()).unwrap();
        world.add_actor("bullets", bullet.clone()).unwrap();

        // No pairing registered: overlapping actors in different layers
        // must not be reported.
        world.update(1.0 / 60.0);
        assert_eq!(ship.borrow().collision_count, 0);
        assert_eq!(bullet.borrow().collision_count, 0);

        world.add_collision_between_layers("ships", "bullets").unwrap();
        world.update(1.0 / 60.0);
        assert_eq!(ship.borrow().collision_count, 1);
        assert_eq!(bullet.borrow().collision_count, 1);
    }

    #[test]
    fn test_undefined_layer_errors() {
        let mut world = CollisionWorld::new();
        world.add_layer(hash_layer("ships")).unwrap();

        let err = world
            .add_collision_between_layers("ships", "ghosts")
            .unwrap_err();
        assert_eq!(err, CollisionError::UndefinedLayer("ghosts".to_owned()));

        let actor = basic_rect_actor(Rect::from_xywh(0.0, 0.0, 1.0, 1.0));
        assert!(matches!(
            world.add_actor("ghosts", actor.clone()),
            Err(CollisionError::UndefinedLayer(_))
        ));
        let actor_ref: ActorRef = actor;
        assert!(matches!(
            world.remove_actor("ghosts", &actor_ref),
            Err(CollisionError::UndefinedLayer(_))
        ));
        assert!(matches!(
            world.remove_layer("ghosts"),
            Err(CollisionError::UndefinedLayer(_))
        ));
    }

    #[test]
    fn test_duplicate_layer_rejected() {
        let mut world = CollisionWorld::new();
        world.add_layer(hash_layer("ships")).unwrap();
        let err = world.add_layer(hash_layer("ships")).unwrap_err();
        assert_eq!(err, CollisionError::DuplicateLayer("ships".to_owned()));
    }

    #[test]
    fn test_remove_absent_actor_returns_false() {
        let mut world = CollisionWorld::new();
        world.add_layer(hash_layer("ships")).unwrap();
        let actor: ActorRef = basic_rect_actor(Rect::from_xywh(0.0, 0.0, 1.0, 1.0));
        assert!(!world.remove_actor("ships", &actor).unwrap());
    }

    #[test]
    fn test_remove_layer_drops_pairings() {
        let mut world = CollisionWorld::new();
        world.add_layer(hash_layer("ships")).unwrap();
        world.add_layer(hash_layer("bullets")).unwrap();
        world.add_collision_between_layers("ships", "bullets").unwrap();

        let removed = world.remove_layer("bullets").unwrap();
        assert_eq!(removed.name(), "bullets");
        assert!(world.layer("bullets").is_none());
        assert!(world.pairings.is_empty());
        assert_eq!(world.layer_names().collect::<Vec<_>>(), vec!["ships"]);
    }

    #[test]
    fn test_update_picks_up_motion() {
        let mut world = CollisionWorld::new();
        world.add_layer(hash_layer("ships")).unwrap();

        let mover = basic_rect_actor(Rect::from_xywh(0.0, 0.0, 5.0, 5.0));
        let target = basic_rect_actor(Rect::from_xywh(50.0, 50.0, 5.0, 5.0));
        world.add_actor("ships", mover.clone()).unwrap();
        world.add_actor("ships", target.clone()).unwrap();

        world.update(1.0 / 60.0);
        assert_eq!(mover.borrow().collision_count, 0);

        // Move onto the target; the next update rehashes and reports it.
        mover.borrow_mut().shape = BoundingShape::Rect(Rect::from_xywh(48.0, 48.0, 5.0, 5.0));
        world.update(1.0 / 60.0);
        assert_eq!(mover.borrow().collision_count, 1);
        assert_eq!(target.borrow().collision_count, 1);
    }

    #[test]
    fn test_static_layer_skips_reset() {
        let mut world = CollisionWorld::new();
        world
            .add_layer(Layer::new_static("walls", Box::new(SpatialHash::new(16.0))))
            .unwrap();

        let wall = basic_rect_actor(Rect::from_xywh(0.0, 0.0, 5.0, 5.0));
        let other = basic_rect_actor(Rect::from_xywh(0.0, 0.0, 5.0, 5.0));
        world.add_actor("walls", wall.clone()).unwrap();
        world.add_actor("walls", other.clone()).unwrap();

        // Moving a static-layer actor without a reset leaves its grid cells
        // at the old location. The query filter reads the live shape, so the
        // stale registration no longer matches anything and no callback
        // fires.
        wall.borrow_mut().shape = BoundingShape::Rect(Rect::from_xywh(100.0, 100.0, 5.0, 5.0));
        world.update(1.0 / 60.0);
        assert_eq!(wall.borrow().collision_count, 0);
        assert_eq!(other.borrow().collision_count, 0);
    }

    #[test]
    fn test_mixed_shapes_collide() {
        let mut world = CollisionWorld::new();
        world.add_layer(hash_layer("mixed")).unwrap();

        let boxy = basic_rect_actor(Rect::from_xywh(0.0, 0.0, 10.0, 10.0));
        let round = Rc::new(RefCell::new(BasicActor::with_circle(Circle::new(
            Vec2::new(12.0, 5.0),
            3.0,
        ))));
        world.add_actor("mixed", boxy.clone()).unwrap();
        world.add_actor("mixed", round.clone()).unwrap();

        world.update(1.0 / 60.0);
        assert_eq!(boxy.borrow().collision_count, 1);
        assert_eq!(round.borrow().collision_count, 1);
    }

    #[test]
    fn test_bounding_rects_touch_but_shapes_miss() {
        let mut world = CollisionWorld::new();
        world.add_layer(hash_layer("mixed")).unwrap();

        // The circle's bounding rect overlaps the box, but the circle
        // itself clears the corner: broad phase yields a candidate, narrow
        // phase must reject it.
        let boxy = basic_rect_actor(Rect::from_xywh(0.0, 0.0, 10.0, 10.0));
        let round = Rc::new(RefCell::new(BasicActor::with_circle(Circle::new(
            Vec2::new(13.5, 13.5),
            4.0,
        ))));
        world.add_actor("mixed", boxy.clone()).unwrap();
        world.add_actor("mixed", round.clone()).unwrap();

        world.update(1.0 / 60.0);
        assert_eq!(boxy.borrow().collision_count, 0);
        assert_eq!(round.borrow().collision_count, 0);
    }

    /// The broad-phase strategy must not change which collisions are found.
    #[test]
    fn test_hash_and_quadtree_report_identical_collisions() {
        fn run_with<F>(make_index: F) -> Vec<usize>
        where
            F: Fn() -> Box<dyn SpatialIndex>,
        {
            let mut world = CollisionWorld::new();
            world.add_layer(Layer::new("actors", make_index())).unwrap();

            let mut handles = Vec::new();
            for i in 0..20 {
                // Deterministic scatter with a handful of overlaps.
                let x = ((i * 37) % 90) as f32;
                let y = ((i * 53) % 90) as f32;
                let actor = basic_rect_actor(Rect::from_xywh(x, y, 12.0, 12.0));
                world.add_actor("actors", actor.clone()).unwrap();
                handles.push(actor);
            }
            world.update(1.0 / 60.0);
            handles.iter().map(|h| h.borrow().collision_count).collect()
        }

        let hash_counts = run_with(|| Box::new(SpatialHash::new(16.0)));
        let tree_counts = run_with(|| {
            Box::new(QuadTree::with_config(
                Rect::from_xywh(0.0, 0.0, 110.0, 110.0),
                QuadTreeConfig {
                    max_items_per_node: 4,
                    max_depth: 5,
                },
            ))
        });

        assert!(hash_counts.iter().sum::<usize>() > 0);
        assert_eq!(hash_counts, tree_counts);
    }

    /// Callbacks receive the other party and its bounds at test time.
    #[test]
    fn test_collision_info_describes_other_party() {
        struct Recorder {
            shape: BoundingShape,
            seen_bounds: Option<Rect>,
        }
        impl crate::collision::Actor for Recorder {
            fn bounding_shape(&self) -> BoundingShape {
                self.shape
            }
            fn on_collision(&mut self, info: &CollisionInfo) {
                self.seen_bounds = Some(info.other_bounds);
            }
        }

        let mut world = CollisionWorld::new();
        world.add_layer(hash_layer("ships")).unwrap();

        let recorder = Rc::new(RefCell::new(Recorder {
            shape: BoundingShape::Rect(Rect::from_xywh(0.0, 0.0, 10.0, 10.0)),
            seen_bounds: None,
        }));
        let other = basic_rect_actor(Rect::from_xywh(5.0, 5.0, 10.0, 10.0));
        world.add_actor("ships", recorder.clone()).unwrap();
        world.add_actor("ships", other).unwrap();

        world.update(1.0 / 60.0);
        assert_eq!(
            recorder.borrow().seen_bounds,
            Some(Rect::from_xywh(5.0, 5.0, 10.0, 10.0))
        );
    }
}
