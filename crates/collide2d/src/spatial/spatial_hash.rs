//! Uniform-grid spatial hash
//!
//! Maps actor bounding rectangles onto fixed-size grid cells. Insert, remove,
//! and query cost is proportional to the number of cells a rectangle covers,
//! which stays small when the cell size roughly matches typical actor size.

use std::collections::{HashMap, HashSet};

use super::spatial_index::SpatialIndex;
use crate::collision::{actor_key, ActorRef};
use crate::geometry::Rect;

/// Uniform-grid broad-phase index
///
/// Cells are keyed by an `(i32, i32)` tuple computed by floor-dividing world
/// coordinates by the cell size, so neighboring cells can never alias each
/// other. An actor overlapping several cells is registered in each of them;
/// queries deduplicate before filtering by true rectangle intersection.
pub struct SpatialHash {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<ActorRef>>,
    actors: Vec<ActorRef>,
}

impl SpatialHash {
    /// Create a spatial hash with the given cell size
    ///
    /// The cell size is fixed for the lifetime of the index.
    ///
    /// # Panics
    ///
    /// Panics if `cell_size` is not positive.
    pub fn new(cell_size: f32) -> Self {
        assert!(cell_size > 0.0, "cell size must be positive");
        Self {
            cell_size,
            cells: HashMap::new(),
            actors: Vec::new(),
        }
    }

    /// The cell size chosen at construction
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of grid cells currently occupied (for diagnostics)
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell_coord(&self, v: f32) -> i32 {
        (v / self.cell_size).floor() as i32
    }

    /// Inclusive range of cells covered by a rectangle
    ///
    /// Inclusive on both ends, so a zero-area rectangle still occupies the
    /// cell under its corner.
    fn cell_range(&self, rect: &Rect) -> ((i32, i32), (i32, i32)) {
        (
            (self.cell_coord(rect.min.x), self.cell_coord(rect.min.y)),
            (self.cell_coord(rect.max.x), self.cell_coord(rect.max.y)),
        )
    }

    fn insert_into_cells(&mut self, actor: &ActorRef, rect: &Rect) {
        let ((min_x, min_y), (max_x, max_y)) = self.cell_range(rect);
        for cy in min_y..=max_y {
            for cx in min_x..=max_x {
                self.cells.entry((cx, cy)).or_default().push(actor.clone());
            }
        }
    }
}

impl SpatialIndex for SpatialHash {
    fn insert(&mut self, actor: ActorRef) {
        let key = actor_key(&actor);
        if self.actors.iter().any(|a| actor_key(a) == key) {
            return; // already tracked
        }
        let rect = actor.borrow().bounding_shape().bounding_rect();
        self.insert_into_cells(&actor, &rect);
        self.actors.push(actor);
    }

    fn remove(&mut self, actor: &ActorRef) -> bool {
        let key = actor_key(actor);
        let Some(pos) = self.actors.iter().position(|a| actor_key(a) == key) else {
            return false;
        };
        self.actors.swap_remove(pos);
        for list in self.cells.values_mut() {
            list.retain(|a| actor_key(a) != key);
        }
        self.cells.retain(|_, list| !list.is_empty());
        true
    }

    fn query(&self, region: &Rect) -> Vec<ActorRef> {
        let ((min_x, min_y), (max_x, max_y)) = self.cell_range(region);
        let mut seen = HashSet::new();
        let mut results = Vec::new();
        for cy in min_y..=max_y {
            for cx in min_x..=max_x {
                let Some(list) = self.cells.get(&(cx, cy)) else {
                    continue;
                };
                for actor in list {
                    if !seen.insert(actor_key(actor)) {
                        continue;
                    }
                    // Cell membership is a superset test; confirm the
                    // rectangles actually intersect.
                    let rect = actor.borrow().bounding_shape().bounding_rect();
                    if rect.intersects(region) {
                        results.push(actor.clone());
                    }
                }
            }
        }
        results
    }

    fn reset(&mut self) {
        self.cells.clear();
        let actors = std::mem::take(&mut self.actors);
        for actor in &actors {
            let rect = actor.borrow().bounding_shape().bounding_rect();
            self.insert_into_cells(actor, &rect);
        }
        self.actors = actors;
    }

    fn actors(&self) -> &[ActorRef] {
        &self.actors
    }

    fn clear(&mut self) {
        self.cells.clear();
        self.actors.clear();
    }
}
