//! Quad-tree spatial partitioning
//!
//! Recursively subdivides 2D space into quadrants when actor density exceeds
//! a threshold. Better locality than a uniform grid for sparse or clustered
//! actor distributions.
//!
//! Items that straddle more than one quadrant stay at the parent node, so
//! each item lives in exactly one node and queries never report duplicates
//! from sibling nodes. Nodes are never merged back together when they empty
//! out; a tree under heavy insert/remove churn can accumulate nodes until
//! the next [`reset`](SpatialIndex::reset) rebuilds it.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::spatial_index::SpatialIndex;
use crate::collision::{actor_key, ActorRef};
use crate::foundation::math::Vec2;
use crate::geometry::Rect;

/// Configuration for quad-tree behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuadTreeConfig {
    /// Maximum items per node before subdivision
    pub max_items_per_node: usize,

    /// Maximum subdivision depth
    pub max_depth: u32,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            max_items_per_node: 8,
            max_depth: 8,
        }
    }
}

/// Item stored in the tree: an actor plus its cached bounding rectangle
struct QuadItem {
    actor: ActorRef,
    /// Bounding rectangle snapshot taken at insert or reset time
    bounds: Rect,
    /// Arena index of the node currently holding this item
    node: usize,
}

/// Single node in the quad-tree arena
struct QuadNode {
    /// World-space region covered by this node
    bounds: Rect,

    /// Depth in the tree (0 = root)
    depth: u32,

    /// Keys of the items held at this node
    items: Vec<usize>,

    /// Arena indices of the four child quadrants, `None` if leaf
    children: Option<[usize; 4]>,
}

impl QuadNode {
    fn new(bounds: Rect, depth: u32) -> Self {
        Self {
            bounds,
            depth,
            items: Vec::new(),
            children: None,
        }
    }
}

/// Quad-tree broad-phase index
///
/// Nodes live in a flat arena (`Vec`) and reference each other by index;
/// every item carries the index of the node holding it, so removal never
/// searches the tree. Items whose bounds fall outside the world bounds are
/// kept at the root.
pub struct QuadTree {
    nodes: Vec<QuadNode>,
    items: HashMap<usize, QuadItem>,
    actors: Vec<ActorRef>,
    config: QuadTreeConfig,
    world_bounds: Rect,
}

impl QuadTree {
    /// Create a quad tree covering the given world bounds with default config
    pub fn new(world_bounds: Rect) -> Self {
        Self::with_config(world_bounds, QuadTreeConfig::default())
    }

    /// Create a quad tree with explicit subdivision parameters
    pub fn with_config(world_bounds: Rect, config: QuadTreeConfig) -> Self {
        Self {
            nodes: vec![QuadNode::new(world_bounds, 0)],
            items: HashMap::new(),
            actors: Vec::new(),
            config,
            world_bounds,
        }
    }

    /// The world bounds covered by the root node
    pub fn world_bounds(&self) -> Rect {
        self.world_bounds
    }

    /// Total number of nodes in the tree (for diagnostics)
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Index of the smallest node fully containing `bounds`
    ///
    /// Falls back to the deepest node reached when no child fully contains
    /// the rectangle, which is the root for out-of-bounds items.
    fn find_node(&self, bounds: &Rect) -> usize {
        let mut node = 0;
        while let Some(children) = self.nodes[node].children {
            let next = children
                .into_iter()
                .find(|&child| self.nodes[child].bounds.contains_rect(bounds));
            match next {
                Some(child) => node = child,
                None => break,
            }
        }
        node
    }

    fn insert_item(&mut self, key: usize, actor: ActorRef, bounds: Rect) {
        let node = self.find_node(&bounds);
        self.nodes[node].items.push(key);
        self.items.insert(key, QuadItem { actor, bounds, node });
        self.maybe_subdivide(node);
    }

    /// Split a leaf that exceeded capacity and push its items down
    ///
    /// Items that fit entirely within one quadrant move into it; items that
    /// straddle a quadrant boundary stay at this node.
    fn maybe_subdivide(&mut self, node: usize) {
        if self.nodes[node].children.is_some()
            || self.nodes[node].items.len() <= self.config.max_items_per_node
            || self.nodes[node].depth >= self.config.max_depth
        {
            return;
        }

        let bounds = self.nodes[node].bounds;
        let depth = self.nodes[node].depth;
        let center = bounds.center();
        let quadrants = [
            Rect::new(bounds.min, center),
            Rect::new(Vec2::new(center.x, bounds.min.y), Vec2::new(bounds.max.x, center.y)),
            Rect::new(Vec2::new(bounds.min.x, center.y), Vec2::new(center.x, bounds.max.y)),
            Rect::new(center, bounds.max),
        ];

        let first = self.nodes.len();
        for quadrant in quadrants {
            self.nodes.push(QuadNode::new(quadrant, depth + 1));
        }
        let children = [first, first + 1, first + 2, first + 3];
        self.nodes[node].children = Some(children);

        let keys = std::mem::take(&mut self.nodes[node].items);
        for key in keys {
            let bounds = self.items[&key].bounds;
            let target = children
                .into_iter()
                .find(|&child| self.nodes[child].bounds.contains_rect(&bounds));
            match target {
                Some(child) => {
                    self.nodes[child].items.push(key);
                    if let Some(item) = self.items.get_mut(&key) {
                        item.node = child;
                    }
                }
                None => self.nodes[node].items.push(key),
            }
        }

        // A child may itself exceed capacity when items cluster; recursion
        // is bounded by max_depth.
        for child in children {
            self.maybe_subdivide(child);
        }
    }

    fn query_node(
        &self,
        node: usize,
        region: &Rect,
        seen: &mut HashSet<usize>,
        results: &mut Vec<ActorRef>,
    ) {
        // The root is always scanned: out-of-bounds items are kept there.
        if node != 0 && !self.nodes[node].bounds.intersects(region) {
            return;
        }
        for &key in &self.nodes[node].items {
            let item = &self.items[&key];
            if item.bounds.intersects(region) && seen.insert(key) {
                results.push(item.actor.clone());
            }
        }
        if let Some(children) = self.nodes[node].children {
            for child in children {
                self.query_node(child, region, seen, results);
            }
        }
    }
}

impl SpatialIndex for QuadTree {
    fn insert(&mut self, actor: ActorRef) {
        let key = actor_key(&actor);
        if self.items.contains_key(&key) {
            return; // already tracked
        }
        let bounds = actor.borrow().bounding_shape().bounding_rect();
        self.actors.push(actor.clone());
        self.insert_item(key, actor, bounds);
    }

    fn remove(&mut self, actor: &ActorRef) -> bool {
        let key = actor_key(actor);
        let Some(item) = self.items.remove(&key) else {
            return false;
        };
        let node = &mut self.nodes[item.node];
        if let Some(pos) = node.items.iter().position(|&k| k == key) {
            node.items.swap_remove(pos);
        }
        if let Some(pos) = self.actors.iter().position(|a| actor_key(a) == key) {
            self.actors.swap_remove(pos);
        }
        true
    }

    fn query(&self, region: &Rect) -> Vec<ActorRef> {
        let mut seen = HashSet::new();
        let mut results = Vec::new();
        self.query_node(0, region, &mut seen, &mut results);
        results
    }

    fn reset(&mut self) {
        // Motion can carry an item across subdivision boundaries, so the
        // whole tree is rebuilt from live bounds.
        self.nodes.clear();
        self.nodes.push(QuadNode::new(self.world_bounds, 0));
        self.items.clear();
        let actors = std::mem::take(&mut self.actors);
        for actor in &actors {
            let bounds = actor.borrow().bounding_shape().bounding_rect();
            self.insert_item(actor_key(actor), actor.clone(), bounds);
        }
        self.actors = actors;
    }

    fn actors(&self) -> &[ActorRef] {
        &self.actors
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.nodes.push(QuadNode::new(self.world_bounds, 0));
        self.items.clear();
        self.actors.clear();
    }
}
