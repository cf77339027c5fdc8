//! Collision and twin detection over a spatial tree
//!
//! Broad phase comes from [`SpatialTree::possible_colliders`]; the narrow
//! phase compares [`Dimension::delta`] against a scaled
//! [`Dimension::collision_distance`].

use crate::foundation::math::Dimension;
use crate::graph::{NodeHandle, NodeStore};
use crate::spatial::SpatialTree;

/// Collision queries against one tree snapshot
#[derive(Debug, Clone, Copy)]
pub struct CollisionResolver<'a> {
    tree: &'a SpatialTree,
}

impl<'a> CollisionResolver<'a> {
    /// Create a resolver over a built tree
    pub const fn new(tree: &'a SpatialTree) -> Self {
        Self { tree }
    }

    /// Minimum acceptable separation between two nodes
    pub fn collision_distance(&self, a: NodeHandle, b: NodeHandle) -> f32 {
        let dimension = self.tree.dimension();
        dimension.collision_distance(self.tree.footprint(a).radius, self.tree.footprint(b).radius)
    }

    /// Separation between two nodes
    pub fn delta(&self, a: NodeHandle, b: NodeHandle) -> f32 {
        let dimension = self.tree.dimension();
        dimension.delta(&self.tree.footprint(a).center, &self.tree.footprint(b).center)
    }

    /// Whether two nodes are closer than `threshold` times their collision distance
    pub fn within(&self, a: NodeHandle, b: NodeHandle, threshold: f32) -> bool {
        self.delta(a, b) < self.collision_distance(a, b) * threshold
    }

    /// Whether two nodes collide
    pub fn collides(&self, a: NodeHandle, b: NodeHandle) -> bool {
        self.within(a, b, 1.0)
    }

    /// Nodes that are twins of `handle` under `threshold`, in traversal order
    ///
    /// Only candidates on the node's own classification path are examined,
    /// so a node held high in the tree may miss a twin stored below it. The
    /// twin stored below always finds it, which is enough for a full pass.
    pub fn twins(&self, handle: NodeHandle, threshold: f32) -> Vec<NodeHandle> {
        self.tree
            .possible_colliders(handle)
            .into_iter()
            .filter(|&other| other != handle && self.within(handle, other, threshold))
            .collect()
    }

    /// Whether any two nodes in the tree collide
    pub fn has_collision(&self) -> bool {
        NodeHandle::all(self.tree.handle_count()).any(|handle| {
            self.tree
                .possible_colliders(handle)
                .into_iter()
                .any(|other| other != handle && self.collides(handle, other))
        })
    }
}

/// All-pairs collision check straight from a store
///
/// Quadratic; used as the reference the tree is checked against.
pub fn brute_force_has_collision<S: NodeStore + ?Sized>(store: &S, dimension: Dimension) -> bool {
    brute_force_any(store, dimension, 1.0)
}

/// All-pairs twin check straight from a store
pub fn brute_force_has_twins<S: NodeStore + ?Sized>(
    store: &S,
    dimension: Dimension,
    threshold: f32,
) -> bool {
    brute_force_any(store, dimension, threshold)
}

fn brute_force_any<S: NodeStore + ?Sized>(store: &S, dimension: Dimension, threshold: f32) -> bool {
    let count = store.count();
    NodeHandle::all(count).any(|a| {
        NodeHandle::all(count).skip(a.index() + 1).any(|b| {
            let delta = dimension.delta(&store.position(a), &store.position(b));
            delta < dimension.collision_distance(store.radius(a), store.radius(b)) * threshold
        })
    })
}
