//! Loose quad-tree / oct-tree over node footprints
//!
//! A single implementation serves both layouts: a cell splits into
//! `2^axis_count` children and classification walks the active axes.
//! Cells live in a flat arena and refer to their children by index.
//!
//! Nodes whose footprint straddles a split boundary stay in the coarser
//! cell's overflow set instead of being duplicated, so a collider lookup
//! has to gather the overflow of every cell along the node's path.

use super::bounds::BoundingVolume;
use super::SpatialError;
use crate::config::TreeConfig;
use crate::foundation::math::{Coordinates, Dimension};
use crate::graph::{NodeHandle, NodeStore};
use log::trace;
use std::ops::Range;

/// Index of a cell in the tree's arena
pub type CellId = usize;

/// Snapshot of a node taken when the tree is built
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    /// Node centre
    pub center: Coordinates,
    /// Node radius
    pub radius: f32,
    /// Half-extent used for classification, see [`Dimension::reach`]
    pub reach: f32,
}

impl Footprint {
    /// Snapshot every node of a store
    pub fn snapshot<S: NodeStore + ?Sized>(store: &S, dimension: Dimension) -> Vec<Self> {
        let radii: Vec<f32> = NodeHandle::all(store.count()).map(|h| store.radius(h)).collect();
        let max_scaled_radius = radii
            .iter()
            .map(|&radius| dimension.scaled_radius(radius))
            .fold(0.0_f32, f32::max);

        NodeHandle::all(store.count())
            .zip(radii)
            .map(|(handle, radius)| Self {
                center: store.position(handle),
                radius,
                reach: dimension.reach(radius, max_scaled_radius),
            })
            .collect()
    }
}

/// Single cell in the tree
#[derive(Debug, Clone)]
pub struct Cell {
    bounds: BoundingVolume,
    overflow: Vec<NodeHandle>,
    /// Children are contiguous in the arena, starting here
    first_child: Option<CellId>,
    depth: u32,
}

impl Cell {
    /// Create an empty leaf
    pub const fn new(bounds: BoundingVolume, depth: u32) -> Self {
        Self {
            bounds,
            overflow: Vec::new(),
            first_child: None,
            depth,
        }
    }

    /// Region covered by this cell
    pub const fn bounds(&self) -> &BoundingVolume {
        &self.bounds
    }

    /// Nodes held directly by this cell
    pub fn overflow(&self) -> &[NodeHandle] {
        &self.overflow
    }

    /// Depth in the tree (0 = root)
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Check if this cell has no children
    pub const fn is_leaf(&self) -> bool {
        self.first_child.is_none()
    }
}

/// Capacity-bounded loose spatial index
///
/// The tree reads node data once, at construction. It must be rebuilt after
/// any node moves.
#[derive(Debug, Clone)]
pub struct SpatialTree {
    dimension: Dimension,
    config: TreeConfig,
    cells: Vec<Cell>,
    footprints: Vec<Footprint>,
}

impl SpatialTree {
    /// Arena index of the root cell
    pub const ROOT: CellId = 0;

    /// Create a tree with an empty root leaf over `bounds`
    ///
    /// `footprints` is indexed by handle; nothing is inserted yet.
    pub fn new(bounds: BoundingVolume, footprints: Vec<Footprint>, config: TreeConfig) -> Self {
        Self {
            dimension: bounds.dimension(),
            config,
            cells: vec![Cell::new(bounds, 0)],
            footprints,
        }
    }

    /// Build a tree over every node in a store
    ///
    /// The root bounds are computed from the node positions, so an empty
    /// store has none and yields [`SpatialError::EmptyInput`]. An empty tree
    /// is still valid: [`SpatialTree::new`] with no footprints is a single
    /// empty leaf that reports no collisions.
    pub fn build<S: NodeStore + ?Sized>(
        store: &S,
        dimension: Dimension,
        config: &TreeConfig,
    ) -> Result<Self, SpatialError> {
        let footprints = Footprint::snapshot(store, dimension);
        let bounds = BoundingVolume::compute(dimension, footprints.iter().map(|f| f.center))?;

        let mut tree = Self::new(bounds, footprints, config.clone());
        for handle in NodeHandle::all(tree.footprints.len()) {
            tree.insert(handle);
        }

        trace!(
            "Built {:?} tree: {} nodes, {} cells, depth {}",
            dimension,
            tree.footprints.len(),
            tree.cells.len(),
            tree.depth()
        );

        Ok(tree)
    }

    /// Insert a node
    pub fn insert(&mut self, handle: NodeHandle) {
        self.insert_into(Self::ROOT, handle);
    }

    fn insert_into(&mut self, cell: CellId, handle: NodeHandle) {
        if let Some(first) = self.cells[cell].first_child {
            if let Some(child) = self.classify(cell, handle) {
                self.insert_into(first + child, handle);
                return;
            }
        }

        let target = &mut self.cells[cell];
        target.overflow.push(handle);

        let should_split = target.is_leaf()
            && target.overflow.len() > self.config.max_objects
            && target.depth < self.config.max_levels;

        if should_split {
            self.split(cell);
        }
    }

    /// Give a leaf its `2^D` children and push down every node that now fits
    fn split(&mut self, cell: CellId) {
        let first = self.cells.len();
        let depth = self.cells[cell].depth + 1;
        let children = self.cells[cell].bounds.subdivide();

        self.cells.extend(children.into_iter().map(|bounds| Cell::new(bounds, depth)));
        self.cells[cell].first_child = Some(first);

        let pending = std::mem::take(&mut self.cells[cell].overflow);
        let mut straddling = Vec::new();
        for handle in pending {
            match self.classify(cell, handle) {
                Some(child) => self.insert_into(first + child, handle),
                None => straddling.push(handle),
            }
        }
        trace!("Split cell {cell} at depth {}: {} nodes straddle", depth - 1, straddling.len());
        self.cells[cell].overflow = straddling;
    }

    /// Child of `cell` that wholly contains the node's reach, if any
    ///
    /// On every active axis the reach must sit strictly on one side of the
    /// cell's midpoint; a node touching or crossing any split plane returns
    /// `None`.
    pub fn classify(&self, cell: CellId, handle: NodeHandle) -> Option<usize> {
        let footprint = &self.footprints[handle.index()];
        let mid = self.cells[cell].bounds.mid();

        let mut index = 0;
        for axis in self.dimension.axes() {
            if footprint.center[axis] + footprint.reach < mid[axis] {
                // lower half, bit stays clear
            } else if footprint.center[axis] - footprint.reach > mid[axis] {
                index |= 1 << axis;
            } else {
                return None;
            }
        }

        Some(index)
    }

    /// Candidate colliders of a node, including the node itself
    ///
    /// Follows the node's classification path from the root and gathers the
    /// whole overflow set of every cell on it, deepest first.
    pub fn possible_colliders(&self, handle: NodeHandle) -> Vec<NodeHandle> {
        let mut colliders = Vec::new();
        self.collect_colliders(Self::ROOT, handle, &mut colliders);
        colliders
    }

    fn collect_colliders(&self, cell: CellId, handle: NodeHandle, colliders: &mut Vec<NodeHandle>) {
        if let Some(first) = self.cells[cell].first_child {
            if let Some(child) = self.classify(cell, handle) {
                self.collect_colliders(first + child, handle, colliders);
            }
        }
        colliders.extend_from_slice(&self.cells[cell].overflow);
    }

    /// Dimension the tree partitions
    pub const fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Snapshot of a node
    pub fn footprint(&self, handle: NodeHandle) -> &Footprint {
        &self.footprints[handle.index()]
    }

    /// Number of nodes the tree was built over
    pub fn handle_count(&self) -> usize {
        self.footprints.len()
    }

    /// Number of cells in the arena
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Get a cell by arena index
    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id)
    }

    /// Arena indices of a cell's children, `None` for leaves
    pub fn children(&self, id: CellId) -> Option<Range<CellId>> {
        let first = self.cells.get(id)?.first_child?;
        Some(first..first + self.dimension.child_count())
    }

    /// Deepest cell depth
    pub fn depth(&self) -> u32 {
        self.cells.iter().map(Cell::depth).max().unwrap_or(0)
    }
}
