//! Node position and radius storage

use super::NodeHandle;
use crate::foundation::math::{Coordinates, Dimension};

/// Read/write access to node positions and radii
///
/// Handles run from `0` to `count() - 1`.
pub trait NodeStore {
    /// Number of nodes
    fn count(&self) -> usize;

    /// Number of usable coordinate axes (2 or 3)
    fn axis_count(&self) -> usize;

    /// Current position of a node
    fn position(&self, handle: NodeHandle) -> Coordinates;

    /// Move a node
    fn set_position(&mut self, handle: NodeHandle, position: Coordinates);

    /// Radius of a node
    fn radius(&self, handle: NodeHandle) -> f32;
}

/// In-memory node store
#[derive(Debug, Clone, Default)]
pub struct MemoryNodeStore {
    dimension: Dimension,
    positions: Vec<Coordinates>,
    radii: Vec<f32>,
}

impl MemoryNodeStore {
    /// Create an empty store with the given number of axes
    pub const fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            positions: Vec::new(),
            radii: Vec::new(),
        }
    }

    /// Add a node, builder style
    #[must_use]
    pub fn with_node(mut self, position: Coordinates, radius: f32) -> Self {
        self.push(position, radius);
        self
    }

    /// Add a node and return its handle
    pub fn push(&mut self, position: Coordinates, radius: f32) -> NodeHandle {
        let handle = NodeHandle::new(self.positions.len());
        self.positions.push(self.flatten(position));
        self.radii.push(radius.max(0.0));
        handle
    }

    /// All positions in handle order
    pub fn positions(&self) -> &[Coordinates] {
        &self.positions
    }

    /// Dimension the store was created with
    pub const fn dimension(&self) -> Dimension {
        self.dimension
    }

    fn flatten(&self, mut position: Coordinates) -> Coordinates {
        if self.dimension == Dimension::TwoD {
            position.z = 0.0;
        }
        position
    }
}

impl NodeStore for MemoryNodeStore {
    fn count(&self) -> usize {
        self.positions.len()
    }

    fn axis_count(&self) -> usize {
        self.dimension.axis_count()
    }

    fn position(&self, handle: NodeHandle) -> Coordinates {
        self.positions[handle.index()]
    }

    fn set_position(&mut self, handle: NodeHandle, position: Coordinates) {
        let position = self.flatten(position);
        self.positions[handle.index()] = position;
    }

    fn radius(&self, handle: NodeHandle) -> f32 {
        self.radii[handle.index()]
    }
}
