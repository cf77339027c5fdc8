//! Spatial partitioning data structures
//!
//! Provides the bounding volume and the loose quad-tree / oct-tree used to
//! find candidate colliders among circular and spherical node footprints.

pub mod bounds;
pub mod tree;

pub use bounds::BoundingVolume;
pub use tree::{Cell, CellId, Footprint, SpatialTree};

use thiserror::Error;

/// Spatial indexing errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpatialError {
    /// Bounds were requested over zero positions
    #[error("cannot compute bounds over an empty node set")]
    EmptyInput,
}
