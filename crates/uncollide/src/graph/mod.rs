//! Graph collaborators
//!
//! The resolver never owns nodes. It reads positions and radii through
//! [`NodeStore`], writes positions back through it, and asks a
//! [`GraphExpander`] to spread the whole layout when nudging is not enough.

mod expand;
mod store;

pub use expand::{GraphExpander, UniformExpansion};
pub use store::{MemoryNodeStore, NodeStore};

use crate::foundation::math::Coordinates;

/// Opaque handle to a node in a [`NodeStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(usize);

impl NodeHandle {
    /// Create a handle from a store index
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the store index
    pub const fn index(self) -> usize {
        self.0
    }

    /// Every handle of a store holding `count` nodes, in enumeration order
    pub fn all(count: usize) -> impl Iterator<Item = Self> {
        (0..count).map(Self)
    }
}

impl From<usize> for NodeHandle {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// Mean position of every node, over all of the store's axes
///
/// Accumulates in `f64` so large layouts do not drift.
pub fn mean_position(store: &dyn NodeStore) -> Coordinates {
    let count = store.count();
    if count == 0 {
        return Coordinates::zeros();
    }

    let mut sum = [0.0_f64; 3];
    for handle in NodeHandle::all(count) {
        let position = store.position(handle);
        for (axis, total) in sum.iter_mut().enumerate() {
            *total += f64::from(position[axis]);
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    let mean = sum.map(|total| (total / count as f64) as f32);
    Coordinates::new(mean[0], mean[1], mean[2])
}

/// Translate every node so the layout's mean lands on `target`
pub fn move_mean(store: &mut dyn NodeStore, target: &Coordinates) {
    let offset = target - mean_position(store);
    for handle in NodeHandle::all(store.count()) {
        let position = store.position(handle);
        store.set_position(handle, position + offset);
    }
}
