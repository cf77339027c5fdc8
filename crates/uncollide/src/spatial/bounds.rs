//! Axis-aligned bounding rectangle / box

use super::SpatialError;
use crate::foundation::math::{Coordinates, Dimension};

/// Axis-aligned bounding region over the active axes of a layout
///
/// Inactive axes (z in 2D) are held at zero. Child regions are new values
/// split at [`mid`](Self::mid); bit `i` of a child index is set when the
/// child covers the upper half of axis `i`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingVolume {
    dimension: Dimension,
    min: Coordinates,
    max: Coordinates,
}

impl BoundingVolume {
    /// Create a volume from its corners
    pub fn new(dimension: Dimension, min: Coordinates, max: Coordinates) -> Self {
        let mut lower = Coordinates::zeros();
        let mut upper = Coordinates::zeros();
        for axis in dimension.axes() {
            lower[axis] = min[axis].min(max[axis]);
            upper[axis] = min[axis].max(max[axis]);
        }

        Self {
            dimension,
            min: lower,
            max: upper,
        }
    }

    /// Smallest volume enclosing every position, in a single scan
    pub fn compute<I>(dimension: Dimension, positions: I) -> Result<Self, SpatialError>
    where
        I: IntoIterator<Item = Coordinates>,
    {
        let mut positions = positions.into_iter();
        let first = positions.next().ok_or(SpatialError::EmptyInput)?;

        let (min, max) = positions.fold((first, first), |(mut min, mut max), position| {
            for axis in dimension.axes() {
                min[axis] = min[axis].min(position[axis]);
                max[axis] = max[axis].max(position[axis]);
            }
            (min, max)
        });

        Ok(Self::new(dimension, min, max))
    }

    /// Dimension this volume spans
    pub const fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Minimum corner
    pub const fn min(&self) -> Coordinates {
        self.min
    }

    /// Maximum corner
    pub const fn max(&self) -> Coordinates {
        self.max
    }

    /// Midpoint on every axis
    pub fn mid(&self) -> Coordinates {
        (self.min + self.max) * 0.5
    }

    /// Whether a point lies inside or on the boundary (active axes only)
    pub fn contains(&self, point: &Coordinates) -> bool {
        self.dimension
            .axes()
            .all(|axis| point[axis] >= self.min[axis] && point[axis] <= self.max[axis])
    }

    /// The child region with the given index
    pub fn child(&self, index: usize) -> Self {
        debug_assert!(index < self.dimension.child_count());

        let mid = self.mid();
        let mut min = self.min;
        let mut max = self.max;
        for axis in self.dimension.axes() {
            if index & (1 << axis) != 0 {
                min[axis] = mid[axis];
            } else {
                max[axis] = mid[axis];
            }
        }

        Self {
            dimension: self.dimension,
            min,
            max,
        }
    }

    /// All `2^D` child regions in index order
    pub fn subdivide(&self) -> Vec<Self> {
        (0..self.dimension.child_count()).map(|index| self.child(index)).collect()
    }
}
