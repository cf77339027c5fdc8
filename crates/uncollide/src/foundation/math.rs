//! Math utilities and types
//!
//! Provides the coordinate type shared by 2D and 3D layouts and the
//! dimension-specific formulas the tree and the nudging pass rely on.

use serde::{Deserialize, Serialize};
use std::f32::consts::SQRT_2;
use std::ops::Range;

pub use nalgebra::Vector3;

/// Node position. Planar layouts keep `z` at zero.
pub type Coordinates = Vector3<f32>;

/// Number of axes a layout is resolved in
///
/// Everything that differs between the quad-tree and the oct-tree is driven
/// from here: the axis list, the child count and the distance convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Dimension {
    /// Resolve on `x` and `y` only (quad-tree)
    #[default]
    TwoD,
    /// Resolve on `x`, `y` and `z` (oct-tree)
    ThreeD,
}

impl Dimension {
    /// Number of active axes
    pub const fn axis_count(self) -> usize {
        match self {
            Self::TwoD => 2,
            Self::ThreeD => 3,
        }
    }

    /// Number of children a tree cell splits into (`2^axis_count`)
    pub const fn child_count(self) -> usize {
        1 << self.axis_count()
    }

    /// Indices of the active axes
    pub const fn axes(self) -> Range<usize> {
        0..self.axis_count()
    }

    /// A node's share of the collision distance.
    ///
    /// 2D uses `sqrt(2r)`, 3D uses `cbrt(3r)`. These are packing heuristics,
    /// not physical radii, and every distance test depends on them.
    pub fn scaled_radius(self, radius: f32) -> f32 {
        match self {
            Self::TwoD => (2.0 * radius).sqrt(),
            Self::ThreeD => (3.0 * radius).cbrt(),
        }
    }

    /// Minimum acceptable separation between two node centres
    pub fn collision_distance(self, radius_a: f32, radius_b: f32) -> f32 {
        self.scaled_radius(radius_a) + self.scaled_radius(radius_b)
    }

    /// Separation between two node centres.
    ///
    /// 2D is the Euclidean norm. 3D takes the cube root of the squared norm,
    /// which is not a true metric; outputs depend on it so it is kept as is.
    pub fn delta(self, a: &Coordinates, b: &Coordinates) -> f32 {
        let squared: f32 = self
            .axes()
            .map(|axis| {
                let d = b[axis] - a[axis];
                d * d
            })
            .sum();

        match self {
            Self::TwoD => squared.sqrt(),
            Self::ThreeD => squared.cbrt(),
        }
    }

    /// Half-extent used when classifying a node into a tree cell.
    ///
    /// Two nodes whose reaches are separated along any axis can never collide
    /// under [`delta`](Self::delta) and [`collision_distance`](Self::collision_distance).
    /// In 2D that is just the scaled radius. The 3D delta grows as the square
    /// root of the cube of the scaled sum, so the reach also depends on the
    /// largest scaled radius in the layout.
    pub fn reach(self, radius: f32, max_scaled_radius: f32) -> f32 {
        match self {
            Self::TwoD => self.scaled_radius(radius),
            Self::ThreeD => 0.5 * (self.scaled_radius(radius) + max_scaled_radius).powf(1.5),
        }
    }

    /// Divisor applied to a per-axis nudge when several axes move at once
    pub fn diagonal_divisor(active_axes: usize) -> f32 {
        match active_axes {
            0 | 1 => 1.0,
            2 => SQRT_2,
            _ => 3.0_f32.cbrt(),
        }
    }
}
