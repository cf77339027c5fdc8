//! Physics module for collision detection
//!
//! Provides collision and twin queries on top of the spatial tree, plus
//! brute-force references for checking the tree against.

pub mod collision;

pub use collision::{brute_force_has_collision, brute_force_has_twins, CollisionResolver};
