//! # Uncollide
//!
//! Collision resolution for 2D and 3D node layouts, such as the output of a
//! force-directed graph drawing.
//!
//! ## Features
//!
//! - **Loose Quad-Tree / Oct-Tree**: One arena-backed index for both dimensions
//! - **Twin Nudging**: Pushes near-coincident nodes apart, with random
//!   perturbation for exact overlaps
//! - **Bounded Expansion**: Spreads the layout until nothing collides
//! - **Cooperative Cancellation**: Safe to drive from a background worker
//!
//! ## Quick Start
//!
//! ```rust
//! use uncollide::prelude::*;
//!
//! let mut store = MemoryNodeStore::new(Dimension::TwoD)
//!     .with_node(Coordinates::new(0.0, 0.0, 0.0), 1.0)
//!     .with_node(Coordinates::new(0.0, 0.0, 0.0), 1.0);
//!
//! let report = resolve_collisions(
//!     &mut store,
//!     &mut UniformExpansion::default(),
//!     Dimension::TwoD,
//!     2000,
//!     true,
//!     &mut NullProgress,
//!     &CancellationToken::new(),
//! )?;
//!
//! assert!(!report.collisions_remaining);
//! # Ok::<(), UncollideError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod spatial;
pub mod physics;
pub mod graph;
pub mod uncollide;

pub use crate::uncollide::{resolve_collisions, UncollideError, UncollideReport, Uncollider};

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, TreeConfig, UncollideConfig},
        foundation::math::{Coordinates, Dimension},
        graph::{GraphExpander, MemoryNodeStore, NodeHandle, NodeStore, UniformExpansion},
        physics::CollisionResolver,
        spatial::{BoundingVolume, SpatialError, SpatialTree},
        uncollide::{
            resolve_collisions, CancellationToken, LogProgress, NullProgress, ProgressSink,
            UncollideError, UncollideReport, Uncollider,
        },
    };
}
