//! Collision resolution run
//!
//! The run alternates two stages. First it nudges twins (nodes sitting on
//! top of each other) apart, rebuilding the tree after every pass, until a
//! whole pass finds none. Then it expands the layout one step at a time
//! until the tree reports no collision or the expansion limit runs out.

mod cancel;
mod orchestrator;
mod progress;

#[cfg(test)]
mod tests;

pub use cancel::CancellationToken;
pub use orchestrator::{NudgePass, Stage, UncollideReport, Uncollider, NUDGE_PADDING};
pub use progress::{LogProgress, NullProgress, ProgressSink};

use crate::config::{ConfigError, UncollideConfig};
use crate::foundation::math::Dimension;
use crate::graph::{GraphExpander, NodeStore};
use crate::spatial::SpatialError;
use thiserror::Error;

/// Collision resolution errors
#[derive(Error, Debug)]
pub enum UncollideError {
    /// Bounds were requested over an empty node set
    #[error("Spatial error: {0}")]
    Spatial(#[from] SpatialError),

    /// The store cannot supply the requested axes
    #[error("{requested:?} requested but the node store only has {available} axes")]
    InvalidDimensionConfiguration {
        /// Requested dimension
        requested: Dimension,
        /// Axes the store provides
        available: usize,
    },

    /// Cancellation was observed
    #[error("Collision resolution interrupted")]
    Interrupted,

    /// Run parameters are out of range
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Resolve collisions with default limits
///
/// Convenience wrapper around [`Uncollider`] seeded from system entropy.
pub fn resolve_collisions<S, E, P>(
    store: &mut S,
    expander: &mut E,
    dimension: Dimension,
    max_expansions: u32,
    maintain_centroid: bool,
    progress: &mut P,
    cancel: &CancellationToken,
) -> Result<UncollideReport, UncollideError>
where
    S: NodeStore,
    E: GraphExpander + ?Sized,
    P: ProgressSink + ?Sized,
{
    let config = UncollideConfig::new(dimension)
        .with_max_expansions(max_expansions)
        .with_maintain_centroid(maintain_centroid);

    Uncollider::new(config)?.run(store, expander, progress, cancel)
}
