//! Twin nudging and expansion loop

use super::{CancellationToken, ProgressSink, UncollideError};
use crate::config::UncollideConfig;
use crate::foundation::math::{Coordinates, Dimension};
use crate::graph::{self, GraphExpander, NodeHandle, NodeStore};
use crate::physics::CollisionResolver;
use crate::spatial::{SpatialError, SpatialTree};
use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Relative padding added to the separation a nudge targets, so the pair
/// lands just outside the twin threshold rather than on it.
pub const NUDGE_PADDING: f32 = 1.0e-3;

/// Stage of a resolution run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Pushing near-coincident pairs apart
    NudgingTwins,
    /// Spreading the whole layout until nothing collides
    ExpandingGraph,
    /// Finished
    Done,
}

impl Stage {
    /// Progress message for this stage
    pub const fn message(self) -> &'static str {
        match self {
            Self::NudgingTwins => "Nudging twins",
            Self::ExpandingGraph => "Expanding graph",
            Self::Done => "Done",
        }
    }
}

/// Outcome of a single nudge pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NudgePass {
    /// Nodes that reported no twin
    pub nodes_without_twins: usize,
    /// Pairs moved apart
    pub nudges: usize,
}

/// Summary of a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UncollideReport {
    /// Nudge passes performed, including the final clean one
    pub nudge_passes: u32,
    /// Pairs moved apart across all passes
    pub nudges: usize,
    /// Expansion steps applied
    pub expansions: u32,
    /// Collisions were still present when the expansion limit ran out
    pub collisions_remaining: bool,
}

/// Resolves collisions in a node layout
///
/// Holds the run configuration and the random source used to separate
/// coincident nodes.
#[derive(Debug, Clone)]
pub struct Uncollider<R = StdRng> {
    config: UncollideConfig,
    rng: R,
}

impl Uncollider<StdRng> {
    /// Create a resolver seeded from system entropy
    pub fn new(config: UncollideConfig) -> Result<Self, UncollideError> {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> Uncollider<R> {
    /// Create a resolver with an explicit random source
    pub fn with_rng(config: UncollideConfig, rng: R) -> Result<Self, UncollideError> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    /// Get the run configuration
    pub const fn config(&self) -> &UncollideConfig {
        &self.config
    }

    /// Run to completion
    ///
    /// Nudges twins apart until a full pass finds none, then expands the
    /// layout until the tree reports no collision or the expansion limit is
    /// reached. Running out of expansions is not an error. On cancellation
    /// the store keeps every nudge and expansion completed so far.
    pub fn run<S, E, P>(
        &mut self,
        store: &mut S,
        expander: &mut E,
        progress: &mut P,
        cancel: &CancellationToken,
    ) -> Result<UncollideReport, UncollideError>
    where
        S: NodeStore,
        E: GraphExpander + ?Sized,
        P: ProgressSink + ?Sized,
    {
        let dimension = self.config.dimension;
        let mut report = UncollideReport::default();

        let total = store.count();
        if total == 0 {
            debug!("No nodes to uncollide");
            return Ok(report);
        }

        if store.axis_count() < dimension.axis_count() {
            return Err(UncollideError::InvalidDimensionConfiguration {
                requested: dimension,
                available: store.axis_count(),
            });
        }

        info!("Uncolliding {total} nodes in {dimension:?}");
        let centroid = self.config.maintain_centroid.then(|| graph::mean_position(&*store));

        self.nudge_twins(store, progress, cancel, &mut report)?;
        self.expand_until_clear(store, expander, progress, cancel, &mut report)?;

        if let Some(mean) = centroid {
            graph::move_mean(store, &mean);
        }

        progress.report(total, total, Stage::Done.message());
        info!(
            "Uncollide finished: {} nudges over {} passes, {} expansions",
            report.nudges, report.nudge_passes, report.expansions
        );

        Ok(report)
    }

    /// Rebuild the tree and nudge twins until a whole pass finds none
    fn nudge_twins<S, P>(
        &mut self,
        store: &mut S,
        progress: &mut P,
        cancel: &CancellationToken,
        report: &mut UncollideReport,
    ) -> Result<(), UncollideError>
    where
        S: NodeStore,
        P: ProgressSink + ?Sized,
    {
        let total = store.count();

        for _ in 0..self.config.max_nudge_passes {
            if cancel.is_cancelled() {
                return Err(UncollideError::Interrupted);
            }

            let pass = self.nudge_pass(store)?;
            report.nudge_passes += 1;
            report.nudges += pass.nudges;

            progress.report(pass.nodes_without_twins, total, Stage::NudgingTwins.message());
            debug!(
                "Nudge pass {}: {}/{} nodes without twins, {} nudges",
                report.nudge_passes, pass.nodes_without_twins, total, pass.nudges
            );

            if pass.nodes_without_twins == total {
                return Ok(());
            }
        }

        warn!(
            "Twins remain after {} nudge passes, continuing with expansion",
            self.config.max_nudge_passes
        );
        Ok(())
    }

    /// One nudge pass over a fresh tree
    ///
    /// Each visited node with twins is pushed apart from its first-listed
    /// twin only.
    pub fn nudge_pass<S: NodeStore>(&mut self, store: &mut S) -> Result<NudgePass, SpatialError> {
        let tree = SpatialTree::build(&*store, self.config.dimension, &self.config.tree)?;
        let resolver = CollisionResolver::new(&tree);

        let mut pass = NudgePass::default();
        for handle in NodeHandle::all(tree.handle_count()) {
            match resolver.twins(handle, self.config.twin_scaling).first() {
                None => pass.nodes_without_twins += 1,
                Some(&twin) => {
                    if self.nudge_pair(store, handle, twin) {
                        pass.nudges += 1;
                    }
                }
            }
        }

        Ok(pass)
    }

    /// Push two twins apart along each axis
    ///
    /// Positions are read live, so a pair already separated earlier in the
    /// pass is left alone. Returns whether anything moved.
    fn nudge_pair<S: NodeStore>(&mut self, store: &mut S, a: NodeHandle, b: NodeHandle) -> bool {
        let dimension = self.config.dimension;
        let position_a = store.position(a);
        let position_b = store.position(b);

        let twin_distance = dimension.collision_distance(store.radius(a), store.radius(b))
            * self.config.twin_scaling;
        let delta = dimension.delta(&position_a, &position_b);
        let required = twin_distance.mul_add(1.0 + NUDGE_PADDING, -delta);
        if required <= 0.0 {
            return false;
        }

        let direction = if delta > 0.0 {
            Self::separating_direction(dimension, &position_a, &position_b)
        } else {
            self.random_direction(dimension)
        };

        let active_axes = dimension.axes().filter(|&axis| direction[axis] != 0.0).count();
        let step = required / 2.0 / Dimension::diagonal_divisor(active_axes);

        store.set_position(a, position_a - direction * step);
        store.set_position(b, position_b + direction * step);

        trace!("Nudged {a:?} and {b:?} apart by {required} (delta was {delta})");
        true
    }

    /// Per-axis sign of `b - a`, zero where the axes agree
    fn separating_direction(dimension: Dimension, a: &Coordinates, b: &Coordinates) -> Coordinates {
        let mut direction = Coordinates::zeros();
        for axis in dimension.axes() {
            let d = b[axis] - a[axis];
            if d != 0.0 {
                direction[axis] = d.signum();
            }
        }
        direction
    }

    /// Random sign on every active axis, for coincident pairs
    fn random_direction(&mut self, dimension: Dimension) -> Coordinates {
        let mut direction = Coordinates::zeros();
        for axis in dimension.axes() {
            direction[axis] = if self.rng.gen::<bool>() { 1.0 } else { -1.0 };
        }
        direction
    }

    /// Expand the layout until the tree reports no collision
    fn expand_until_clear<S, E, P>(
        &mut self,
        store: &mut S,
        expander: &mut E,
        progress: &mut P,
        cancel: &CancellationToken,
        report: &mut UncollideReport,
    ) -> Result<(), UncollideError>
    where
        S: NodeStore,
        E: GraphExpander + ?Sized,
        P: ProgressSink + ?Sized,
    {
        let limit = self.config.max_expansions;

        loop {
            if cancel.is_cancelled() {
                return Err(UncollideError::Interrupted);
            }

            let tree = SpatialTree::build(&*store, self.config.dimension, &self.config.tree)?;
            if !CollisionResolver::new(&tree).has_collision() {
                report.collisions_remaining = false;
                return Ok(());
            }

            if report.expansions >= limit {
                warn!("Collisions remain after {limit} expansions");
                report.collisions_remaining = true;
                return Ok(());
            }

            progress.report(
                report.expansions as usize,
                limit as usize,
                Stage::ExpandingGraph.message(),
            );
            expander.expand(store);
            report.expansions += 1;
            trace!("Expansion {}/{}", report.expansions, limit);
        }
    }
}
