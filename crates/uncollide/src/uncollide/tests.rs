//! Scenario tests for full resolution runs

use super::*;
use crate::config::{default_twin_scaling, UncollideConfig};
use crate::foundation::logging;
use crate::foundation::math::Coordinates;
use crate::graph::{mean_position, MemoryNodeStore, NodeHandle, UniformExpansion};
use crate::physics::{brute_force_has_collision, brute_force_has_twins};
use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn seeded(config: UncollideConfig, seed: u64) -> Uncollider<StdRng> {
    Uncollider::with_rng(config, StdRng::seed_from_u64(seed)).unwrap()
}

fn run_to_completion(
    config: UncollideConfig,
    seed: u64,
    store: &mut MemoryNodeStore,
) -> UncollideReport {
    let mut expander = UniformExpansion::from_config(&config);
    seeded(config, seed)
        .run(store, &mut expander, &mut NullProgress, &CancellationToken::new())
        .unwrap()
}

fn cluster(
    dimension: Dimension,
    count: usize,
    center: Coordinates,
    spread: f32,
    radius: f32,
    seed: u64,
) -> MemoryNodeStore {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut store = MemoryNodeStore::new(dimension);
    for _ in 0..count {
        let offset = Coordinates::new(
            rng.gen_range(-spread..spread),
            rng.gen_range(-spread..spread),
            rng.gen_range(-spread..spread),
        );
        store.push(center + offset, radius);
    }
    store
}

#[test]
fn test_empty_store_returns_immediately() {
    let mut store = MemoryNodeStore::new(Dimension::TwoD);
    let mut updates = 0;
    let mut sink = |_: usize, _: usize, _: &str| updates += 1;

    let report = seeded(UncollideConfig::default(), 1)
        .run(&mut store, &mut UniformExpansion::default(), &mut sink, &CancellationToken::new())
        .unwrap();

    assert_eq!(report, UncollideReport::default());
    assert_eq!(updates, 0);
}

#[test]
fn test_three_d_on_planar_store_is_rejected() {
    let mut store = MemoryNodeStore::new(Dimension::TwoD).with_node(Coordinates::zeros(), 1.0);
    let result = seeded(UncollideConfig::new(Dimension::ThreeD), 1).run(
        &mut store,
        &mut UniformExpansion::default(),
        &mut NullProgress,
        &CancellationToken::new(),
    );

    assert!(matches!(
        result,
        Err(UncollideError::InvalidDimensionConfiguration {
            requested: Dimension::ThreeD,
            available: 2
        })
    ));
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = UncollideConfig::default().with_twin_scaling(2.0);
    assert!(matches!(Uncollider::new(config), Err(UncollideError::Config(_))));
}

#[test]
fn test_coincident_pair_is_separated_in_one_pass() {
    logging::init_for_tests();

    let mut store = MemoryNodeStore::new(Dimension::TwoD)
        .with_node(Coordinates::zeros(), 1.0)
        .with_node(Coordinates::zeros(), 1.0);
    let mut uncollider = seeded(UncollideConfig::default(), 7);

    let pass = uncollider.nudge_pass(&mut store).unwrap();
    assert_eq!(pass.nodes_without_twins, 0);
    assert!(pass.nudges >= 1);

    let (a, b) = (store.position(NodeHandle::new(0)), store.position(NodeHandle::new(1)));
    let delta = Dimension::TwoD.delta(&a, &b);
    let twin_distance = Dimension::TwoD.collision_distance(1.0, 1.0) * default_twin_scaling();
    assert!(delta >= twin_distance, "delta {delta} < {twin_distance}");
    assert_ne!(a, Coordinates::zeros());
    assert_ne!(b, Coordinates::zeros());

    // Symmetric push keeps the pair centred
    assert_abs_diff_eq!(a + b, Coordinates::zeros(), epsilon = 1e-5);
}

#[test]
fn test_coincident_pair_in_three_d() {
    let mut store = MemoryNodeStore::new(Dimension::ThreeD)
        .with_node(Coordinates::new(1.0, 2.0, 3.0), 0.5)
        .with_node(Coordinates::new(1.0, 2.0, 3.0), 0.5);
    let config = UncollideConfig::new(Dimension::ThreeD).with_max_expansions(0);

    run_to_completion(config, 3, &mut store);

    let (a, b) = (store.position(NodeHandle::new(0)), store.position(NodeHandle::new(1)));
    assert!((a - b).iter().all(|d| *d != 0.0));
    assert!(!brute_force_has_twins(&store, Dimension::ThreeD, default_twin_scaling()));
}

#[test]
fn test_collinear_nodes_lose_their_twins() {
    let mut store = MemoryNodeStore::new(Dimension::TwoD)
        .with_node(Coordinates::new(0.0, 0.0, 0.0), 0.5)
        .with_node(Coordinates::new(0.01, 0.0, 0.0), 0.5)
        .with_node(Coordinates::new(0.02, 0.0, 0.0), 0.5);
    let config = UncollideConfig::default().with_max_expansions(0);

    let report = run_to_completion(config, 11, &mut store);

    assert!(report.nudges > 0);
    assert!(!brute_force_has_twins(&store, Dimension::TwoD, 1.1_f32.powi(-20)));
    // Only x differed, so nothing moved off the line
    assert!(store.positions().iter().all(|p| p.y == 0.0));
    // Still colliding, and the zero expansion budget is not an error
    assert!(report.collisions_remaining);
    assert_eq!(report.expansions, 0);
}

#[test]
fn test_stable_layout_is_untouched() {
    let mut store = MemoryNodeStore::new(Dimension::TwoD);
    for i in 0..10 {
        for j in 0..10 {
            store.push(Coordinates::new(i as f32 * 5.0, j as f32 * 5.0, 0.0), 1.0);
        }
    }
    let before = store.positions().to_vec();

    let report = run_to_completion(UncollideConfig::default(), 5, &mut store);

    assert_eq!(report.nudges, 0);
    assert_eq!(report.expansions, 0);
    assert_eq!(report.nudge_passes, 1);
    assert!(!report.collisions_remaining);
    assert_eq!(store.positions(), before.as_slice());
}

#[test]
fn test_dense_cluster_is_fully_resolved() {
    for (seed, dimension) in [(21, Dimension::TwoD), (22, Dimension::ThreeD)] {
        let mut store = cluster(dimension, 100, Coordinates::zeros(), 1.0, 0.5, seed);
        assert!(brute_force_has_collision(&store, dimension));

        let report = run_to_completion(UncollideConfig::new(dimension), seed, &mut store);

        assert!(report.expansions > 0);
        assert!(!report.collisions_remaining);
        assert!(!brute_force_has_collision(&store, dimension));
    }
}

#[test]
fn test_centroid_is_preserved() {
    let center = Coordinates::new(5.0, -3.0, 0.0);
    let mut store = cluster(Dimension::TwoD, 30, center, 2.0, 0.5, 31);
    let before = mean_position(&store);
    let positions_before = store.positions().to_vec();

    let config = UncollideConfig::default().with_maintain_centroid(true);
    let report = run_to_completion(config, 31, &mut store);

    assert!(report.expansions > 0);
    assert_ne!(store.positions(), positions_before.as_slice());
    assert_abs_diff_eq!(mean_position(&store), before, epsilon = 1e-4);
}

#[test]
fn test_all_coincident_nodes_terminate() {
    for dimension in [Dimension::TwoD, Dimension::ThreeD] {
        let mut store = MemoryNodeStore::new(dimension);
        for _ in 0..40 {
            store.push(Coordinates::new(1.0, 1.0, 1.0), 1.0);
        }

        let report = run_to_completion(UncollideConfig::new(dimension), 40, &mut store);

        assert!(report.expansions <= 2000);
        assert!(report.nudge_passes <= UncollideConfig::default().max_nudge_passes);
        assert!(store.positions().iter().all(|p| p.iter().all(|c| c.is_finite())));
    }
}

#[test]
fn test_expansion_limit_is_not_an_error() {
    let mut store = MemoryNodeStore::new(Dimension::TwoD)
        .with_node(Coordinates::new(1.0, 0.0, 0.0), 1.0)
        .with_node(Coordinates::new(2.0, 0.0, 0.0), 1.0);
    let mut expansions_seen = 0;
    let mut stuck = |_: &mut dyn NodeStore| expansions_seen += 1;

    let config = UncollideConfig::default().with_max_expansions(5);
    let report = seeded(config, 2)
        .run(&mut store, &mut stuck, &mut NullProgress, &CancellationToken::new())
        .unwrap();

    assert_eq!(report.expansions, 5);
    assert!(report.collisions_remaining);
    assert_eq!(expansions_seen, 5);
}

#[test]
fn test_cancelled_before_start_leaves_positions() {
    let mut store = MemoryNodeStore::new(Dimension::TwoD)
        .with_node(Coordinates::zeros(), 1.0)
        .with_node(Coordinates::zeros(), 1.0);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = seeded(UncollideConfig::default(), 9).run(
        &mut store,
        &mut UniformExpansion::default(),
        &mut NullProgress,
        &cancel,
    );

    assert!(matches!(result, Err(UncollideError::Interrupted)));
    assert!(store.positions().iter().all(|p| *p == Coordinates::zeros()));
}

#[test]
fn test_cancelled_during_expansion_keeps_completed_step() {
    let mut store = MemoryNodeStore::new(Dimension::TwoD)
        .with_node(Coordinates::new(1.0, 0.0, 0.0), 1.0)
        .with_node(Coordinates::new(2.0, 0.0, 0.0), 1.0);
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let mut expander = move |store: &mut dyn NodeStore| {
        UniformExpansion::default().expand(store);
        trigger.cancel();
    };

    let mut uncollider = seeded(UncollideConfig::default(), 4);
    let result = uncollider.run(&mut store, &mut expander, &mut NullProgress, &cancel);

    assert!(matches!(result, Err(UncollideError::Interrupted)));
    assert_abs_diff_eq!(store.positions()[0], Coordinates::new(1.1, 0.0, 0.0), epsilon = 1e-6);
    assert_abs_diff_eq!(store.positions()[1], Coordinates::new(2.2, 0.0, 0.0), epsilon = 1e-6);
}

#[test]
fn test_progress_reports_each_stage() {
    let mut store = MemoryNodeStore::new(Dimension::TwoD)
        .with_node(Coordinates::zeros(), 1.0)
        .with_node(Coordinates::zeros(), 1.0)
        .with_node(Coordinates::new(10.0, 10.0, 0.0), 1.0);
    let mut updates: Vec<(usize, usize, String)> = Vec::new();
    let mut sink = |completed: usize, total: usize, message: &str| {
        updates.push((completed, total, message.to_string()));
    };

    seeded(UncollideConfig::default(), 8)
        .run(&mut store, &mut UniformExpansion::default(), &mut sink, &CancellationToken::new())
        .unwrap();

    let first = updates.first().unwrap();
    assert_eq!(first.2, Stage::NudgingTwins.message());
    assert_eq!((first.0, first.1), (1, 3));

    assert!(updates.iter().any(|u| u.0 == 3 && u.2 == Stage::NudgingTwins.message()));
    assert!(updates.iter().any(|u| u.2 == Stage::ExpandingGraph.message() && u.1 == 2000));
    assert_eq!(updates.last().unwrap(), &(3, 3, Stage::Done.message().to_string()));
}

#[test]
fn test_configured_expansion_factor_drives_expansion() {
    let pair = || {
        MemoryNodeStore::new(Dimension::TwoD)
            .with_node(Coordinates::new(-1.0, 0.0, 0.0), 1.0)
            .with_node(Coordinates::new(1.0, 0.0, 0.0), 1.0)
    };

    let mut gentle = pair();
    let gentle_report = run_to_completion(UncollideConfig::default(), 12, &mut gentle);

    let mut strong = pair();
    let config = UncollideConfig::default().with_expansion_factor(3.0);
    let strong_report = run_to_completion(config, 12, &mut strong);

    // 2 * 3 clears 2 * sqrt(2) in one step, 1.1 needs four
    assert_eq!(strong_report.expansions, 1);
    assert_eq!(gentle_report.expansions, 4);
    assert!(!strong_report.collisions_remaining);
    assert_abs_diff_eq!(strong.positions()[1], Coordinates::new(3.0, 0.0, 0.0), epsilon = 1e-6);
}

#[test]
fn test_nudge_pass_limit_hands_over_to_expansion() {
    let mut store = cluster(Dimension::TwoD, 50, Coordinates::zeros(), 0.001, 0.5, 61);
    assert!(brute_force_has_twins(&store, Dimension::TwoD, default_twin_scaling()));

    let config = UncollideConfig::default().with_max_nudge_passes(1);
    let report = run_to_completion(config, 61, &mut store);

    assert_eq!(report.nudge_passes, 1);
    assert!(report.nudges > 0);
    assert!(report.expansions > 0);
    assert!(!report.collisions_remaining);
    assert!(!brute_force_has_collision(&store, Dimension::TwoD));
}

#[test]
fn test_zero_nudge_passes_skips_nudging() {
    let mut store = cluster(Dimension::ThreeD, 30, Coordinates::zeros(), 0.001, 0.5, 62);

    let config = UncollideConfig::new(Dimension::ThreeD).with_max_nudge_passes(0);
    let report = run_to_completion(config, 62, &mut store);

    assert_eq!(report.nudge_passes, 0);
    assert_eq!(report.nudges, 0);
    assert!(report.expansions > 0);
    assert!(!report.collisions_remaining);
    assert!(!brute_force_has_collision(&store, Dimension::ThreeD));
}

#[test]
fn test_same_seed_same_layout() {
    let run = || {
        let mut store = cluster(Dimension::TwoD, 20, Coordinates::zeros(), 0.01, 1.0, 50);
        seeded(UncollideConfig::default(), 99)
            .run(
                &mut store,
                &mut UniformExpansion::default(),
                &mut LogProgress,
                &CancellationToken::new(),
            )
            .unwrap();
        store.positions().to_vec()
    };

    assert_eq!(run(), run());
}

#[test]
fn test_resolve_collisions_entry_point() {
    let mut store = MemoryNodeStore::new(Dimension::ThreeD)
        .with_node(Coordinates::new(0.0, 0.0, 0.0), 1.0)
        .with_node(Coordinates::new(0.1, 0.0, 0.0), 1.0)
        .with_node(Coordinates::new(0.0, 0.1, 0.1), 2.0);

    let report = resolve_collisions(
        &mut store,
        &mut UniformExpansion::default(),
        Dimension::ThreeD,
        2000,
        true,
        &mut NullProgress,
        &CancellationToken::new(),
    )
    .unwrap();

    assert!(!report.collisions_remaining);
    assert!(!brute_force_has_collision(&store, Dimension::ThreeD));
}
