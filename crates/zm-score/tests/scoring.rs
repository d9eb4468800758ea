//! Scores, solutions and placement over grown mazes.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use zm_core::{Position, Tolerances, ZoneId, nearly_equal};
use zm_graph::GridBuilder;
use zm_score::{
    Amount, Region, Scope, ScoreEngine, ScoreError, ScoreKind, SolutionBuilder, SpreadLocations,
    doors_in, doors_out,
};
use zm_zones::{FormulaConstraints, FormulaParams, ZoneGrower, ZoneSpec, ZoneTable, ZonedMaze};

fn example_maze(seed: u64) -> ZonedMaze {
    let table = ZoneTable::from_specs([
        ZoneSpec::new(1, 1).doors_out(2),
        ZoneSpec::new(4, 2).doors_out(2),
        ZoneSpec::new(4, 1).doors_out(0),
    ])
    .unwrap();
    let grid = GridBuilder::new(12, 12).build().unwrap();
    ZoneGrower::default()
        .generate(
            grid,
            Position::new(0, 0),
            &table,
            &mut ChaCha8Rng::seed_from_u64(seed),
        )
        .unwrap()
}

fn formula_maze(seed: u64) -> ZonedMaze {
    let constraints = FormulaConstraints::new(FormulaParams::default()).unwrap();
    let grid = GridBuilder::new(30, 30).build().unwrap();
    ZoneGrower::default()
        .generate(
            grid,
            Position::new(15, 15),
            &constraints,
            &mut ChaCha8Rng::seed_from_u64(seed),
        )
        .unwrap()
}

fn zone(index: u32) -> ZoneId {
    ZoneId::from_index(index)
}

#[test]
fn scores_stay_in_unit_range() {
    let maze = formula_maze(4);
    let scores = ScoreEngine::compute_scores(&maze);
    assert_eq!(scores.len(), maze.node_count());
    for s in scores.iter() {
        for v in [s.dead_end_score, s.entry_distance_score, s.exit_distance_score] {
            assert!((0.0..=1.0).contains(&v), "{s:?}");
        }
        assert_eq!(s.solution_traversal_count, 0);
    }
}

#[test]
fn dead_end_tracks_out_degree() {
    let maze = formula_maze(9);
    let graph = maze.graph();
    let max_out = graph.max_out_degree();
    let scores = ScoreEngine::compute_scores(&maze);
    for node in graph.nodes() {
        let s = scores.get(node.id).unwrap();
        if node.out_degree() == 1 {
            assert_eq!(s.dead_end_score, 1.0);
        }
        if node.out_degree() == max_out {
            assert_eq!(s.dead_end_score, 0.0);
        }
    }
}

#[test]
fn single_node_maze_scores_all_ones() {
    let table = ZoneTable::from_specs([ZoneSpec::new(1, 1)]).unwrap();
    let grid = GridBuilder::new(3, 3).build().unwrap();
    let maze = ZoneGrower::default()
        .generate(
            grid,
            Position::new(1, 1),
            &table,
            &mut ChaCha8Rng::seed_from_u64(0),
        )
        .unwrap();
    let scores = ScoreEngine::compute_scores(&maze);
    let s = scores.get(maze.start().unwrap()).unwrap();
    assert_eq!(s.dead_end_score, 1.0);
    assert_eq!(s.entry_distance_score, 1.0);
    assert_eq!(s.exit_distance_score, 1.0);
}

#[test]
fn door_nodes_score_zero() {
    let maze = formula_maze(21);
    let graph = maze.graph();
    let scores = ScoreEngine::compute_scores(&maze);

    for (z, part) in maze.parts() {
        let entries = doors_in(graph, z, part);
        let exits = doors_out(graph, z, part);
        for &id in part.nodes() {
            let s = scores.get(id).unwrap();
            if entries.is_empty() {
                assert_eq!(s.entry_distance_score, 1.0);
            } else {
                assert_eq!(s.entry_distance_score == 0.0, entries.contains(&id));
            }
            if exits.is_empty() {
                assert_eq!(s.exit_distance_score, 1.0);
            } else {
                assert_eq!(s.exit_distance_score == 0.0, exits.contains(&id));
            }
        }
        for &id in &exits {
            assert!(scores.get(id).unwrap().belongs_to_entry_path || entries.is_empty());
        }
        for &id in &entries {
            assert!(scores.get(id).unwrap().belongs_to_exit_path || exits.is_empty());
        }
    }
}

#[test]
fn zone_zero_has_no_entry_doors() {
    let maze = example_maze(3);
    let scores = ScoreEngine::compute_scores(&maze);
    let root = maze.start().unwrap();
    let s = scores.get(root).unwrap();
    assert_eq!(s.entry_distance_score, 1.0);
    // The root opens both parts of zone 1.
    assert_eq!(s.exit_distance_score, 0.0);
}

#[test]
fn solution_visits_every_zone_in_order() {
    let maze = formula_maze(13);
    let mut scores = ScoreEngine::compute_scores(&maze);
    let solution = SolutionBuilder::new(&maze)
        .build(&mut scores, |s| ScoreKind::DeadEnd.value(s))
        .unwrap();

    let zones: Vec<ZoneId> = solution.stops.iter().map(|s| s.zone).collect();
    let expected: Vec<ZoneId> = maze.zones().iter().map(|z| z.id).collect();
    assert_eq!(zones, expected);
    assert_eq!(solution.path.first().copied(), maze.start());
    assert_eq!(solution.path.last(), solution.stops.last().map(|s| &s.node));

    let graph = maze.graph();
    for pair in solution.path.windows(2) {
        assert!(graph.out_edges(pair[0]).contains(&pair[1]));
    }

    assert!(solution.redundancy > 0.0 && solution.redundancy <= 1.0);
    assert!((0.0..=1.0).contains(&solution.concentration_index));
    assert!(solution.detour_ratio >= 1.0);
    let total: f64 = solution.visit_distribution.values().sum();
    assert!(nearly_equal(total, 1.0, Tolerances::default()));

    let traversals: usize = scores.iter().map(|s| s.solution_traversal_count).sum();
    assert_eq!(traversals, solution.path.len());
    let revisits = scores.iter().any(|s| s.solution_traversal_count > 1);
    assert_eq!(solution.redundancy == 1.0, !revisits);
}

#[test]
fn visit_order_is_coerced_to_start_at_zone_zero() {
    let maze = example_maze(5);
    let mut scores = ScoreEngine::compute_scores(&maze);
    let solution = SolutionBuilder::new(&maze)
        .visit_order([zone(1), zone(2)])
        .build(&mut scores, |s| ScoreKind::Exit.value(s))
        .unwrap();
    let zones: Vec<ZoneId> = solution.stops.iter().map(|s| s.zone).collect();
    assert_eq!(zones, vec![zone(0), zone(1), zone(2)]);
}

#[test]
fn skipping_a_key_zone_fails() {
    // Zone 0 spends both doors on zone 1, so zone 2 is only reachable
    // through zone 1.
    let maze = example_maze(7);
    let mut scores = ScoreEngine::compute_scores(&maze);
    let err = SolutionBuilder::new(&maze)
        .visit_order([zone(0), zone(2), zone(1)])
        .build(&mut scores, |s| s.dead_end_score)
        .unwrap_err();
    assert!(
        matches!(err, ScoreError::PathNotFound { zone: z, .. } if z == zone(2)),
        "{err:?}"
    );
}

#[test]
fn rebuilding_resets_traversal_counts() {
    let maze = example_maze(11);
    let mut scores = ScoreEngine::compute_scores(&maze);
    let builder = SolutionBuilder::new(&maze);
    let first = builder.build(&mut scores, |s| s.dead_end_score).unwrap();
    let second = builder.build(&mut scores, |s| s.dead_end_score).unwrap();
    assert_eq!(first, second);
    let traversals: usize = scores.iter().map(|s| s.solution_traversal_count).sum();
    assert_eq!(traversals, second.path.len());
}

#[test]
fn spread_on_last_zone_of_worked_example() {
    for seed in 0..10 {
        let maze = example_maze(seed);
        let scores = ScoreEngine::compute_scores(&maze);
        let candidates: Vec<_> = maze.zone(zone(2)).unwrap().nodes().collect();
        let mut spread = SpreadLocations::new(&maze, &scores);
        let result = spread
            .spread(&candidates, 2, |s| ScoreKind::Combined.value(s))
            .unwrap();

        assert_eq!(result.nodes.len(), 2);
        assert!(result.min_distance >= 1);
        let d = maze
            .graph()
            .graph_distance(result.nodes[0], result.nodes[1])
            .unwrap();
        assert!(d >= result.min_distance);
    }
}

#[test]
fn spread_edge_cases() {
    let maze = example_maze(1);
    let scores = ScoreEngine::compute_scores(&maze);
    let mut spread = SpreadLocations::new(&maze, &scores);

    let empty = spread.spread(&[], 3, |s| s.dead_end_score).unwrap();
    assert!(empty.nodes.is_empty());
    let none = spread.spread_global(0, |s| s.dead_end_score).unwrap();
    assert!(none.nodes.is_empty());

    // Asking for more than exists returns every node at distance 1.
    let all = spread.spread_global(50, |s| s.dead_end_score).unwrap();
    assert_eq!(all.nodes.len(), maze.node_count());
    assert_eq!(all.min_distance, 1);
}

#[test]
fn scoped_spreads_cover_each_region() {
    let maze = formula_maze(17);
    let scores = ScoreEngine::compute_scores(&maze);
    let mut spread = SpreadLocations::new(&maze, &scores);

    let per_zone = spread
        .place(Scope::PerZone, Amount::Count(10), |s| s.exit_distance_score)
        .unwrap();
    assert_eq!(per_zone.len(), maze.zones().len());
    for entry in &per_zone {
        let Region::Zone(z) = entry.region else {
            panic!("unexpected region {:?}", entry.region);
        };
        assert!(!entry.result.nodes.is_empty());
        for &id in &entry.result.nodes {
            assert_eq!(maze.node(id).unwrap().zone, z);
        }
    }

    let per_part = spread
        .place(Scope::PerPart, Amount::Ratio(0.2), |s| s.entry_distance_score)
        .unwrap();
    assert_eq!(per_part.len(), maze.parts().count());
    for entry in &per_part {
        let Region::Part(z, p) = entry.region else {
            panic!("unexpected region {:?}", entry.region);
        };
        let part = maze.zone(z).unwrap().part(p).unwrap();
        let expected = ((0.2 * part.len() as f64).round() as usize).max(1);
        assert!(entry.result.nodes.len() <= expected);
        assert!(entry.result.nodes.iter().all(|&id| part.contains(id)));
    }

    let global = spread
        .place(Scope::Global, Amount::Ratio(0.1), |s| s.dead_end_score)
        .unwrap();
    assert_eq!(global.len(), 1);
    assert_eq!(global[0].region, Region::Maze);
    assert_eq!(global[0].result.nodes.len(), 9);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn spread_keeps_its_distance(seed in 0_u64..500, desired in 1_usize..20) {
        let maze = formula_maze(seed);
        let scores = ScoreEngine::compute_scores(&maze);
        let mut spread = SpreadLocations::new(&maze, &scores);
        let result = spread.spread_global(desired, |s| ScoreKind::Combined.value(s)).unwrap();

        prop_assert!(result.nodes.len() <= desired);
        let graph = maze.graph();
        for (i, &a) in result.nodes.iter().enumerate() {
            for &b in &result.nodes[i + 1..] {
                let d = graph.graph_distance(a, b).unwrap();
                prop_assert!(d >= result.min_distance);
            }
        }
    }

    #[test]
    fn solution_metrics_stay_in_range(seed in 0_u64..500) {
        let maze = formula_maze(seed);
        let mut scores = ScoreEngine::compute_scores(&maze);
        let solution = SolutionBuilder::new(&maze)
            .build(&mut scores, |s| ScoreKind::Combined.value(s))
            .unwrap();
        prop_assert!(solution.redundancy > 0.0 && solution.redundancy <= 1.0);
        prop_assert!((0.0..=1.0).contains(&solution.concentration_index));
        prop_assert!(solution.detour_ratio >= 1.0);
    }
}
