//! Per-node topology scores.
//!
//! Three scores are derived from a finished maze, all in `[0, 1]`:
//! - dead-end: 1 for leaves, 0 for the best-connected nodes
//! - entry distance: distance to the nearest door into the node's part,
//!   relative to the part size
//! - exit distance: the same towards the nearest door out of the part

use std::collections::BTreeMap;

use tracing::debug;
use zm_core::{NodeId, unit_clamp};
use zm_graph::{DistanceField, GridGraph};
use zm_zones::{Part, Zone, ZonedMaze};

/// Scores of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeScore {
    pub node: NodeId,
    pub dead_end_score: f64,
    pub entry_distance_score: f64,
    pub exit_distance_score: f64,
    /// On a shortest path between a door out of the part and its nearest door in.
    pub belongs_to_entry_path: bool,
    /// On a shortest path between a door into the part and its nearest door out.
    pub belongs_to_exit_path: bool,
    /// Times the last solution path passed through the node.
    pub solution_traversal_count: usize,
}

impl NodeScore {
    fn new(node: NodeId) -> Self {
        Self {
            node,
            dead_end_score: 1.0,
            entry_distance_score: 1.0,
            exit_distance_score: 1.0,
            belongs_to_entry_path: false,
            belongs_to_exit_path: false,
            solution_traversal_count: 0,
        }
    }
}

/// Common score functions, for callers that pick one by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreKind {
    DeadEnd,
    Entry,
    Exit,
    /// Mean of the three scores.
    Combined,
}

impl ScoreKind {
    pub fn value(self, score: &NodeScore) -> f64 {
        match self {
            ScoreKind::DeadEnd => score.dead_end_score,
            ScoreKind::Entry => score.entry_distance_score,
            ScoreKind::Exit => score.exit_distance_score,
            ScoreKind::Combined => {
                (score.dead_end_score + score.entry_distance_score + score.exit_distance_score)
                    / 3.0
            }
        }
    }
}

/// Scores keyed by node id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreMap {
    scores: BTreeMap<NodeId, NodeScore>,
}

impl ScoreMap {
    pub fn get(&self, node: NodeId) -> Option<&NodeScore> {
        self.scores.get(&node)
    }

    pub(crate) fn get_mut(&mut self, node: NodeId) -> Option<&mut NodeScore> {
        self.scores.get_mut(&node)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Scores in ascending node id order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeScore> + '_ {
        self.scores.values()
    }

    pub(crate) fn reset_traversals(&mut self) {
        for score in self.scores.values_mut() {
            score.solution_traversal_count = 0;
        }
    }
}

/// Computes `NodeScore`s from a finished maze.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreEngine;

impl ScoreEngine {
    /// Score every node of `maze` from scratch.
    pub fn compute_scores(maze: &ZonedMaze) -> ScoreMap {
        let graph = maze.graph();
        let mut map = ScoreMap::default();

        let max_out = graph.max_out_degree();
        for node in graph.nodes() {
            let mut score = NodeScore::new(node.id);
            score.dead_end_score = dead_end_score(node.out_degree(), max_out);
            map.scores.insert(node.id, score);
        }

        for (zone, part) in maze.parts() {
            score_part(graph, zone, part, &mut map);
        }
        debug!(nodes = map.len(), max_out, "scores computed");
        map
    }
}

/// `1 - (out - 1) / (max_out - 1)`, or 1 everywhere when no node branches.
pub fn dead_end_score(out_degree: usize, max_out: usize) -> f64 {
    if max_out <= 1 {
        return 1.0;
    }
    let excess = out_degree.saturating_sub(1) as f64;
    unit_clamp(1.0 - excess / (max_out - 1) as f64)
}

/// Part members entered from an earlier zone; the start counts outside zone 0.
pub fn doors_in(graph: &GridGraph, zone: &Zone, part: &Part) -> Vec<NodeId> {
    part.nodes()
        .iter()
        .copied()
        .filter(|&id| {
            (zone.id.index() > 0 && id == part.start)
                || graph
                    .in_edges(id)
                    .iter()
                    .any(|&n| graph.node(n).is_some_and(|m| m.zone < zone.id))
        })
        .collect()
}

/// Part members with an edge into a later zone.
pub fn doors_out(graph: &GridGraph, zone: &Zone, part: &Part) -> Vec<NodeId> {
    part.nodes()
        .iter()
        .copied()
        .filter(|&id| {
            graph
                .out_edges(id)
                .iter()
                .any(|&n| graph.node(n).is_some_and(|m| m.zone > zone.id))
        })
        .collect()
}

fn score_part(graph: &GridGraph, zone: &Zone, part: &Part, map: &mut ScoreMap) {
    let (zone_id, part_id) = (zone.id, part.id);
    let within = |n: &zm_graph::Node| n.zone == zone_id && n.part == part_id;
    let size = part.len().max(1) as f64;

    let entries = doors_in(graph, zone, part);
    let exits = doors_out(graph, zone, part);
    let entry_field = graph.distance_field(&entries, within);
    let exit_field = graph.distance_field(&exits, within);

    for &id in part.nodes() {
        let Some(score) = map.get_mut(id) else {
            continue;
        };
        score.entry_distance_score = distance_score(&entries, &entry_field, id, size);
        score.exit_distance_score = distance_score(&exits, &exit_field, id, size);
    }

    // Doors out walk to their nearest door in, and vice versa.
    for &exit in &exits {
        for id in entry_field.path_to_source(exit) {
            if let Some(score) = map.get_mut(id) {
                score.belongs_to_entry_path = true;
            }
        }
    }
    for &entry in &entries {
        for id in exit_field.path_to_source(entry) {
            if let Some(score) = map.get_mut(id) {
                score.belongs_to_exit_path = true;
            }
        }
    }
}

fn distance_score(doors: &[NodeId], field: &DistanceField, node: NodeId, size: f64) -> f64 {
    if doors.is_empty() {
        return 1.0;
    }
    match field.distance(node) {
        Some(d) => unit_clamp(d as f64 / size),
        None => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zm_core::{Tolerances, nearly_equal};

    #[test]
    fn dead_end_extremes() {
        assert_eq!(dead_end_score(1, 1), 1.0);
        assert_eq!(dead_end_score(0, 0), 1.0);
        assert_eq!(dead_end_score(1, 4), 1.0);
        assert_eq!(dead_end_score(4, 4), 0.0);
        assert!(nearly_equal(dead_end_score(2, 3), 0.5, Tolerances::default()));
    }

    #[test]
    fn isolated_node_counts_as_dead_end() {
        assert_eq!(dead_end_score(0, 3), 1.0);
    }

    #[test]
    fn combined_is_the_mean() {
        let mut score = NodeScore::new(NodeId::from_index(0));
        score.dead_end_score = 1.0;
        score.entry_distance_score = 0.5;
        score.exit_distance_score = 0.0;
        assert!(nearly_equal(
            ScoreKind::Combined.value(&score),
            0.5,
            Tolerances::default()
        ));
        assert_eq!(ScoreKind::Exit.value(&score), 0.0);
    }
}
