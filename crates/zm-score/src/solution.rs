//! Key-gated solution path and its linearity metrics.
//!
//! The solution visits the best location of every zone in a given order.
//! Entering a zone grants its key, and each leg may only cross zones whose
//! keys are already held.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, info};
use zm_core::{NodeId, ZoneId, ratio, unit_clamp};
use zm_zones::ZonedMaze;

use crate::error::{ScoreError, ScoreResult};
use crate::score::{NodeScore, ScoreMap};

/// A zone's chosen waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stop {
    pub zone: ZoneId,
    pub node: NodeId,
}

/// Result of `SolutionBuilder::build`.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionScoring {
    /// Full walk, start included, revisits repeated.
    pub path: Vec<NodeId>,
    pub stops: Vec<Stop>,
    /// Distinct nodes over path length; 1.0 means no node is revisited.
    pub redundancy: f64,
    /// Traversal count -> fraction of all graph nodes traversed that often.
    pub visit_distribution: BTreeMap<usize, f64>,
    /// Gini coefficient of traversal counts over visited nodes.
    pub concentration_index: f64,
    /// Shortest walk from the start to the final stop, ignoring keys.
    pub shortest_path: Vec<NodeId>,
    /// Solution hops over unconstrained hops (1.0 when both are zero).
    pub detour_ratio: f64,
}

/// Builds the key-gated solution path over a scored maze.
#[derive(Debug, Clone)]
pub struct SolutionBuilder<'a> {
    maze: &'a ZonedMaze,
    start: Option<NodeId>,
    order: Option<Vec<ZoneId>>,
}

impl<'a> SolutionBuilder<'a> {
    pub fn new(maze: &'a ZonedMaze) -> Self {
        Self {
            maze,
            start: None,
            order: None,
        }
    }

    /// Walk from `node` instead of the maze origin.
    pub fn start(mut self, node: NodeId) -> Self {
        self.start = Some(node);
        self
    }

    /// Visit zones in this order; zone 0 is moved to the front if needed.
    pub fn visit_order(mut self, order: impl IntoIterator<Item = ZoneId>) -> Self {
        self.order = Some(order.into_iter().collect());
        self
    }

    /// Chain best locations into a solution and write traversal counts
    /// into `scores`.
    ///
    /// # Errors
    ///
    /// - `ScoreError::EmptyZone` if a visited zone has no nodes
    /// - `ScoreError::UnknownNode` if the start or a path node is not scored
    /// - `ScoreError::PathNotFound` if a best location cannot be reached with
    ///   the keys held so far
    pub fn build<F>(&self, scores: &mut ScoreMap, score_fn: F) -> ScoreResult<SolutionScoring>
    where
        F: Fn(&NodeScore) -> f64,
    {
        let graph = self.maze.graph();
        let zone0 = ZoneId::from_index(0);
        let start = self
            .start
            .or(self.maze.start())
            .ok_or(ScoreError::EmptyZone { zone: zone0 })?;
        if graph.node(start).is_none() {
            return Err(ScoreError::UnknownNode { node: start });
        }

        let order = self.effective_order();
        let mut keys: BTreeSet<ZoneId> = BTreeSet::from([zone0]);
        let mut path: Vec<NodeId> = Vec::new();
        let mut stops = Vec::with_capacity(order.len());
        let mut prev = start;

        for zone in order {
            keys.insert(zone);
            let target = best_location(self.maze, scores, zone, &score_fn)?;
            let segment = graph
                .shortest_path(prev, target, |n| keys.contains(&n.zone))
                .ok_or(ScoreError::PathNotFound {
                    zone,
                    from: prev,
                    to: target,
                })?;
            debug!(zone = %zone, from = %prev, to = %target, hops = segment.len() - 1, "leg");

            let skip = usize::from(!path.is_empty());
            path.extend(segment.into_iter().skip(skip));
            stops.push(Stop { zone, node: target });
            prev = target;
        }
        if path.is_empty() {
            path.push(start);
        }

        let mut counts: HashMap<NodeId, usize> = HashMap::new();
        for &id in &path {
            *counts.entry(id).or_default() += 1;
        }
        scores.reset_traversals();
        for (&id, &count) in &counts {
            let score = scores
                .get_mut(id)
                .ok_or(ScoreError::UnknownNode { node: id })?;
            score.solution_traversal_count = count;
        }

        let shortest_path = graph
            .shortest_path(start, prev, |_| true)
            .ok_or(ScoreError::PathNotFound {
                zone: stops.last().map_or(zone0, |s| s.zone),
                from: start,
                to: prev,
            })?;

        let visited: Vec<usize> = counts.values().copied().collect();
        let solution = SolutionScoring {
            redundancy: ratio(counts.len(), path.len()),
            visit_distribution: visit_distribution(&visited, graph.node_count()),
            concentration_index: gini(&visited),
            detour_ratio: detour_ratio(path.len() - 1, shortest_path.len() - 1),
            path,
            stops,
            shortest_path,
        };
        info!(
            length = solution.path.len(),
            redundancy = solution.redundancy,
            concentration = solution.concentration_index,
            detour = solution.detour_ratio,
            "solution built"
        );
        Ok(solution)
    }

    fn effective_order(&self) -> Vec<ZoneId> {
        let zone0 = ZoneId::from_index(0);
        let mut order = match &self.order {
            Some(order) => order.clone(),
            None => self.maze.zones().iter().map(|z| z.id).collect(),
        };
        if order.first() != Some(&zone0) {
            order.retain(|&z| z != zone0);
            order.insert(0, zone0);
        }
        order
    }
}

/// The zone node with the highest score; ties go to the lowest node id.
pub fn best_location<F>(
    maze: &ZonedMaze,
    scores: &ScoreMap,
    zone: ZoneId,
    score_fn: F,
) -> ScoreResult<NodeId>
where
    F: Fn(&NodeScore) -> f64,
{
    let mut members: Vec<NodeId> = maze
        .zone(zone)
        .map(|z| z.nodes().collect())
        .unwrap_or_default();
    members.sort_unstable();

    let mut best: Option<(NodeId, f64)> = None;
    for id in members {
        let score = scores.get(id).ok_or(ScoreError::UnknownNode { node: id })?;
        let value = match score_fn(score) {
            v if v.is_nan() => f64::NEG_INFINITY,
            v => v,
        };
        match best {
            Some((_, top)) if value <= top => {}
            _ => best = Some((id, value)),
        }
    }
    best.map(|(id, _)| id).ok_or(ScoreError::EmptyZone { zone })
}

fn visit_distribution(visited: &[usize], node_count: usize) -> BTreeMap<usize, f64> {
    let mut buckets: BTreeMap<usize, usize> = BTreeMap::new();
    for &count in visited {
        *buckets.entry(count).or_default() += 1;
    }
    let unvisited = node_count.saturating_sub(visited.len());
    if unvisited > 0 {
        buckets.insert(0, unvisited);
    }
    buckets
        .into_iter()
        .map(|(k, n)| (k, ratio(n, node_count)))
        .collect()
}

/// Gini coefficient of `values`, scaled by `n / (n - 1)` so a single
/// dominant value reaches 1.
pub fn gini(values: &[usize]) -> f64 {
    let n = values.len();
    let total: usize = values.iter().sum();
    if n < 2 || total == 0 {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, &x)| (i + 1) as f64 * x as f64)
        .sum();
    let nf = n as f64;
    let g = 2.0 * weighted / (nf * total as f64) - (nf + 1.0) / nf;
    unit_clamp(g * nf / (nf - 1.0))
}

fn detour_ratio(solution_hops: usize, shortest_hops: usize) -> f64 {
    if shortest_hops == 0 {
        1.0
    } else {
        solution_hops as f64 / shortest_hops as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zm_core::{Tolerances, nearly_equal};

    #[test]
    fn gini_of_equal_counts_is_zero() {
        assert!(nearly_equal(gini(&[2, 2, 2]), 0.0, Tolerances::default()));
        assert_eq!(gini(&[5]), 0.0);
        assert_eq!(gini(&[]), 0.0);
    }

    #[test]
    fn gini_of_one_dominant_count_is_one() {
        assert!(nearly_equal(gini(&[0, 0, 0, 9]), 1.0, Tolerances::default()));
    }

    #[test]
    fn gini_grows_with_inequality() {
        let mild = gini(&[1, 1, 2]);
        let strong = gini(&[1, 1, 6]);
        assert!(mild > 0.0);
        assert!(strong > mild);
        assert!(strong <= 1.0);
    }

    #[test]
    fn distribution_includes_unvisited_nodes() {
        let dist = visit_distribution(&[1, 1, 2], 5);
        assert_eq!(dist.get(&0), Some(&0.4));
        assert_eq!(dist.get(&1), Some(&0.4));
        assert_eq!(dist.get(&2), Some(&0.2));
        let total: f64 = dist.values().sum();
        assert!(nearly_equal(total, 1.0, Tolerances::default()));
    }

    #[test]
    fn detour_of_trivial_walk_is_one() {
        assert_eq!(detour_ratio(0, 0), 1.0);
        assert_eq!(detour_ratio(6, 3), 2.0);
    }
}
