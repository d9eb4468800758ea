//! Greedy, distance-constrained placement of locations.
//!
//! Candidates are taken best-first and accepted only when they keep at least
//! `min_distance` hops from everything accepted so far. When a pass cannot
//! place the requested count, the distance is relaxed by one and the pass
//! restarts, down to a distance of 1.

use std::collections::HashMap;

use tracing::debug;
use zm_core::{NodeId, PartId, ZoneId};
use zm_graph::DistanceField;
use zm_zones::ZonedMaze;

use crate::error::{ScoreError, ScoreResult};
use crate::score::{NodeScore, ScoreMap};

/// Accepted nodes and the distance that was finally enforced between them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpreadResult {
    pub nodes: Vec<NodeId>,
    pub min_distance: usize,
}

/// The region a scoped spread was run over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Maze,
    Zone(ZoneId),
    Part(ZoneId, PartId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionSpread {
    pub region: Region,
    pub result: SpreadResult,
}

/// How the placement is scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Global,
    PerZone,
    PerPart,
}

/// How many locations to place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Amount {
    Count(usize),
    /// Fraction of each region's node count.
    Ratio(f64),
}

/// Spreads locations over a scored maze, caching graph distances per
/// accepted node across passes.
#[derive(Debug)]
pub struct SpreadLocations<'a> {
    maze: &'a ZonedMaze,
    scores: &'a ScoreMap,
    distances: HashMap<NodeId, DistanceField>,
}

impl<'a> SpreadLocations<'a> {
    pub fn new(maze: &'a ZonedMaze, scores: &'a ScoreMap) -> Self {
        Self {
            maze,
            scores,
            distances: HashMap::new(),
        }
    }

    /// Pick up to `desired` nodes from `candidates`, best `score_fn` first.
    pub fn spread<F>(
        &mut self,
        candidates: &[NodeId],
        desired: usize,
        score_fn: F,
    ) -> ScoreResult<SpreadResult>
    where
        F: Fn(&NodeScore) -> f64,
    {
        if desired == 0 || candidates.is_empty() {
            return Ok(SpreadResult::default());
        }

        let mut ranked: Vec<(NodeId, f64)> = Vec::with_capacity(candidates.len());
        for &id in candidates {
            let score = self
                .scores
                .get(id)
                .ok_or(ScoreError::UnknownNode { node: id })?;
            ranked.push((id, score_fn(score)));
        }
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.dedup_by_key(|(id, _)| *id);

        let pool = ranked.len();
        let mut min_distance = (pool as f64 / desired as f64).round() as usize + 1;
        loop {
            let nodes = self.greedy_pass(&ranked, desired, min_distance);
            if nodes.len() >= desired || min_distance <= 1 {
                debug!(pool, desired, placed = nodes.len(), min_distance, "spread");
                return Ok(SpreadResult {
                    nodes,
                    min_distance,
                });
            }
            min_distance -= 1;
        }
    }

    /// Spread over every node of the maze.
    pub fn spread_global<F>(&mut self, desired: usize, score_fn: F) -> ScoreResult<SpreadResult>
    where
        F: Fn(&NodeScore) -> f64,
    {
        let all: Vec<NodeId> = self.maze.graph().nodes().iter().map(|n| n.id).collect();
        self.spread(&all, desired, score_fn)
    }

    /// Split `desired` across zones by size (at least one each) and spread
    /// within every zone.
    pub fn spread_per_zone<F>(
        &mut self,
        desired: usize,
        score_fn: F,
    ) -> ScoreResult<Vec<RegionSpread>>
    where
        F: Fn(&NodeScore) -> f64,
    {
        let regions = self.zone_regions();
        let shares = apportion(desired, &regions);
        self.spread_regions(regions, shares, score_fn)
    }

    /// Split `desired` across parts by size (at least one each) and spread
    /// within every part.
    pub fn spread_per_part<F>(
        &mut self,
        desired: usize,
        score_fn: F,
    ) -> ScoreResult<Vec<RegionSpread>>
    where
        F: Fn(&NodeScore) -> f64,
    {
        let regions = self.part_regions();
        let shares = apportion(desired, &regions);
        self.spread_regions(regions, shares, score_fn)
    }

    /// `spread_global` with `desired = max(1, round(ratio * nodes))`.
    pub fn spread_global_ratio<F>(&mut self, ratio: f64, score_fn: F) -> ScoreResult<SpreadResult>
    where
        F: Fn(&NodeScore) -> f64,
    {
        let desired = desired_for_ratio(ratio, self.maze.node_count())?;
        self.spread_global(desired, score_fn)
    }

    /// Per-zone spread with each zone's count derived from `ratio`.
    pub fn spread_per_zone_ratio<F>(
        &mut self,
        ratio: f64,
        score_fn: F,
    ) -> ScoreResult<Vec<RegionSpread>>
    where
        F: Fn(&NodeScore) -> f64,
    {
        let regions = self.zone_regions();
        let shares = ratio_shares(ratio, &regions)?;
        self.spread_regions(regions, shares, score_fn)
    }

    /// Per-part spread with each part's count derived from `ratio`.
    pub fn spread_per_part_ratio<F>(
        &mut self,
        ratio: f64,
        score_fn: F,
    ) -> ScoreResult<Vec<RegionSpread>>
    where
        F: Fn(&NodeScore) -> f64,
    {
        let regions = self.part_regions();
        let shares = ratio_shares(ratio, &regions)?;
        self.spread_regions(regions, shares, score_fn)
    }

    /// Dispatch on scope and amount; a global spread comes back as a single
    /// `Region::Maze` entry.
    pub fn place<F>(
        &mut self,
        scope: Scope,
        amount: Amount,
        score_fn: F,
    ) -> ScoreResult<Vec<RegionSpread>>
    where
        F: Fn(&NodeScore) -> f64,
    {
        let global = |result| {
            vec![RegionSpread {
                region: Region::Maze,
                result,
            }]
        };
        match (scope, amount) {
            (Scope::Global, Amount::Count(n)) => self.spread_global(n, score_fn).map(global),
            (Scope::Global, Amount::Ratio(r)) => self.spread_global_ratio(r, score_fn).map(global),
            (Scope::PerZone, Amount::Count(n)) => self.spread_per_zone(n, score_fn),
            (Scope::PerZone, Amount::Ratio(r)) => self.spread_per_zone_ratio(r, score_fn),
            (Scope::PerPart, Amount::Count(n)) => self.spread_per_part(n, score_fn),
            (Scope::PerPart, Amount::Ratio(r)) => self.spread_per_part_ratio(r, score_fn),
        }
    }

    fn greedy_pass(
        &mut self,
        ranked: &[(NodeId, f64)],
        desired: usize,
        min_distance: usize,
    ) -> Vec<NodeId> {
        let mut accepted: Vec<NodeId> = Vec::with_capacity(desired);
        for &(candidate, _) in ranked {
            if accepted.len() >= desired {
                break;
            }
            let far_enough = accepted
                .iter()
                .all(|&a| self.distance(a, candidate).is_none_or(|d| d >= min_distance));
            if far_enough {
                accepted.push(candidate);
                self.ensure_field(candidate);
            }
        }
        accepted
    }

    fn ensure_field(&mut self, node: NodeId) {
        if !self.distances.contains_key(&node) {
            let field = self.maze.graph().distances_from(node);
            self.distances.insert(node, field);
        }
    }

    /// Hop count between an accepted node and a candidate; None if unreachable.
    fn distance(&self, accepted: NodeId, candidate: NodeId) -> Option<usize> {
        match self.distances.get(&accepted) {
            Some(field) => field.distance(candidate),
            None => self.maze.graph().graph_distance(accepted, candidate),
        }
    }

    fn zone_regions(&self) -> Vec<(Region, Vec<NodeId>)> {
        self.maze
            .zones()
            .iter()
            .map(|z| (Region::Zone(z.id), z.nodes().collect()))
            .collect()
    }

    fn part_regions(&self) -> Vec<(Region, Vec<NodeId>)> {
        self.maze
            .parts()
            .map(|(z, p)| (Region::Part(z.id, p.id), p.nodes().to_vec()))
            .collect()
    }

    fn spread_regions<F>(
        &mut self,
        regions: Vec<(Region, Vec<NodeId>)>,
        shares: Vec<usize>,
        score_fn: F,
    ) -> ScoreResult<Vec<RegionSpread>>
    where
        F: Fn(&NodeScore) -> f64,
    {
        let mut out = Vec::with_capacity(regions.len());
        for ((region, nodes), desired) in regions.into_iter().zip(shares) {
            let result = self.spread(&nodes, desired, &score_fn)?;
            out.push(RegionSpread { region, result });
        }
        Ok(out)
    }
}

/// Share `desired` across regions in proportion to their size, with at
/// least one per non-empty region. Nothing is placed when `desired` is 0.
fn apportion(desired: usize, regions: &[(Region, Vec<NodeId>)]) -> Vec<usize> {
    let total: usize = regions.iter().map(|(_, nodes)| nodes.len()).sum();
    regions
        .iter()
        .map(|(_, nodes)| {
            if desired == 0 || nodes.is_empty() || total == 0 {
                return 0;
            }
            let share = (desired as f64 * nodes.len() as f64 / total as f64).round() as usize;
            share.max(1)
        })
        .collect()
}

fn ratio_shares(ratio: f64, regions: &[(Region, Vec<NodeId>)]) -> ScoreResult<Vec<usize>> {
    regions
        .iter()
        .map(|(_, nodes)| desired_for_ratio(ratio, nodes.len()))
        .collect()
}

/// `max(1, round(ratio * pool))`, or 0 for an empty pool.
pub fn desired_for_ratio(ratio: f64, pool: usize) -> ScoreResult<usize> {
    if !ratio.is_finite() || ratio < 0.0 {
        return Err(ScoreError::InvalidRatio { value: ratio });
    }
    if pool == 0 {
        return Ok(0);
    }
    Ok(((ratio * pool as f64).round() as usize).max(1))
}
