//! Shortest-path and graph-distance queries.
//!
//! Every edge has unit cost. Paths follow out-edges.

use std::collections::HashMap;

use pathfinding::prelude::{bfs, dijkstra_all};
use zm_core::NodeId;

use crate::graph::{GridGraph, Node};

/// Distances from one or more source nodes, with the BFS parent tree.
#[derive(Debug, Clone, Default)]
pub struct DistanceField {
    dist: HashMap<NodeId, usize>,
    parent: HashMap<NodeId, NodeId>,
}

impl DistanceField {
    /// Distance to the nearest source, if reachable.
    pub fn distance(&self, node: NodeId) -> Option<usize> {
        self.dist.get(&node).copied()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.dist.contains_key(&node)
    }

    /// Number of reached nodes, sources included.
    pub fn len(&self) -> usize {
        self.dist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dist.is_empty()
    }

    /// Walk from `node` back to its nearest source, both ends included.
    pub fn path_to_source(&self, node: NodeId) -> Vec<NodeId> {
        if !self.contains(node) {
            return Vec::new();
        }
        let mut path = vec![node];
        let mut cur = node;
        while let Some(&p) = self.parent.get(&cur) {
            path.push(p);
            cur = p;
        }
        path
    }
}

impl GridGraph {
    /// Shortest path from `from` to `to`, both ends included.
    ///
    /// Intermediate and final nodes must satisfy `allow`; `from` is always
    /// admitted.
    pub fn shortest_path<F>(&self, from: NodeId, to: NodeId, allow: F) -> Option<Vec<NodeId>>
    where
        F: Fn(&Node) -> bool,
    {
        self.node(from)?;
        self.node(to)?;
        bfs(
            &from,
            |&id| {
                self.out_edges(id)
                    .iter()
                    .copied()
                    .filter(|&n| self.node(n).is_some_and(&allow))
                    .collect::<Vec<_>>()
            },
            |&id| id == to,
        )
    }

    /// Unconstrained hop count between two nodes.
    pub fn graph_distance(&self, a: NodeId, b: NodeId) -> Option<usize> {
        self.shortest_path(a, b, |_| true).map(|p| p.len() - 1)
    }

    /// Distances from a single node to everything reachable.
    pub fn distances_from(&self, source: NodeId) -> DistanceField {
        self.distance_field(&[source], |_| true)
    }

    /// Multi-source distances restricted to nodes satisfying `allow`.
    ///
    /// Sources that do not exist or fail `allow` are ignored.
    pub fn distance_field<F>(&self, sources: &[NodeId], allow: F) -> DistanceField
    where
        F: Fn(&Node) -> bool,
    {
        let admitted = |id: NodeId| self.node(id).is_some_and(&allow);

        // A virtual root (None) links to every source with zero cost.
        let reached = dijkstra_all(&None::<NodeId>, |cur: &Option<NodeId>| match *cur {
            None => sources
                .iter()
                .copied()
                .filter(|&s| admitted(s))
                .map(|s| (Some(s), 0_usize))
                .collect::<Vec<_>>(),
            Some(id) => self
                .out_edges(id)
                .iter()
                .copied()
                .filter(|&n| admitted(n))
                .map(|n| (Some(n), 1_usize))
                .collect::<Vec<_>>(),
        });

        let mut field = DistanceField::default();
        for (node, (parent, cost)) in reached {
            let Some(node) = node else { continue };
            field.dist.insert(node, cost);
            if let Some(parent) = parent {
                field.parent.insert(node, parent);
            }
        }
        field
    }
}
