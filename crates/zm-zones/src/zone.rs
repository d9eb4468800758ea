//! Finalized, read-only growth output.

use zm_core::{NodeId, PartId, ZoneId};
use zm_graph::{GridGraph, Node};

/// A connected piece of a zone entered through a single door.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub id: PartId,
    /// The node through which the part was entered.
    pub start: NodeId,
    pub(crate) nodes: Vec<NodeId>,
}

impl Part {
    /// Member nodes in creation order (the start node comes first).
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }
}

/// A growth phase of the maze: its parts in creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub id: ZoneId,
    pub(crate) parts: Vec<Part>,
    /// Zone nodes that still touched a free cell when growth ended.
    pub(crate) open_nodes: Vec<NodeId>,
}

impl Zone {
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn part(&self, id: PartId) -> Option<&Part> {
        self.parts.get(id.slot())
    }

    pub fn open_nodes(&self) -> &[NodeId] {
        &self.open_nodes
    }

    /// Total members across all parts.
    pub fn node_count(&self) -> usize {
        self.parts.iter().map(Part::len).sum()
    }

    /// All member nodes, part by part.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.parts.iter().flat_map(|p| p.nodes.iter().copied())
    }
}

/// The grown graph together with its zone/part partition.
#[derive(Debug, Clone)]
pub struct ZonedMaze {
    pub(crate) graph: GridGraph,
    pub(crate) zones: Vec<Zone>,
    pub(crate) start: Option<NodeId>,
}

impl ZonedMaze {
    pub fn graph(&self) -> &GridGraph {
        &self.graph
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(id.slot())
    }

    /// The origin node, or None for an empty maze.
    pub fn start(&self) -> Option<NodeId> {
        self.start
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.graph.node(id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// The part a node belongs to.
    pub fn part_of(&self, id: NodeId) -> Option<&Part> {
        let node = self.graph.node(id)?;
        self.zone(node.zone)?.part(node.part)
    }

    /// Iterate `(zone, part)` pairs across the whole maze.
    pub fn parts(&self) -> impl Iterator<Item = (&Zone, &Part)> + '_ {
        self.zones
            .iter()
            .flat_map(|z| z.parts.iter().map(move |p| (z, p)))
    }
}
