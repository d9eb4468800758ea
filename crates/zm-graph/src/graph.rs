//! Core grid-graph data structures.

use std::collections::{HashMap, HashSet};

use zm_core::{NodeId, PartId, Position, ZoneId};

use crate::error::{GraphError, GraphResult};

/// Zone/part membership recorded on a node at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ownership {
    pub zone: ZoneId,
    pub part: PartId,
}

impl Ownership {
    pub fn new(zone: ZoneId, part: PartId) -> Self {
        Self { zone, part }
    }
}

/// A node placed on a grid cell.
///
/// Membership is held as small ids rather than references, so zones and parts
/// can point at nodes without cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub position: Position,
    pub zone: ZoneId,
    pub part: PartId,
    /// Distance from the origin along the growth tree (start = 0).
    pub depth: u32,
    pub(crate) out_edges: Vec<NodeId>,
    pub(crate) in_edges: Vec<NodeId>,
}

impl Node {
    pub fn out_edges(&self) -> &[NodeId] {
        &self.out_edges
    }

    pub fn in_edges(&self) -> &[NodeId] {
        &self.in_edges
    }

    pub fn out_degree(&self) -> usize {
        self.out_edges.len()
    }
}

/// Directed connection between two nodes.
///
/// `GridGraph::connect` always records both directions; direction is kept so
/// door crossings between zones can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
}

/// A rectangular grid with optional blocked cells and an append-only node arena.
///
/// Cells are addressed by `Position` with `0 <= x < width`, `0 <= y < height`.
/// Nodes and edges are never removed once created.
#[derive(Debug, Clone)]
pub struct GridGraph {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) blocked: HashSet<Position>,
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) occupied: HashMap<Position, NodeId>,
}

impl GridGraph {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Inside the grid and not blocked.
    pub fn is_valid_position(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as u32) < self.width
            && (pos.y as u32) < self.height
            && !self.blocked.contains(&pos)
    }

    /// Valid and not occupied by a node.
    pub fn is_free(&self, pos: Position) -> bool {
        self.is_valid_position(pos) && !self.occupied.contains_key(&pos)
    }

    pub fn node_at(&self, pos: Position) -> Option<NodeId> {
        self.occupied.get(&pos).copied()
    }

    /// Return all nodes in creation order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return all edges in creation order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get a node by ID (returns None if ID out of bounds).
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.slot())
    }

    pub(crate) fn require(&self, id: NodeId) -> GraphResult<&Node> {
        self.node(id).ok_or(GraphError::UnknownNode { node: id })
    }

    pub fn out_edges(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| n.out_edges.as_slice())
    }

    pub fn in_edges(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| n.in_edges.as_slice())
    }

    pub fn out_degree(&self, id: NodeId) -> usize {
        self.out_edges(id).len()
    }

    /// Largest out-degree over every node (0 for an empty graph).
    pub fn max_out_degree(&self) -> usize {
        self.nodes.iter().map(Node::out_degree).max().unwrap_or(0)
    }

    /// Create a node at `pos`.
    ///
    /// Depth is one more than the parent's, or 0 without a parent. The caller is
    /// responsible for connecting parent and child.
    pub fn create_node(
        &mut self,
        pos: Position,
        parent: Option<NodeId>,
        owner: Ownership,
    ) -> GraphResult<NodeId> {
        if !self.is_valid_position(pos) {
            return Err(GraphError::InvalidPosition { pos });
        }
        if let Some(&node) = self.occupied.get(&pos) {
            return Err(GraphError::Occupied { pos, node });
        }
        let depth = match parent {
            Some(p) => self.require(p)?.depth + 1,
            None => 0,
        };

        let id = NodeId::from_usize(self.nodes.len());
        self.nodes.push(Node {
            id,
            position: pos,
            zone: owner.zone,
            part: owner.part,
            depth,
            out_edges: Vec::new(),
            in_edges: Vec::new(),
        });
        self.occupied.insert(pos, id);
        Ok(id)
    }

    /// Link two nodes with an edge in each direction.
    ///
    /// Connecting an already-linked pair is a no-op.
    pub fn connect(&mut self, a: NodeId, b: NodeId) -> GraphResult<()> {
        if a == b {
            return Err(GraphError::SelfLoop { node: a });
        }
        self.require(a)?;
        self.require(b)?;
        if self.nodes[a.slot()].out_edges.contains(&b) {
            return Ok(());
        }

        self.nodes[a.slot()].out_edges.push(b);
        self.nodes[b.slot()].in_edges.push(a);
        self.nodes[b.slot()].out_edges.push(a);
        self.nodes[a.slot()].in_edges.push(b);
        self.edges.push(Edge { from: a, to: b });
        self.edges.push(Edge { from: b, to: a });
        Ok(())
    }

    /// Free cells orthogonally adjacent to `pos`, in N, E, S, W order.
    pub fn free_adjacent_positions(&self, pos: Position) -> Vec<Position> {
        pos.neighbours()
            .into_iter()
            .filter(|&p| self.is_free(p))
            .collect()
    }

    /// Free cells adjacent to `pos` that would themselves keep at least one
    /// free neighbour once occupied.
    pub fn free_adjacent_positions_with_growth(&self, pos: Position) -> Vec<Position> {
        self.free_adjacent_positions(pos)
            .into_iter()
            .filter(|&candidate| {
                candidate
                    .neighbours()
                    .into_iter()
                    .any(|q| q != pos && self.is_free(q))
            })
            .collect()
    }

    /// True if any free cell touches the node.
    pub fn has_free_adjacent(&self, id: NodeId) -> bool {
        self.node(id)
            .is_some_and(|n| n.position.neighbours().into_iter().any(|p| self.is_free(p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GridBuilder;
    use zm_core::Id;

    fn owner() -> Ownership {
        Ownership::new(Id::from_index(0), Id::from_index(0))
    }

    #[test]
    fn create_rejects_occupied_and_invalid() {
        let mut grid = GridBuilder::new(2, 2).build().unwrap();
        let a = grid.create_node(Position::new(0, 0), None, owner()).unwrap();
        assert_eq!(
            grid.create_node(Position::new(0, 0), None, owner()),
            Err(GraphError::Occupied {
                pos: Position::new(0, 0),
                node: a
            })
        );
        assert!(matches!(
            grid.create_node(Position::new(2, 0), None, owner()),
            Err(GraphError::InvalidPosition { .. })
        ));
    }

    #[test]
    fn depth_follows_parent() {
        let mut grid = GridBuilder::new(3, 1).build().unwrap();
        let a = grid.create_node(Position::new(0, 0), None, owner()).unwrap();
        let b = grid
            .create_node(Position::new(1, 0), Some(a), owner())
            .unwrap();
        let c = grid
            .create_node(Position::new(2, 0), Some(b), owner())
            .unwrap();
        assert_eq!(grid.node(a).unwrap().depth, 0);
        assert_eq!(grid.node(c).unwrap().depth, 2);
    }

    #[test]
    fn connect_is_bidirectional_and_idempotent() {
        let mut grid = GridBuilder::new(2, 1).build().unwrap();
        let a = grid.create_node(Position::new(0, 0), None, owner()).unwrap();
        let b = grid
            .create_node(Position::new(1, 0), Some(a), owner())
            .unwrap();
        grid.connect(a, b).unwrap();
        grid.connect(b, a).unwrap();

        assert_eq!(grid.out_edges(a), &[b]);
        assert_eq!(grid.in_edges(a), &[b]);
        assert_eq!(grid.out_edges(b), &[a]);
        assert_eq!(grid.edges().len(), 2);
        assert_eq!(grid.connect(a, a), Err(GraphError::SelfLoop { node: a }));
    }

    #[test]
    fn growth_filter_drops_pockets() {
        // Row 1 is blocked except (0,1): a pocket below (0,0).
        let mut grid = GridBuilder::new(3, 2)
            .block(Position::new(1, 1))
            .block(Position::new(2, 1))
            .build()
            .unwrap();
        let origin = Position::new(0, 0);
        grid.create_node(origin, None, owner()).unwrap();

        let free = grid.free_adjacent_positions(origin);
        assert_eq!(free, vec![Position::new(1, 0), Position::new(0, 1)]);

        let growable = grid.free_adjacent_positions_with_growth(origin);
        assert_eq!(growable, vec![Position::new(1, 0)]);
    }
}
