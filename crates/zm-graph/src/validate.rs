//! Graph validation logic.

use std::collections::HashSet;
use zm_core::Position;

use crate::error::{GraphError, GraphResult};
use crate::graph::GridGraph;

/// Validate the grid-graph structure: ids match arena slots, positions are
/// valid and unique, and every edge has its reverse.
pub fn validate_structure(graph: &GridGraph) -> GraphResult<()> {
    let mut seen: HashSet<Position> = HashSet::new();

    for (i, node) in graph.nodes().iter().enumerate() {
        // Node ids are contiguous and match their arena slot
        if node.id.slot() != i {
            return Err(GraphError::UnknownNode { node: node.id });
        }
        if !graph.is_valid_position(node.position) {
            return Err(GraphError::InvalidPosition { pos: node.position });
        }
        if !seen.insert(node.position) {
            return Err(GraphError::Occupied {
                pos: node.position,
                node: node.id,
            });
        }
        if graph.node_at(node.position) != Some(node.id) {
            return Err(GraphError::Occupied {
                pos: node.position,
                node: node.id,
            });
        }
    }

    for node in graph.nodes() {
        for &to in node.out_edges() {
            let Some(target) = graph.node(to) else {
                return Err(GraphError::UnknownNode { node: to });
            };
            if to == node.id {
                return Err(GraphError::SelfLoop { node: to });
            }
            if !target.in_edges().contains(&node.id) {
                return Err(GraphError::InconsistentAdjacency {
                    from: node.id,
                    to,
                    what: "out-edge has no matching in-edge",
                });
            }
            if !target.out_edges().contains(&node.id) {
                return Err(GraphError::InconsistentAdjacency {
                    from: node.id,
                    to,
                    what: "edge has no reverse direction",
                });
            }
            if node.position.manhattan(target.position) != 1 {
                return Err(GraphError::InconsistentAdjacency {
                    from: node.id,
                    to,
                    what: "edge joins non-adjacent cells",
                });
            }
        }
    }

    let total_out: usize = graph.nodes().iter().map(|n| n.out_degree()).sum();
    if total_out != graph.edges().len() {
        let first = graph.nodes().first().map(|n| n.id);
        if let Some(id) = first {
            return Err(GraphError::InconsistentAdjacency {
                from: id,
                to: id,
                what: "edge list length disagrees with adjacency",
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GridBuilder;
    use crate::graph::Ownership;
    use zm_core::Id;

    #[test]
    fn validate_empty_graph() {
        let grid = GridBuilder::new(3, 3).build().unwrap();
        assert!(validate_structure(&grid).is_ok());
    }

    #[test]
    fn validate_connected_pair() {
        let mut grid = GridBuilder::new(3, 3).build().unwrap();
        let owner = Ownership::new(Id::from_index(0), Id::from_index(0));
        let a = grid.create_node(Position::new(1, 1), None, owner).unwrap();
        let b = grid
            .create_node(Position::new(1, 2), Some(a), owner)
            .unwrap();
        grid.connect(a, b).unwrap();
        assert!(validate_structure(&grid).is_ok());
    }

    #[test]
    fn validate_detects_missing_reverse() {
        let mut grid = GridBuilder::new(3, 3).build().unwrap();
        let owner = Ownership::new(Id::from_index(0), Id::from_index(0));
        let a = grid.create_node(Position::new(0, 0), None, owner).unwrap();
        let b = grid
            .create_node(Position::new(1, 0), Some(a), owner)
            .unwrap();
        // Corrupt the arena directly: one-way edge.
        grid.nodes[a.slot()].out_edges.push(b);

        let result = validate_structure(&grid);
        assert!(matches!(
            result,
            Err(GraphError::InconsistentAdjacency { .. })
        ));
    }

    #[test]
    fn validate_detects_non_adjacent_edge() {
        let mut grid = GridBuilder::new(3, 3).build().unwrap();
        let owner = Ownership::new(Id::from_index(0), Id::from_index(0));
        let a = grid.create_node(Position::new(0, 0), None, owner).unwrap();
        let b = grid
            .create_node(Position::new(2, 2), Some(a), owner)
            .unwrap();
        grid.connect(a, b).unwrap();

        let result = validate_structure(&grid);
        assert!(matches!(
            result,
            Err(GraphError::InconsistentAdjacency {
                what: "edge joins non-adjacent cells",
                ..
            })
        ));
    }
}
