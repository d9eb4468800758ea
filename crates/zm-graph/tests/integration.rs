//! Integration tests for zm-graph.

use proptest::prelude::*;
use zm_core::{Id, NodeId, Position};
use zm_graph::{GraphError, GridBuilder, GridGraph, Ownership, validate_structure};

fn owner(zone: u32) -> Ownership {
    Ownership::new(Id::from_index(zone), Id::from_index(0))
}

/// Grow a path along `cells`, each node linked to the previous one.
fn grow_path(grid: &mut GridGraph, cells: &[(i32, i32)], zone: u32) -> Vec<NodeId> {
    let mut ids: Vec<NodeId> = Vec::new();
    for &(x, y) in cells {
        let parent = ids.last().copied();
        let id = grid
            .create_node(Position::new(x, y), parent, owner(zone))
            .unwrap();
        if let Some(p) = parent {
            grid.connect(p, id).unwrap();
        }
        ids.push(id);
    }
    ids
}

/// Random tree on an 8x8 grid: each step hangs a child off an existing node
/// in one of four directions, skipping cells that are taken or outside.
fn random_tree(steps: &[(usize, usize)]) -> (GridGraph, Vec<NodeId>) {
    let mut grid = GridBuilder::new(8, 8).build().unwrap();
    let root = grid.create_node(Position::new(4, 4), None, owner(0)).unwrap();
    let mut ids = vec![root];
    for &(choice, dir) in steps {
        let parent = ids[choice % ids.len()];
        let pos = grid.node(parent).unwrap().position.neighbours()[dir];
        if !grid.is_free(pos) {
            continue;
        }
        let child = grid.create_node(pos, Some(parent), owner(0)).unwrap();
        grid.connect(parent, child).unwrap();
        ids.push(child);
    }
    (grid, ids)
}

#[test]
fn build_minimal_tree() {
    // (0,0) - (1,0) - (2,0)
    //           |
    //         (1,1)
    let mut grid = GridBuilder::new(3, 3).build().unwrap();
    let row = grow_path(&mut grid, &[(0, 0), (1, 0), (2, 0)], 0);
    let below = grid
        .create_node(Position::new(1, 1), Some(row[1]), owner(0))
        .unwrap();
    grid.connect(row[1], below).unwrap();

    assert_eq!(grid.node_count(), 4);
    assert_eq!(grid.edges().len(), 6);
    assert_eq!(grid.out_degree(row[1]), 3);
    assert_eq!(grid.max_out_degree(), 3);
    assert_eq!(grid.node(below).unwrap().depth, 2);
    assert_eq!(grid.node_at(Position::new(2, 0)), Some(row[2]));
    assert!(validate_structure(&grid).is_ok());
}

#[test]
fn edges_are_mirrored() {
    let mut grid = GridBuilder::new(4, 1).build().unwrap();
    let ids = grow_path(&mut grid, &[(0, 0), (1, 0), (2, 0), (3, 0)], 0);

    for node in grid.nodes() {
        for &to in node.out_edges() {
            assert!(grid.in_edges(to).contains(&node.id));
            assert!(grid.out_edges(to).contains(&node.id));
        }
    }
    assert_eq!(grid.out_edges(ids[0]), &[ids[1]]);
    assert_eq!(grid.in_edges(ids[3]), &[ids[2]]);
}

#[test]
fn blocked_cells_shape_free_positions() {
    let mut grid = GridBuilder::new(3, 3)
        .block(Position::new(1, 0))
        .block(Position::new(0, 1))
        .build()
        .unwrap();

    assert!(!grid.is_valid_position(Position::new(1, 0)));
    assert!(grid.is_valid_position(Position::new(1, 1)));
    assert!(
        grid.free_adjacent_positions(Position::new(0, 0))
            .is_empty()
    );

    let err = grid
        .create_node(Position::new(1, 0), None, owner(0))
        .unwrap_err();
    assert_eq!(
        err,
        GraphError::InvalidPosition {
            pos: Position::new(1, 0)
        }
    );
}

#[test]
fn growth_filter_skips_dead_pockets() {
    // The node at (1,1) and the walls seal (2,1) completely and leave
    // the left column as a strip with no room to grow.
    let mut grid = GridBuilder::new(4, 3)
        .block_all([
            Position::new(1, 0),
            Position::new(1, 2),
            Position::new(2, 0),
            Position::new(2, 2),
            Position::new(3, 1),
        ])
        .build()
        .unwrap();
    let origin = Position::new(2, 1);
    grid.create_node(Position::new(1, 1), None, owner(0)).unwrap();

    // The sealed cell has no free neighbour.
    assert!(grid.free_adjacent_positions(origin).is_empty());

    let from_left = Position::new(0, 1);
    let plain = grid.free_adjacent_positions(from_left);
    let growable = grid.free_adjacent_positions_with_growth(from_left);
    assert_eq!(plain, vec![Position::new(0, 0), Position::new(0, 2)]);
    assert!(growable.is_empty());
}

#[test]
fn searches_agree_on_a_winding_path() {
    let mut grid = GridBuilder::new(3, 3).build().unwrap();
    let cells = [(0, 0), (1, 0), (2, 0), (2, 1), (1, 1), (0, 1), (0, 2)];
    let ids = grow_path(&mut grid, &cells, 0);

    let path = grid.shortest_path(ids[0], ids[6], |_| true).unwrap();
    assert_eq!(path, ids);
    assert_eq!(grid.graph_distance(ids[0], ids[6]), Some(6));

    let field = grid.distances_from(ids[6]);
    assert_eq!(field.len(), 7);
    assert_eq!(field.distance(ids[0]), Some(6));
    assert_eq!(field.distance(ids[6]), Some(0));
}

#[test]
fn filtered_search_respects_ownership() {
    let mut grid = GridBuilder::new(5, 1).build().unwrap();
    let first = grow_path(&mut grid, &[(0, 0), (1, 0)], 0);
    let second = grid
        .create_node(Position::new(2, 0), Some(first[1]), owner(1))
        .unwrap();
    grid.connect(first[1], second).unwrap();
    let tail = grid
        .create_node(Position::new(3, 0), Some(second), owner(0))
        .unwrap();
    grid.connect(second, tail).unwrap();

    let zone0 = Id::from_index(0);
    assert!(grid.shortest_path(first[0], tail, |n| n.zone == zone0).is_none());
    assert_eq!(grid.shortest_path(first[0], tail, |_| true).map(|p| p.len()), Some(4));

    let field = grid.distance_field(&[first[0], tail], |n| n.zone == zone0);
    assert_eq!(field.distance(first[1]), Some(1));
    assert_eq!(field.path_to_source(first[1]), vec![first[1], first[0]]);
    assert!(!field.contains(second));
}

#[test]
fn connect_rejects_unknown_and_self() {
    let mut grid = GridBuilder::new(2, 2).build().unwrap();
    let a = grid.create_node(Position::new(0, 0), None, owner(0)).unwrap();

    assert_eq!(grid.connect(a, a), Err(GraphError::SelfLoop { node: a }));
    let ghost = NodeId::from_index(9);
    assert_eq!(
        grid.connect(a, ghost),
        Err(GraphError::UnknownNode { node: ghost })
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn path_queries_agree_with_distance_field(
        steps in prop::collection::vec((any::<usize>(), 0_usize..4), 1..48),
        pairs in prop::collection::vec((any::<usize>(), any::<usize>()), 1..8),
    ) {
        let (grid, ids) = random_tree(&steps);
        prop_assert!(validate_structure(&grid).is_ok());
        for (a, b) in pairs {
            let (a, b) = (ids[a % ids.len()], ids[b % ids.len()]);
            let field = grid.distances_from(a);
            prop_assert_eq!(field.len(), ids.len());

            let hops = grid.graph_distance(a, b);
            prop_assert_eq!(hops, field.distance(b));
            let path = grid.shortest_path(a, b, |_| true).unwrap();
            prop_assert_eq!(path.first(), Some(&a));
            prop_assert_eq!(path.last(), Some(&b));
            prop_assert_eq!(Some(path.len() - 1), hops);
            // Walking the BFS tree back from `b` retraces the same path.
            let mut back = field.path_to_source(b);
            back.reverse();
            prop_assert_eq!(back, path);
        }
    }
}
