//! zm-graph: grid-graph layer for the zoned maze.
//!
//! Provides:
//! - Core data structures (Node, Edge, Ownership, GridGraph)
//! - Grid builder with blocked cells
//! - Free-position, shortest-path and graph-distance queries
//! - Structural validation
//!
//! # Example
//!
//! ```
//! use zm_core::{Id, Position};
//! use zm_graph::{GridBuilder, Ownership};
//!
//! let mut grid = GridBuilder::new(4, 4).build().unwrap();
//! let owner = Ownership::new(Id::from_index(0), Id::from_index(0));
//! let a = grid.create_node(Position::new(0, 0), None, owner).unwrap();
//! let b = grid.create_node(Position::new(1, 0), Some(a), owner).unwrap();
//! grid.connect(a, b).unwrap();
//!
//! assert_eq!(grid.graph_distance(a, b), Some(1));
//! assert_eq!(grid.free_adjacent_positions(Position::new(0, 0)).len(), 1);
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod search;
pub mod validate;

// Re-exports for ergonomics
pub use builder::GridBuilder;
pub use error::{GraphError, GraphResult};
pub use graph::{Edge, GridGraph, Node, Ownership};
pub use search::DistanceField;
pub use validate::validate_structure;
