//! Graph-specific error types.

use thiserror::Error;
use zm_core::{NodeId, Position};

pub type GraphResult<T> = Result<T, GraphError>;

/// Grid-graph construction and query errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The grid has a zero dimension.
    #[error("Grid dimensions must be non-zero (width={width}, height={height})")]
    EmptyGrid { width: u32, height: u32 },

    /// Position lies outside the grid or on a blocked cell.
    #[error("Position {pos} is not a valid grid position")]
    InvalidPosition { pos: Position },

    /// A node already occupies the position.
    #[error("Position {pos} is already occupied by node {node}")]
    Occupied { pos: Position, node: NodeId },

    /// Node id does not exist in the arena.
    #[error("Node {node} does not exist")]
    UnknownNode { node: NodeId },

    /// Attempt to connect a node to itself.
    #[error("Node {node} cannot be connected to itself")]
    SelfLoop { node: NodeId },

    /// Edge lists disagree with each other or with the node arena.
    #[error("Inconsistent adjacency between {from} and {to}: {what}")]
    InconsistentAdjacency {
        from: NodeId,
        to: NodeId,
        what: &'static str,
    },
}
