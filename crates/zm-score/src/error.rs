//! Error types for scoring, solution building and placement.

use thiserror::Error;
use zm_core::{NodeId, ZoneId};

pub type ScoreResult<T> = Result<T, ScoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    #[error(
        "No valid path under current keys into zone {zone}: {from} -> {to}. \
         The visit order is incompatible with the generated topology"
    )]
    PathNotFound {
        zone: ZoneId,
        from: NodeId,
        to: NodeId,
    },

    #[error("Unknown node: {node}")]
    UnknownNode { node: NodeId },

    #[error("Zone {zone} has no nodes")]
    EmptyZone { zone: ZoneId },

    #[error("Placement ratio must be finite and non-negative (got {value})")]
    InvalidRatio { value: f64 },
}
