//! Error types for constraint configuration and zone growth.

use thiserror::Error;
use zm_core::{NodeId, ZoneId};
use zm_graph::GraphError;

pub type ZoneResult<T> = Result<T, ZoneError>;

/// Constraint misconfiguration, detected when constraints are built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Zone {zone} requests {parts} parts but only {nodes} nodes")]
    PartsExceedNodes {
        zone: usize,
        parts: usize,
        nodes: usize,
    },

    #[error("Zone 0 must have exactly one part (got {parts})")]
    ZoneZeroParts { parts: usize },

    #[error("Zone {zone} must have at least one part")]
    ZeroParts { zone: usize },

    #[error("Zone registered out of order: expected index {expected}, got {got}")]
    NonSequentialZone { expected: usize, got: usize },

    #[error("Negative budget for {field} in zone {zone}: {value}")]
    NegativeBudget {
        zone: usize,
        field: &'static str,
        value: i64,
    },

    #[error("Weight factor must be finite and positive (got {value})")]
    InvalidWeightFactor { value: f64 },

    #[error("Invalid constraint parameter: {what}")]
    InvalidParameter { what: String },
}

/// What the grower was trying to do when it ran out of candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthAction {
    NewPart,
    Expand,
}

impl std::fmt::Display for GrowthAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrowthAction::NewPart => write!(f, "open a new part"),
            GrowthAction::Expand => write!(f, "expand the zone"),
        }
    }
}

/// Errors raised by zone growth.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ZoneError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Start position is not a valid grid position: {0}")]
    InvalidStart(zm_core::Position),

    #[error("Generation exhausted in zone {zone}: no node available to {action}. {hint}")]
    GenerationExhausted {
        zone: ZoneId,
        action: GrowthAction,
        hint: &'static str,
    },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Invariant violated at node {node:?}: {what}")]
    Invariant { node: Option<NodeId>, what: String },
}

pub(crate) const EXHAUSTED_NEW_PART_HINT: &str =
    "Increase nodes or doors-out in earlier zones, or enable flexible parts for this zone";
pub(crate) const EXHAUSTED_EXPAND_HINT: &str =
    "Increase the zone's part count, or enable flexible parts so new parts can replace expansion";
