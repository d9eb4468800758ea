//! zm-score: scoring, solution paths and placement over a grown maze.
//!
//! - `score`: per-node dead-end / entry-distance / exit-distance scores
//! - `solution`: key-gated walk through every zone's best location, with
//!   redundancy, visit distribution, concentration and detour metrics
//! - `spread`: greedy distance-constrained placement (global, per zone, per part)

pub mod error;
pub mod score;
pub mod solution;
pub mod spread;

pub use error::{ScoreError, ScoreResult};
pub use score::{NodeScore, ScoreEngine, ScoreKind, ScoreMap, dead_end_score, doors_in, doors_out};
pub use solution::{SolutionBuilder, SolutionScoring, Stop, best_location, gini};
pub use spread::{
    Amount, Region, RegionSpread, Scope, SpreadLocations, SpreadResult, desired_for_ratio,
};
