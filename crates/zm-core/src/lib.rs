//! zm-core: stable foundation for the zoned maze workspace.
//!
//! Contains:
//! - ids (compact ids for nodes, zones and parts)
//! - position (grid coordinates and 4-neighbourhood)
//! - numeric (Real + tolerances + float helpers)

pub mod ids;
pub mod numeric;
pub mod position;

// Re-exports: nice ergonomics for downstream crates
pub use ids::*;
pub use numeric::*;
pub use position::{Direction, Position};
