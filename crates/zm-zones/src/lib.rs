//! zm-zones: zone/part growth for the zoned maze.
//!
//! A maze is grown from a start position zone by zone. Each zone is split into
//! parts; every part past zone 0 is entered through exactly one door from an
//! earlier zone. Per-zone budgets come from a [`ZoneConstraints`]
//! implementation and all randomness flows through one injected generator.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use zm_core::Position;
//! use zm_graph::GridBuilder;
//! use zm_zones::{ZoneGrower, ZoneSpec, ZoneTable};
//!
//! let table = ZoneTable::from_specs([
//!     ZoneSpec::new(1, 1).doors_out(2),
//!     ZoneSpec::new(4, 2).doors_out(2),
//!     ZoneSpec::new(4, 1).doors_out(0),
//! ])
//! .unwrap();
//! let grid = GridBuilder::new(12, 12).build().unwrap();
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//!
//! let maze = ZoneGrower::default()
//!     .generate(grid, Position::new(0, 0), &table, &mut rng)
//!     .unwrap();
//! assert_eq!(maze.node_count(), 9);
//! maze.check_invariants(&table).unwrap();
//! ```

pub mod constraints;
pub mod error;
mod generation;
pub mod grower;
mod invariants;
pub mod sampling;
pub mod zone;

pub use constraints::{
    FormulaConstraints, FormulaParams, RandomTableParams, ZoneConstraints, ZoneSpec, ZoneTable,
    ZoneTableBuilder, spec_of, validate_constraints, validate_spec,
};
pub use error::{ConfigError, GrowthAction, ZoneError, ZoneResult};
pub use grower::{GrowerOptions, ZoneGrower};
pub use sampling::{DEFAULT_WEIGHT_FACTOR, decayed_index, decayed_probability, sample_decayed_index};
pub use zone::{Part, Zone, ZonedMaze};
