//! Turn a validated maze file into runtime inputs.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use zm_core::Position;
use zm_graph::{GridBuilder, GridGraph};
use zm_zones::{GrowerOptions, ZoneError, ZoneGrower, ZoneSpec, ZoneTable, ZonedMaze};

use crate::schema::{MazeConfig, PositionDef, ZoneDef};
use crate::validate::validate_config;
use crate::ProjectResult;

/// Everything needed to grow the maze described by a file.
#[derive(Debug, Clone)]
pub struct CompiledMaze {
    pub grid: GridGraph,
    pub table: ZoneTable,
    pub options: GrowerOptions,
    pub start: Position,
    pub seed: u64,
}

impl From<PositionDef> for Position {
    fn from(p: PositionDef) -> Self {
        Position::new(p.x, p.y)
    }
}

fn to_spec(zone: &ZoneDef) -> ZoneSpec {
    // Budgets are non-negative once validated.
    let mut spec = ZoneSpec::new(zone.nodes as usize, zone.parts as usize);
    if let Some(max) = zone.max_doors_out {
        spec = spec.doors_out(max as usize);
    }
    if zone.corridor {
        spec = spec.corridor();
    }
    if zone.flexible_parts {
        spec = spec.flexible();
    }
    spec
}

pub fn compile(config: &MazeConfig) -> ProjectResult<CompiledMaze> {
    validate_config(config)?;

    let grid = GridBuilder::new(config.grid.width, config.grid.height)
        .block_all(config.grid.blocked.iter().map(|&p| Position::from(p)))
        .build()?;

    let mut builder = ZoneTable::builder();
    for (index, zone) in config.zones.iter().enumerate() {
        builder = builder.zone(index, to_spec(zone)).map_err(ZoneError::from)?;
    }
    if let Some(cap) = config.max_total_nodes {
        builder = builder.max_total_nodes(cap as usize);
    }

    let options = GrowerOptions {
        weight_factor: config.growth.weight_factor,
    };
    options.validate().map_err(ZoneError::from)?;

    Ok(CompiledMaze {
        grid,
        table: builder.build(),
        options,
        start: config.start.into(),
        seed: config.seed,
    })
}

/// Compile and grow with `seed` (or the file's own seed).
pub fn generate(config: &MazeConfig, seed: Option<u64>) -> ProjectResult<ZonedMaze> {
    let compiled = compile(config)?;
    let seed = seed.unwrap_or(compiled.seed);
    info!(name = %config.name, seed, "generating maze");

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let maze = ZoneGrower::new(compiled.options)?.generate(
        compiled.grid,
        compiled.start,
        &compiled.table,
        &mut rng,
    )?;
    Ok(maze)
}
