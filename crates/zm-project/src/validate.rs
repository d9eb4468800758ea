//! Maze file validation logic.

use std::collections::HashSet;

use zm_zones::ConfigError;

use crate::schema::{LATEST_VERSION, MazeConfig, PositionDef, TreasureDef, ZoneDef};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Duplicate blocked cell: ({x}, {y})")]
    DuplicateBlocked { x: i32, y: i32 },

    #[error("A maze needs at least one zone")]
    NoZones,

    #[error("Zone constraints: {0}")]
    Zone(#[from] ConfigError),
}

pub fn validate_config(config: &MazeConfig) -> Result<(), ValidationError> {
    if config.version == 0 || config.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    let grid = &config.grid;
    if grid.width == 0 || grid.height == 0 {
        return Err(ValidationError::InvalidValue {
            field: "grid".to_string(),
            value: format!("{}x{}", grid.width, grid.height),
            reason: "width and height must be positive".to_string(),
        });
    }

    let mut blocked = HashSet::new();
    for cell in &grid.blocked {
        if !inside(config, *cell) {
            return Err(ValidationError::InvalidValue {
                field: "grid.blocked".to_string(),
                value: format!("({}, {})", cell.x, cell.y),
                reason: "outside the grid".to_string(),
            });
        }
        if !blocked.insert(*cell) {
            return Err(ValidationError::DuplicateBlocked {
                x: cell.x,
                y: cell.y,
            });
        }
    }

    let start = config.start;
    if !inside(config, start) || blocked.contains(&start) {
        return Err(ValidationError::InvalidValue {
            field: "start".to_string(),
            value: format!("({}, {})", start.x, start.y),
            reason: "must be an unblocked cell inside the grid".to_string(),
        });
    }

    let factor = config.growth.weight_factor;
    if !factor.is_finite() || factor <= 0.0 {
        return Err(ConfigError::InvalidWeightFactor { value: factor }.into());
    }

    if config.zones.is_empty() {
        return Err(ValidationError::NoZones);
    }
    for (index, zone) in config.zones.iter().enumerate() {
        validate_zone(index, zone)?;
    }

    if let Some(cap) = config.max_total_nodes {
        if cap < 0 {
            return Err(ValidationError::InvalidValue {
                field: "max_total_nodes".to_string(),
                value: cap.to_string(),
                reason: "must be non-negative".to_string(),
            });
        }
    }

    if let Some(treasures) = config.placement.as_ref().and_then(|p| p.treasures.as_ref()) {
        validate_treasures(treasures)?;
    }

    Ok(())
}

fn inside(config: &MazeConfig, pos: PositionDef) -> bool {
    pos.x >= 0
        && pos.y >= 0
        && (pos.x as u32) < config.grid.width
        && (pos.y as u32) < config.grid.height
}

fn validate_zone(index: usize, zone: &ZoneDef) -> Result<(), ConfigError> {
    let budgets = [
        ("nodes", Some(zone.nodes)),
        ("parts", Some(zone.parts)),
        ("max_doors_out", zone.max_doors_out),
    ];
    for (field, value) in budgets {
        if let Some(value) = value.filter(|v| *v < 0) {
            return Err(ConfigError::NegativeBudget {
                zone: index,
                field,
                value,
            });
        }
    }
    Ok(())
}

fn validate_treasures(treasures: &TreasureDef) -> Result<(), ValidationError> {
    match (treasures.count, treasures.ratio) {
        (Some(count), None) if count < 0 => Err(ValidationError::InvalidValue {
            field: "placement.treasures.count".to_string(),
            value: count.to_string(),
            reason: "must be non-negative".to_string(),
        }),
        (None, Some(ratio)) if !ratio.is_finite() || ratio < 0.0 => {
            Err(ValidationError::InvalidValue {
                field: "placement.treasures.ratio".to_string(),
                value: ratio.to_string(),
                reason: "must be finite and non-negative".to_string(),
            })
        }
        (Some(_), None) | (None, Some(_)) => Ok(()),
        _ => Err(ValidationError::InvalidValue {
            field: "placement.treasures".to_string(),
            value: "count/ratio".to_string(),
            reason: "set exactly one of count and ratio".to_string(),
        }),
    }
}
