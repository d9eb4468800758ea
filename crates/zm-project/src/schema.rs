//! Maze file schema definitions.

use serde::{Deserialize, Serialize};

/// Newest maze file version this crate reads and writes.
pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MazeConfig {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub seed: u64,
    pub grid: GridDef,
    pub start: PositionDef,
    #[serde(default)]
    pub growth: GrowthDef,
    /// Global node cap; defaults to the sum of zone budgets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_total_nodes: Option<i64>,
    #[serde(default)]
    pub zones: Vec<ZoneDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<PlacementDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GridDef {
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocked: Vec<PositionDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PositionDef {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GrowthDef {
    #[serde(default = "default_weight_factor")]
    pub weight_factor: f64,
}

impl Default for GrowthDef {
    fn default() -> Self {
        Self {
            weight_factor: default_weight_factor(),
        }
    }
}

fn default_weight_factor() -> f64 {
    zm_zones::DEFAULT_WEIGHT_FACTOR
}

/// One zone row. Budgets are signed so negative input is reported, not wrapped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ZoneDef {
    pub nodes: i64,
    #[serde(default = "default_parts")]
    pub parts: i64,
    /// Unlimited when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_doors_out: Option<i64>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub corridor: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub flexible_parts: bool,
}

fn default_parts() -> i64 {
    1
}

fn is_false(v: &bool) -> bool {
    !*v
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacementDef {
    /// Score used to pick each zone's key location.
    #[serde(default)]
    pub keys_score: ScoreDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treasures: Option<TreasureDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScoreDef {
    #[default]
    DeadEnd,
    Entry,
    Exit,
    Combined,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScopeDef {
    #[default]
    Global,
    Zone,
    Part,
}

/// Treasure placement; exactly one of `count` and `ratio` is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreasureDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    #[serde(default)]
    pub scope: ScopeDef,
    #[serde(default = "default_treasure_score")]
    pub score: ScoreDef,
}

fn default_treasure_score() -> ScoreDef {
    ScoreDef::Combined
}
