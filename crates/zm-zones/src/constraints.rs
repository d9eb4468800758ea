//! Zone constraints: per-zone budgets and growth policy.
//!
//! `ZoneConstraints` is the capability the grower consumes. Two
//! implementations are provided:
//! - `ZoneTable`: an explicit, validated per-zone table (optionally drawn at random)
//! - `FormulaConstraints`: budgets derived from a zone index formula

use std::ops::RangeInclusive;

use rand::Rng;

use crate::error::ConfigError;

/// Per-zone growth policy consumed by `ZoneGrower`.
pub trait ZoneConstraints {
    /// Number of zones the grower may create.
    fn max_zones(&self) -> usize;

    /// Global node cap across all zones.
    fn max_total_nodes(&self) -> usize;

    /// Node budget of `zone`.
    fn nodes_for_zone(&self, zone: usize) -> usize;

    /// Requested part count of `zone`.
    fn parts_for_zone(&self, zone: usize) -> usize;

    /// How many parts of later zones may be entered from `zone`.
    fn max_doors_out_for_zone(&self, zone: usize) -> usize;

    /// Corridor zones grow their parts from thread tips.
    fn is_corridor(&self, zone: usize) -> bool;

    /// Flexible zones may trade new parts for expansion and vice versa.
    fn is_flexible_parts(&self, zone: usize) -> bool;
}

/// One row of a constraints table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneSpec {
    pub nodes: usize,
    pub parts: usize,
    pub max_doors_out: usize,
    pub corridor: bool,
    pub flexible_parts: bool,
}

impl ZoneSpec {
    /// A zone with `nodes` budget and `parts` parts, unlimited doors out.
    pub fn new(nodes: usize, parts: usize) -> Self {
        Self {
            nodes,
            parts,
            max_doors_out: usize::MAX,
            corridor: false,
            flexible_parts: false,
        }
    }

    pub fn doors_out(mut self, max: usize) -> Self {
        self.max_doors_out = max;
        self
    }

    pub fn corridor(mut self) -> Self {
        self.corridor = true;
        self
    }

    pub fn flexible(mut self) -> Self {
        self.flexible_parts = true;
        self
    }
}

/// Validate one zone row against the structural rules.
pub fn validate_spec(zone: usize, spec: &ZoneSpec) -> Result<(), ConfigError> {
    if spec.parts == 0 {
        return Err(ConfigError::ZeroParts { zone });
    }
    if spec.parts > spec.nodes {
        return Err(ConfigError::PartsExceedNodes {
            zone,
            parts: spec.parts,
            nodes: spec.nodes,
        });
    }
    if zone == 0 && spec.parts != 1 {
        return Err(ConfigError::ZoneZeroParts { parts: spec.parts });
    }
    Ok(())
}

/// Validate any constraints implementation zone by zone.
pub fn validate_constraints<C>(constraints: &C) -> Result<(), ConfigError>
where
    C: ZoneConstraints + ?Sized,
{
    for zone in 0..constraints.max_zones() {
        validate_spec(zone, &spec_of(constraints, zone))?;
    }
    Ok(())
}

/// Read a zone's row back out of any constraints implementation.
pub fn spec_of<C>(constraints: &C, zone: usize) -> ZoneSpec
where
    C: ZoneConstraints + ?Sized,
{
    ZoneSpec {
        nodes: constraints.nodes_for_zone(zone),
        parts: constraints.parts_for_zone(zone),
        max_doors_out: constraints.max_doors_out_for_zone(zone),
        corridor: constraints.is_corridor(zone),
        flexible_parts: constraints.is_flexible_parts(zone),
    }
}

/// Explicit per-zone constraints table.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneTable {
    zones: Vec<ZoneSpec>,
    max_total_nodes: usize,
}

/// Builder for `ZoneTable`; each zone is validated as it is registered.
#[derive(Debug, Clone, Default)]
pub struct ZoneTableBuilder {
    zones: Vec<ZoneSpec>,
    max_total_nodes: Option<usize>,
}

impl ZoneTableBuilder {
    /// Register zone `index`; indices must arrive as 0, 1, 2, ...
    pub fn zone(mut self, index: usize, spec: ZoneSpec) -> Result<Self, ConfigError> {
        if index != self.zones.len() {
            return Err(ConfigError::NonSequentialZone {
                expected: self.zones.len(),
                got: index,
            });
        }
        validate_spec(index, &spec)?;
        self.zones.push(spec);
        Ok(self)
    }

    /// Register the next zone.
    pub fn push(self, spec: ZoneSpec) -> Result<Self, ConfigError> {
        let index = self.zones.len();
        self.zone(index, spec)
    }

    /// Cap the total node count below the sum of zone budgets.
    pub fn max_total_nodes(mut self, cap: usize) -> Self {
        self.max_total_nodes = Some(cap);
        self
    }

    pub fn build(self) -> ZoneTable {
        let budget: usize = self.zones.iter().map(|z| z.nodes).sum();
        ZoneTable {
            max_total_nodes: self.max_total_nodes.unwrap_or(budget),
            zones: self.zones,
        }
    }
}

/// Ranges used by `ZoneTable::randomized`.
#[derive(Debug, Clone)]
pub struct RandomTableParams {
    pub zones: usize,
    pub nodes: RangeInclusive<usize>,
    /// Roughly one part per this many nodes (zone 0 always gets one).
    pub nodes_per_part: usize,
    pub doors_out: RangeInclusive<usize>,
    pub corridor_chance: f64,
    pub flexible_chance: f64,
}

impl Default for RandomTableParams {
    fn default() -> Self {
        Self {
            zones: 4,
            nodes: 8..=24,
            nodes_per_part: 8,
            doors_out: 1..=3,
            corridor_chance: 0.25,
            flexible_chance: 0.5,
        }
    }
}

impl ZoneTable {
    pub fn builder() -> ZoneTableBuilder {
        ZoneTableBuilder::default()
    }

    /// Build a table from rows, validating each one.
    pub fn from_specs(specs: impl IntoIterator<Item = ZoneSpec>) -> Result<Self, ConfigError> {
        let mut builder = Self::builder();
        for spec in specs {
            builder = builder.push(spec)?;
        }
        Ok(builder.build())
    }

    /// Draw a table from `params` using the injected generator.
    pub fn randomized<R>(rng: &mut R, params: &RandomTableParams) -> Result<Self, ConfigError>
    where
        R: Rng + ?Sized,
    {
        if params.nodes.is_empty() || *params.nodes.start() == 0 {
            return Err(ConfigError::InvalidParameter {
                what: "node range must be non-empty and start above zero".to_string(),
            });
        }
        if params.doors_out.is_empty() {
            return Err(ConfigError::InvalidParameter {
                what: "doors-out range must be non-empty".to_string(),
            });
        }
        if params.nodes_per_part == 0 {
            return Err(ConfigError::InvalidParameter {
                what: "nodes_per_part must be at least 1".to_string(),
            });
        }

        let mut builder = Self::builder();
        for zone in 0..params.zones {
            let nodes = rng.gen_range(params.nodes.clone());
            let parts = if zone == 0 {
                1
            } else {
                rng.gen_range(1..=(nodes / params.nodes_per_part).max(1))
            };
            let doors_out = rng.gen_range(params.doors_out.clone());
            let mut spec = ZoneSpec::new(nodes, parts).doors_out(doors_out);
            if zone > 0 && rng.gen_bool(params.corridor_chance.clamp(0.0, 1.0)) {
                spec = spec.corridor();
            }
            if rng.gen_bool(params.flexible_chance.clamp(0.0, 1.0)) {
                spec = spec.flexible();
            }
            builder = builder.zone(zone, spec)?;
        }
        Ok(builder.build())
    }

    pub fn zones(&self) -> &[ZoneSpec] {
        &self.zones
    }

    pub fn zone(&self, zone: usize) -> Option<&ZoneSpec> {
        self.zones.get(zone)
    }
}

impl ZoneConstraints for ZoneTable {
    fn max_zones(&self) -> usize {
        self.zones.len()
    }

    fn max_total_nodes(&self) -> usize {
        self.max_total_nodes
    }

    fn nodes_for_zone(&self, zone: usize) -> usize {
        self.zones.get(zone).map_or(0, |z| z.nodes)
    }

    fn parts_for_zone(&self, zone: usize) -> usize {
        self.zones.get(zone).map_or(0, |z| z.parts)
    }

    fn max_doors_out_for_zone(&self, zone: usize) -> usize {
        self.zones.get(zone).map_or(0, |z| z.max_doors_out)
    }

    fn is_corridor(&self, zone: usize) -> bool {
        self.zones.get(zone).is_some_and(|z| z.corridor)
    }

    fn is_flexible_parts(&self, zone: usize) -> bool {
        self.zones.get(zone).is_some_and(|z| z.flexible_parts)
    }
}

/// Parameters of `FormulaConstraints`.
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaParams {
    pub zones: usize,
    pub base_nodes: usize,
    pub nodes_step: usize,
    pub nodes_per_part: usize,
    pub doors_out: usize,
    /// Every n-th zone (n > 0) is a corridor; zone 0 never is.
    pub corridor_every: Option<usize>,
    pub flexible_parts: bool,
    pub max_total_nodes: Option<usize>,
}

impl Default for FormulaParams {
    fn default() -> Self {
        Self {
            zones: 5,
            base_nodes: 10,
            nodes_step: 4,
            nodes_per_part: 6,
            doors_out: 2,
            corridor_every: None,
            flexible_parts: true,
            max_total_nodes: None,
        }
    }
}

/// Budgets that grow linearly with the zone index.
///
/// `nodes(z) = base_nodes + z * nodes_step`, parts are 1 for zone 0 and
/// `max(1, nodes(z) / nodes_per_part)` otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaConstraints {
    params: FormulaParams,
}

impl FormulaConstraints {
    pub fn new(params: FormulaParams) -> Result<Self, ConfigError> {
        if params.nodes_per_part == 0 {
            return Err(ConfigError::InvalidParameter {
                what: "nodes_per_part must be at least 1".to_string(),
            });
        }
        if params.corridor_every == Some(0) {
            return Err(ConfigError::InvalidParameter {
                what: "corridor_every must be at least 1".to_string(),
            });
        }
        let constraints = Self { params };
        validate_constraints(&constraints)?;
        Ok(constraints)
    }

    pub fn params(&self) -> &FormulaParams {
        &self.params
    }
}

impl ZoneConstraints for FormulaConstraints {
    fn max_zones(&self) -> usize {
        self.params.zones
    }

    fn max_total_nodes(&self) -> usize {
        let budget: usize = (0..self.params.zones).map(|z| self.nodes_for_zone(z)).sum();
        self.params.max_total_nodes.unwrap_or(budget)
    }

    fn nodes_for_zone(&self, zone: usize) -> usize {
        self.params.base_nodes + zone * self.params.nodes_step
    }

    fn parts_for_zone(&self, zone: usize) -> usize {
        if zone == 0 {
            1
        } else {
            (self.nodes_for_zone(zone) / self.params.nodes_per_part).max(1)
        }
    }

    fn max_doors_out_for_zone(&self, _zone: usize) -> usize {
        self.params.doors_out
    }

    fn is_corridor(&self, zone: usize) -> bool {
        match self.params.corridor_every {
            Some(n) if zone > 0 => zone % n == 0,
            _ => false,
        }
    }

    fn is_flexible_parts(&self, _zone: usize) -> bool {
        self.params.flexible_parts
    }
}
