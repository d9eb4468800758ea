//! Randomized zone/part growth over a grid-graph.
//!
//! Growth proceeds zone by zone. Each step either opens a new part of the
//! current zone from a node of an earlier zone (a door), or expands the
//! current zone from one of its own nodes. Finished zones hand their remaining
//! nodes to a depth-ordered entry pool from which later zones open parts.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info, info_span, warn};
use zm_core::{NodeId, PartId, Position, ZoneId};
use zm_graph::{GraphError, GridGraph, Node, Ownership};

use crate::constraints::{ZoneConstraints, spec_of, validate_constraints};
use crate::error::{
    ConfigError, EXHAUSTED_EXPAND_HINT, EXHAUSTED_NEW_PART_HINT, GrowthAction, ZoneError,
    ZoneResult,
};
use crate::generation::{GenerationState, PartGen, PoolEntry};
use crate::sampling::{DEFAULT_WEIGHT_FACTOR, sample_decayed_index};
use crate::zone::ZonedMaze;

/// Tunables of the grower that are not part of the zone constraints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowerOptions {
    /// Decay factor for picking part-entry nodes by depth.
    pub weight_factor: f64,
}

impl Default for GrowerOptions {
    fn default() -> Self {
        Self {
            weight_factor: DEFAULT_WEIGHT_FACTOR,
        }
    }
}

impl GrowerOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.weight_factor.is_finite() || self.weight_factor <= 0.0 {
            return Err(ConfigError::InvalidWeightFactor {
                value: self.weight_factor,
            });
        }
        Ok(())
    }
}

/// Grows zones and parts over a grid-graph.
#[derive(Debug, Clone, Default)]
pub struct ZoneGrower {
    options: GrowerOptions,
}

/// A chosen parent and what growing from it means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pick {
    parent: NodeId,
    action: GrowthAction,
}

/// Outcome of looking for child cells around a parent.
enum Candidates {
    /// No free cell at all: the parent is dead for good.
    Dead,
    /// Free cells exist but none can grow further.
    Cramped,
    Open(Vec<Position>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Done,
}

impl ZoneGrower {
    pub fn new(options: GrowerOptions) -> ZoneResult<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &GrowerOptions {
        &self.options
    }

    /// Grow zones from `start` until the node cap is reached or the last
    /// zone is full.
    ///
    /// # Errors
    ///
    /// - `ZoneError::Configuration` if the constraints break the structural rules
    /// - `ZoneError::InvalidStart` if `start` is not a valid grid position
    /// - `ZoneError::GenerationExhausted` if a zone can neither open a part nor
    ///   expand; the constraints are infeasible for this grid and seed
    pub fn generate<C, R>(
        &self,
        graph: GridGraph,
        start: Position,
        constraints: &C,
        rng: &mut R,
    ) -> ZoneResult<ZonedMaze>
    where
        C: ZoneConstraints + ?Sized,
        R: Rng + ?Sized,
    {
        self.options.validate()?;
        validate_constraints(constraints)?;
        if !graph.is_valid_position(start) {
            return Err(ZoneError::InvalidStart(start));
        }

        let max_zones = constraints.max_zones();
        let max_nodes = constraints.max_total_nodes();
        if max_zones == 0 || max_nodes == 0 {
            return Ok(ZonedMaze {
                graph,
                zones: Vec::new(),
                start: None,
            });
        }

        let span = info_span!("zone_growth", max_zones, max_nodes);
        let _enter = span.enter();

        let mut run = GrowthRun {
            graph,
            constraints,
            rng,
            weight_factor: self.options.weight_factor,
            state: GenerationState::default(),
        };
        run.plant_root(start)?;
        let mut flow = run.after_growth();
        while flow == Flow::Continue {
            flow = run.step()?;
        }
        Ok(run.finish())
    }
}

struct GrowthRun<'a, C: ?Sized, R: ?Sized> {
    graph: GridGraph,
    constraints: &'a C,
    rng: &'a mut R,
    weight_factor: f64,
    state: GenerationState,
}

impl<C, R> GrowthRun<'_, C, R>
where
    C: ZoneConstraints + ?Sized,
    R: Rng + ?Sized,
{
    fn node(&self, id: NodeId) -> ZoneResult<&Node> {
        self.graph
            .node(id)
            .ok_or(ZoneError::Graph(GraphError::UnknownNode { node: id }))
    }

    /// Create the start node as zone 0 / part 0.
    fn plant_root(&mut self, start: Position) -> ZoneResult<()> {
        let zone = self.state.begin_zone(spec_of(self.constraints, 0));
        let part = PartId::from_index(0);
        let root = self
            .graph
            .create_node(start, None, Ownership::new(zone, part))?;

        let current = self.state.current_mut();
        current.parts.push(PartGen {
            id: part,
            start: root,
            nodes: vec![root],
        });
        current.available.push(root);
        current.node_count += 1;
        self.state.total_nodes += 1;
        debug!(node = %root, pos = %start, "planted root");
        Ok(())
    }

    /// One growth step: pick a parent, then grow a child or retire the parent.
    fn step(&mut self) -> ZoneResult<Flow> {
        let pick = self.pick_parent()?;
        let parent = self.node(pick.parent)?;
        let (parent_zone, parent_pos) = (parent.zone, parent.position);

        match self.candidates(parent_pos) {
            Candidates::Dead => {
                debug!(node = %pick.parent, "parent has no free cell; discarding");
                self.state.discard(pick.parent, parent_zone);
                Ok(Flow::Continue)
            }
            Candidates::Cramped => {
                warn!(node = %pick.parent, "parent has no growable cell; setting aside");
                self.state.set_aside(pick.parent, parent_zone);
                Ok(Flow::Continue)
            }
            Candidates::Open(cells) => {
                let cell = cells[self.rng.gen_range(0..cells.len())];
                self.grow(pick, parent_zone, cell)?;
                Ok(self.after_growth())
            }
        }
    }

    /// Choose the next parent, honouring part requirements and the
    /// flexible-parts fallbacks.
    fn pick_parent(&mut self) -> ZoneResult<Pick> {
        let current = self.state.current();
        let zone = current.id;
        let flexible = current.spec.flexible_parts;

        if current.needs_parts() {
            if let Some(parent) = self.pick_entry() {
                return Ok(Pick {
                    parent,
                    action: GrowthAction::NewPart,
                });
            }
            if flexible {
                if let Some(parent) = self.pick_expansion() {
                    warn!(zone = %zone, "no entry node left; expanding instead of opening a part");
                    return Ok(Pick {
                        parent,
                        action: GrowthAction::Expand,
                    });
                }
            }
            return Err(ZoneError::GenerationExhausted {
                zone,
                action: GrowthAction::NewPart,
                hint: EXHAUSTED_NEW_PART_HINT,
            });
        }

        if let Some(parent) = self.pick_expansion() {
            return Ok(Pick {
                parent,
                action: GrowthAction::Expand,
            });
        }
        if flexible {
            if let Some(parent) = self.pick_entry() {
                warn!(zone = %zone, "zone pool empty; opening an extra part");
                return Ok(Pick {
                    parent,
                    action: GrowthAction::NewPart,
                });
            }
        }
        Err(ZoneError::GenerationExhausted {
            zone,
            action: GrowthAction::Expand,
            hint: EXHAUSTED_EXPAND_HINT,
        })
    }

    /// Depth-biased pick from the global entry pool.
    fn pick_entry(&mut self) -> Option<NodeId> {
        let len = self.state.global.len();
        if len == 0 {
            return None;
        }
        let index = sample_decayed_index(self.rng, len, self.weight_factor);
        self.state.global.get(index).map(|e| e.node)
    }

    /// Pick from the current zone's pool; corridor zones prefer thread tips.
    fn pick_expansion(&mut self) -> Option<NodeId> {
        let current = self.state.current();
        if current.available.is_empty() {
            return None;
        }
        if current.spec.corridor {
            let tips: Vec<NodeId> = current
                .available
                .iter()
                .copied()
                .filter(|&n| self.graph.out_degree(n) <= 1)
                .collect();
            if let Some(&tip) = tips.choose(self.rng) {
                return Some(tip);
            }
        }
        current.available.choose(self.rng).copied()
    }

    fn candidates(&self, parent_pos: Position) -> Candidates {
        let free = self.graph.free_adjacent_positions(parent_pos);
        if free.is_empty() {
            return Candidates::Dead;
        }
        if self.state.current().spec.flexible_parts {
            return Candidates::Open(free);
        }
        let growable = self.graph.free_adjacent_positions_with_growth(parent_pos);
        if growable.is_empty() {
            Candidates::Cramped
        } else {
            Candidates::Open(growable)
        }
    }

    /// Create the child node at `cell` and book it into the current zone.
    fn grow(&mut self, pick: Pick, parent_zone: ZoneId, cell: Position) -> ZoneResult<()> {
        let zone = self.state.current().id;
        let part = match pick.action {
            GrowthAction::Expand => self.node(pick.parent)?.part,
            GrowthAction::NewPart => self.state.current().next_part_id(),
        };

        let child = self
            .graph
            .create_node(cell, Some(pick.parent), Ownership::new(zone, part))?;
        self.graph.connect(pick.parent, child)?;

        let current = self.state.current_mut();
        match pick.action {
            GrowthAction::Expand => {
                let Some(members) = current.parts.get_mut(part.slot()) else {
                    return Err(ZoneError::Invariant {
                        node: Some(pick.parent),
                        what: format!("expansion parent belongs to unknown part {part}"),
                    });
                };
                members.nodes.push(child);
            }
            GrowthAction::NewPart => {
                current.parts.push(PartGen {
                    id: part,
                    start: child,
                    nodes: vec![child],
                });
            }
        }
        current.available.push(child);
        current.node_count += 1;
        self.state.total_nodes += 1;
        debug!(
            zone = %zone,
            part = %part,
            node = %child,
            parent = %pick.parent,
            pos = %cell,
            action = %pick.action,
            "grew node"
        );

        if pick.action == GrowthAction::NewPart && self.state.record_door(parent_zone) {
            self.state.set_aside.retain(|&n| {
                self.graph.node(n).is_some_and(|node| node.zone != parent_zone)
            });
            debug!(zone = %parent_zone, "doors out exhausted; zone closed to new parts");
        }
        Ok(())
    }

    /// Decide whether to stop, move to the next zone, or keep growing.
    fn after_growth(&mut self) -> Flow {
        if self.state.total_nodes >= self.constraints.max_total_nodes() {
            info!(nodes = self.state.total_nodes, "node cap reached");
            return Flow::Done;
        }
        if !self.state.current().is_full() {
            return Flow::Continue;
        }

        let finished = self.state.current().id;
        info!(
            zone = %finished,
            nodes = self.state.current().node_count,
            parts = self.state.current().parts.len(),
            "zone complete"
        );
        if finished.slot() + 1 >= self.constraints.max_zones() {
            return Flow::Done;
        }
        self.advance_zone(finished);
        Flow::Continue
    }

    /// Hand the finished zone's leftovers to the entry pool and start the next zone.
    fn advance_zone(&mut self, finished: ZoneId) {
        let carry = !self.state.current().doors_exhausted();
        if carry {
            let leftovers = self.state.current().available.clone();
            for node in leftovers {
                if let Some(n) = self.graph.node(node) {
                    self.state.global.insert(PoolEntry {
                        depth: n.depth,
                        node,
                        zone: finished,
                    });
                }
            }
        }

        let set_aside = std::mem::take(&mut self.state.set_aside);
        for node in set_aside {
            let Some(n) = self.graph.node(node) else {
                continue;
            };
            let (zone, depth) = (n.zone, n.depth);
            // Back onto its zone's retained list; only the growing zone expands from it.
            if let Some(owner) = self.state.zone_mut(zone) {
                if !owner.available.contains(&node) {
                    owner.available.push(node);
                }
            }
            let open = self
                .state
                .zone(zone)
                .is_some_and(|z| !z.doors_exhausted());
            if open && self.graph.has_free_adjacent(node) {
                self.state.global.insert(PoolEntry { depth, node, zone });
            }
        }

        let next = self.state.begin_zone(spec_of(self.constraints, finished.slot() + 1));
        debug!(zone = %next, pool = self.state.global.len(), "zone started");
    }

    /// Final cleanup and freeze into read-only output.
    fn finish(self) -> ZonedMaze {
        let GrowthRun {
            graph, mut state, ..
        } = self;
        for zone in &mut state.zones {
            zone.available.retain(|&n| graph.has_free_adjacent(n));
        }
        info!(
            nodes = graph.node_count(),
            zones = state.zones.len(),
            "growth finished"
        );
        let zones = state.into_zones();
        let start = zones
            .first()
            .and_then(|z| z.parts.first())
            .map(|p| p.start);
        ZonedMaze {
            graph,
            zones,
            start,
        }
    }
}
