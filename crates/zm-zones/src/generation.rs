//! Working state used only while zones are growing.
//!
//! These accumulators are mutable and half-built by nature. `GenerationState`
//! is owned by a single `generate` call and is turned into read-only `Zone` /
//! `Part` values once growth stops.

use zm_core::{NodeId, PartId, ZoneId};

use crate::constraints::ZoneSpec;
use crate::zone::{Part, Zone};

#[derive(Debug, Clone)]
pub(crate) struct PartGen {
    pub id: PartId,
    pub start: NodeId,
    pub nodes: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub(crate) struct ZoneGen {
    pub id: ZoneId,
    pub spec: ZoneSpec,
    pub parts: Vec<PartGen>,
    /// Zone nodes that may still be expanded from.
    pub available: Vec<NodeId>,
    pub node_count: usize,
    pub doors_out: usize,
}

impl ZoneGen {
    fn new(id: ZoneId, spec: ZoneSpec) -> Self {
        Self {
            id,
            spec,
            parts: Vec::new(),
            available: Vec::new(),
            node_count: 0,
            doors_out: 0,
        }
    }

    pub fn needs_parts(&self) -> bool {
        self.parts.len() < self.spec.parts
    }

    pub fn is_full(&self) -> bool {
        self.node_count >= self.spec.nodes
    }

    pub fn doors_exhausted(&self) -> bool {
        self.doors_out >= self.spec.max_doors_out
    }

    pub fn next_part_id(&self) -> PartId {
        PartId::from_usize(self.parts.len())
    }

    fn into_zone(self) -> Zone {
        Zone {
            id: self.id,
            parts: self
                .parts
                .into_iter()
                .map(|p| Part {
                    id: p.id,
                    start: p.start,
                    nodes: p.nodes,
                })
                .collect(),
            open_nodes: self.available,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PoolEntry {
    pub depth: u32,
    pub node: NodeId,
    pub zone: ZoneId,
}

/// Nodes from finished zones that may open a part in a later zone,
/// ordered by (depth, node id).
#[derive(Debug, Clone, Default)]
pub(crate) struct EntryPool {
    entries: Vec<PoolEntry>,
}

impl EntryPool {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<PoolEntry> {
        self.entries.get(index).copied()
    }

    pub fn insert(&mut self, entry: PoolEntry) {
        let key = (entry.depth, entry.node);
        if let Err(at) = self.entries.binary_search_by_key(&key, |e| (e.depth, e.node)) {
            self.entries.insert(at, entry);
        }
    }

    pub fn remove(&mut self, node: NodeId) {
        self.entries.retain(|e| e.node != node);
    }

    pub fn remove_zone(&mut self, zone: ZoneId) {
        self.entries.retain(|e| e.zone != zone);
    }
}

/// All mutable bookkeeping of one growth run.
#[derive(Debug, Default)]
pub(crate) struct GenerationState {
    pub(crate) zones: Vec<ZoneGen>,
    pub(crate) global: EntryPool,
    /// Parents with free cells but no growable candidate; retried once the
    /// next zone begins.
    pub(crate) set_aside: Vec<NodeId>,
    pub(crate) total_nodes: usize,
}

impl GenerationState {
    pub(crate) fn begin_zone(&mut self, spec: ZoneSpec) -> ZoneId {
        let id = ZoneId::from_usize(self.zones.len());
        self.zones.push(ZoneGen::new(id, spec));
        id
    }

    /// The zone currently growing.
    ///
    /// Growth always begins zone 0 before asking for it.
    pub(crate) fn current(&self) -> &ZoneGen {
        self.zones.last().expect("a zone has been started")
    }

    pub(crate) fn current_mut(&mut self) -> &mut ZoneGen {
        self.zones.last_mut().expect("a zone has been started")
    }

    pub(crate) fn zone(&self, id: ZoneId) -> Option<&ZoneGen> {
        self.zones.get(id.slot())
    }

    pub(crate) fn zone_mut(&mut self, id: ZoneId) -> Option<&mut ZoneGen> {
        self.zones.get_mut(id.slot())
    }

    /// Drop a node from every pool, for good.
    pub(crate) fn discard(&mut self, node: NodeId, zone: ZoneId) {
        self.global.remove(node);
        self.set_aside.retain(|&n| n != node);
        if let Some(z) = self.zone_mut(zone) {
            z.available.retain(|&n| n != node);
        }
    }

    /// Take a node out of the pools until the next zone begins.
    pub(crate) fn set_aside(&mut self, node: NodeId, zone: ZoneId) {
        self.global.remove(node);
        if let Some(z) = self.zone_mut(zone) {
            z.available.retain(|&n| n != node);
        }
        if !self.set_aside.contains(&node) {
            self.set_aside.push(node);
        }
    }

    /// Count a door out of `zone`, closing the zone once its limit is hit.
    pub(crate) fn record_door(&mut self, zone: ZoneId) -> bool {
        let Some(z) = self.zone_mut(zone) else {
            return false;
        };
        z.doors_out += 1;
        let exhausted = z.doors_exhausted();
        if exhausted {
            self.global.remove_zone(zone);
        }
        exhausted
    }

    pub(crate) fn into_zones(self) -> Vec<Zone> {
        self.zones.into_iter().map(ZoneGen::into_zone).collect()
    }
}
