//! Partition and budget checks over a finished maze.

use std::collections::HashSet;

use zm_core::{NodeId, ZoneId};
use zm_graph::validate_structure;

use crate::constraints::ZoneConstraints;
use crate::error::{ZoneError, ZoneResult};
use crate::zone::ZonedMaze;

fn violation(node: Option<NodeId>, what: impl Into<String>) -> ZoneError {
    ZoneError::Invariant {
        node,
        what: what.into(),
    }
}

impl ZonedMaze {
    /// Number of parts of later zones entered from `zone`.
    pub fn doors_out(&self, zone: ZoneId) -> usize {
        self.parts()
            .filter(|(z, _)| z.id > zone)
            .filter(|(_, p)| {
                self.graph
                    .in_edges(p.start)
                    .iter()
                    .any(|&n| self.graph.node(n).is_some_and(|node| node.zone == zone))
            })
            .count()
    }

    /// Verify the ownership partition and the constraint limits.
    ///
    /// Checks that every node sits in exactly one part of its recorded zone,
    /// zone 0 has a single part, parts are non-empty and contain their start,
    /// every later part has exactly one door in (its start), budgets and
    /// doors-out limits hold, and the graph itself is consistent.
    pub fn check_invariants<C>(&self, constraints: &C) -> ZoneResult<()>
    where
        C: ZoneConstraints + ?Sized,
    {
        validate_structure(&self.graph)?;

        if let Some(zone0) = self.zones.first() {
            if zone0.parts.len() != 1 {
                return Err(violation(None, "zone 0 must have exactly one part"));
            }
        }

        let mut seen: HashSet<NodeId> = HashSet::new();
        for (index, zone) in self.zones.iter().enumerate() {
            if zone.id.slot() != index {
                return Err(violation(None, format!("zone {} stored at {index}", zone.id)));
            }
            let budget = constraints.nodes_for_zone(index);
            if zone.node_count() > budget {
                return Err(violation(
                    None,
                    format!(
                        "zone {index} holds {} nodes over its budget {budget}",
                        zone.node_count()
                    ),
                ));
            }
            let doors = self.doors_out(zone.id);
            let max_doors = constraints.max_doors_out_for_zone(index);
            if doors > max_doors {
                return Err(violation(
                    None,
                    format!("zone {index} has {doors} doors out, limit {max_doors}"),
                ));
            }

            for (part_index, part) in zone.parts.iter().enumerate() {
                if part.id.slot() != part_index {
                    return Err(violation(Some(part.start), "part id does not match its slot"));
                }
                if part.is_empty() || !part.contains(part.start) {
                    return Err(violation(Some(part.start), "part does not contain its start"));
                }
                for &id in part.nodes() {
                    if !seen.insert(id) {
                        return Err(violation(Some(id), "node belongs to more than one part"));
                    }
                    let Some(node) = self.graph.node(id) else {
                        return Err(violation(Some(id), "part lists an unknown node"));
                    };
                    if node.zone != zone.id || node.part != part.id {
                        return Err(violation(Some(id), "node ownership disagrees with its part"));
                    }
                    let doors_in = node
                        .in_edges()
                        .iter()
                        .filter(|&&n| self.graph.node(n).is_some_and(|m| m.zone < zone.id))
                        .count();
                    let expected = usize::from(index > 0 && id == part.start);
                    if doors_in != expected {
                        return Err(violation(
                            Some(id),
                            format!("node has {doors_in} doors in, expected {expected}"),
                        ));
                    }
                }
            }
        }

        if seen.len() != self.graph.node_count() {
            return Err(violation(
                None,
                format!(
                    "{} of {} nodes are assigned to parts",
                    seen.len(),
                    self.graph.node_count()
                ),
            ));
        }
        if self.graph.node_count() > constraints.max_total_nodes() {
            return Err(violation(None, "node cap exceeded"));
        }
        Ok(())
    }
}
