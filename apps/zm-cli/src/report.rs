//! Serializable summaries printed by the CLI.

use std::collections::BTreeMap;

use serde::Serialize;
use zm_core::{NodeId, PartId, Position, ZoneId};
use zm_score::{Region, RegionSpread, ScoreMap, SolutionScoring};
use zm_zones::ZonedMaze;

#[derive(Debug, Serialize)]
pub struct PartReport {
    pub part: PartId,
    pub start: Position,
    pub nodes: usize,
}

#[derive(Debug, Serialize)]
pub struct ZoneReport {
    pub zone: ZoneId,
    pub nodes: usize,
    pub doors_out: usize,
    pub open_nodes: usize,
    pub parts: Vec<PartReport>,
}

#[derive(Debug, Serialize)]
pub struct MazeReport {
    pub name: String,
    pub seed: u64,
    pub nodes: usize,
    pub zones: Vec<ZoneReport>,
}

impl MazeReport {
    pub fn new(name: &str, seed: u64, maze: &ZonedMaze) -> Self {
        let zones = maze
            .zones()
            .iter()
            .map(|z| ZoneReport {
                zone: z.id,
                nodes: z.node_count(),
                doors_out: maze.doors_out(z.id),
                open_nodes: z.open_nodes().len(),
                parts: z
                    .parts()
                    .iter()
                    .map(|p| PartReport {
                        part: p.id,
                        start: position(maze, p.start),
                        nodes: p.len(),
                    })
                    .collect(),
            })
            .collect();
        Self {
            name: name.to_string(),
            seed,
            nodes: maze.node_count(),
            zones,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScoreRow {
    pub node: NodeId,
    pub position: Position,
    pub zone: ZoneId,
    pub part: PartId,
    pub dead_end: f64,
    pub entry: f64,
    pub exit: f64,
    pub entry_path: bool,
    pub exit_path: bool,
}

pub fn score_rows(maze: &ZonedMaze, scores: &ScoreMap) -> Vec<ScoreRow> {
    scores
        .iter()
        .filter_map(|s| {
            let node = maze.node(s.node)?;
            Some(ScoreRow {
                node: s.node,
                position: node.position,
                zone: node.zone,
                part: node.part,
                dead_end: s.dead_end_score,
                entry: s.entry_distance_score,
                exit: s.exit_distance_score,
                entry_path: s.belongs_to_entry_path,
                exit_path: s.belongs_to_exit_path,
            })
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct StopRow {
    pub zone: ZoneId,
    pub node: NodeId,
    pub position: Position,
}

#[derive(Debug, Serialize)]
pub struct SolutionReport {
    pub stops: Vec<StopRow>,
    pub path_length: usize,
    pub shortest_length: usize,
    pub redundancy: f64,
    pub concentration_index: f64,
    pub detour_ratio: f64,
    pub visit_distribution: BTreeMap<usize, f64>,
    pub path: Vec<Position>,
}

impl SolutionReport {
    pub fn new(maze: &ZonedMaze, solution: &SolutionScoring) -> Self {
        Self {
            stops: solution
                .stops
                .iter()
                .map(|s| StopRow {
                    zone: s.zone,
                    node: s.node,
                    position: position(maze, s.node),
                })
                .collect(),
            path_length: solution.path.len(),
            shortest_length: solution.shortest_path.len(),
            redundancy: solution.redundancy,
            concentration_index: solution.concentration_index,
            detour_ratio: solution.detour_ratio,
            visit_distribution: solution.visit_distribution.clone(),
            path: solution.path.iter().map(|&n| position(maze, n)).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SpreadRow {
    pub region: String,
    pub min_distance: usize,
    pub nodes: Vec<Position>,
}

pub fn spread_rows(maze: &ZonedMaze, spreads: &[RegionSpread]) -> Vec<SpreadRow> {
    spreads
        .iter()
        .map(|s| SpreadRow {
            region: region_label(s.region),
            min_distance: s.result.min_distance,
            nodes: s.result.nodes.iter().map(|&n| position(maze, n)).collect(),
        })
        .collect()
}

fn region_label(region: Region) -> String {
    match region {
        Region::Maze => "maze".to_string(),
        Region::Zone(z) => format!("zone {z}"),
        Region::Part(z, p) => format!("zone {z} part {p}"),
    }
}

fn position(maze: &ZonedMaze, node: NodeId) -> Position {
    maze.node(node).map(|n| n.position).unwrap_or_default()
}

/// Character map: `#` blocked, `.` free, zone digits/letters for nodes,
/// `@` for the start and `*` for highlighted nodes.
pub fn render_ascii(maze: &ZonedMaze, highlight: &[NodeId]) -> String {
    const GLYPHS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let graph = maze.graph();
    let mut out = String::new();
    for y in 0..graph.height() as i32 {
        for x in 0..graph.width() as i32 {
            let pos = Position::new(x, y);
            let ch = match graph.node_at(pos) {
                Some(id) if Some(id) == maze.start() => '@',
                Some(id) if highlight.contains(&id) => '*',
                Some(id) => maze
                    .node(id)
                    .and_then(|n| GLYPHS.get(n.zone.slot()))
                    .map_or('+', |&b| b as char),
                None if graph.is_valid_position(pos) => '.',
                None => '#',
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}
