//! Grid builder.

use std::collections::{HashMap, HashSet};
use zm_core::Position;

use crate::error::{GraphError, GraphResult};
use crate::graph::GridGraph;

/// Builder for a grid's shape.
///
/// Set the dimensions and any blocked cells, then call `build()` to obtain an
/// empty `GridGraph` ready for growth.
#[derive(Debug, Clone, Default)]
pub struct GridBuilder {
    width: u32,
    height: u32,
    blocked: HashSet<Position>,
}

impl GridBuilder {
    /// Create a new builder for a `width` x `height` grid.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            blocked: HashSet::new(),
        }
    }

    /// Mark a single cell as blocked.
    pub fn block(mut self, pos: Position) -> Self {
        self.blocked.insert(pos);
        self
    }

    /// Mark every cell in `positions` as blocked.
    pub fn block_all(mut self, positions: impl IntoIterator<Item = Position>) -> Self {
        self.blocked.extend(positions);
        self
    }

    /// Block the inclusive rectangle spanned by two corners.
    pub fn block_rect(mut self, a: Position, b: Position) -> Self {
        for x in a.x.min(b.x)..=a.x.max(b.x) {
            for y in a.y.min(b.y)..=a.y.max(b.y) {
                self.blocked.insert(Position::new(x, y));
            }
        }
        self
    }

    /// Validate the shape and return an empty grid-graph.
    pub fn build(self) -> GraphResult<GridGraph> {
        if self.width == 0 || self.height == 0 {
            return Err(GraphError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        for &pos in &self.blocked {
            let inside = pos.x >= 0
                && pos.y >= 0
                && (pos.x as u32) < self.width
                && (pos.y as u32) < self.height;
            if !inside {
                return Err(GraphError::InvalidPosition { pos });
            }
        }

        Ok(GridGraph {
            width: self.width,
            height: self.height,
            blocked: self.blocked,
            nodes: Vec::new(),
            edges: Vec::new(),
            occupied: HashMap::new(),
        })
    }
}

impl GridGraph {
    /// An empty grid with no blocked cells.
    pub fn open(width: u32, height: u32) -> GraphResult<Self> {
        GridBuilder::new(width, height).build()
    }
}
