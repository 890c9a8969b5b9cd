//! Coverage index: has a cell already been enclosed by a finalized
//! polygon of its color?
//!
//! This module defines the [`CoverageStrategy`] enum for selecting how the
//! question is answered and the [`CoverageIndex`] that answers it during a
//! trace.
//!
//! # Strategies
//!
//! - [`CoverageStrategy::ComponentMap`] marks every cell of a region in a
//!   bitmap when its polygon is finalized. Queries are O(1) and exact.
//! - [`CoverageStrategy::EdgeScan`] keeps no per-cell state. It searches
//!   outward from the queried cell (left/up, then right/down after the
//!   first color change) for a cell that shares an edge with an already
//!   finalized polygon of the same color. Each query costs
//!   O(cells x polygon points). A region whose outer boundary is only
//!   reachable from the queried cell by a path that changes direction
//!   more than once is not recognised, and gets traced a second time.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::types::{Cell, PolygonSet};

/// Selects how the coverage index decides that a cell is captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoverageStrategy {
    /// Visited-cell bitmap filled with the seed's 4-connected region at
    /// polygon finalization.
    #[default]
    ComponentMap,

    /// Search the finalized polygons' edges outward from the queried cell.
    EdgeScan,
}

impl CoverageStrategy {
    /// Short stable name, used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ComponentMap => "component-map",
            Self::EdgeScan => "edge-scan",
        }
    }
}

/// Which way an edge-scan search is currently walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    /// Default mode: step left, then up.
    LeftUp,
    /// Entered after the first color change: step right, then down.
    RightDown,
}

impl SearchDirection {
    /// The (at most two) next cells to visit from `cell`, in order.
    fn neighbors(self, cell: Cell) -> [Option<Cell>; 2] {
        match self {
            Self::LeftUp => [cell.left(), cell.up()],
            Self::RightDown => [Some(cell.right()), Some(cell.down())],
        }
    }
}

/// Answers capture queries for one trace run.
#[derive(Debug, Clone)]
pub struct CoverageIndex {
    strategy: CoverageStrategy,
    captured: Vec<bool>,
}

impl CoverageIndex {
    /// Create an index for `grid` with nothing captured.
    #[must_use]
    pub fn new(grid: &Grid, strategy: CoverageStrategy) -> Self {
        let captured = match strategy {
            CoverageStrategy::ComponentMap => vec![false; grid.rows() * grid.cols()],
            CoverageStrategy::EdgeScan => Vec::new(),
        };
        Self { strategy, captured }
    }

    /// The strategy this index was built with.
    #[must_use]
    pub const fn strategy(&self) -> CoverageStrategy {
        self.strategy
    }

    /// Has `cell` been enclosed by a finalized polygon whose color is the
    /// color of `reference`?
    ///
    /// Cells outside the grid are never captured.
    #[must_use]
    pub fn is_captured(
        &self,
        grid: &Grid,
        polygons: &PolygonSet,
        cell: Cell,
        reference: Cell,
        direction: SearchDirection,
    ) -> bool {
        match self.strategy {
            CoverageStrategy::ComponentMap => {
                let Some(color) = grid.color(reference) else {
                    return false;
                };
                grid.color(cell) == Some(color)
                    && grid.index(cell).is_some_and(|i| self.captured[i])
            }
            CoverageStrategy::EdgeScan => edge_scan(grid, polygons, cell, reference, direction),
        }
    }

    /// Record that the region containing `seed` has been closed by a
    /// finalized polygon.
    pub fn mark_region(&mut self, grid: &Grid, seed: Cell) {
        if self.strategy != CoverageStrategy::ComponentMap {
            return;
        }
        let Some(color) = grid.color(seed) else {
            return;
        };

        let mut pending = vec![seed];
        while let Some(cell) = pending.pop() {
            let Some(i) = grid.index(cell) else {
                continue;
            };
            if self.captured[i] || grid.color(cell) != Some(color) {
                continue;
            }
            self.captured[i] = true;
            pending.extend(
                [cell.left(), cell.up(), Some(cell.right()), Some(cell.down())]
                    .into_iter()
                    .flatten(),
            );
        }
    }
}

/// Edge-scan capture test.
///
/// Work-list form of the outward search: every cell reachable from `cell`
/// through same-color steps in the current direction is tested once. The
/// first step onto an opposite-colored cell in left/up mode schedules a
/// single restart from `reference` in right/down mode; opposite-colored
/// cells in right/down mode end that branch.
fn edge_scan(
    grid: &Grid,
    polygons: &PolygonSet,
    cell: Cell,
    reference: Cell,
    direction: SearchDirection,
) -> bool {
    let Some(color) = grid.color(reference) else {
        return false;
    };
    match grid.color(cell) {
        None => return false,
        Some(c) if c != color => {
            return direction == SearchDirection::LeftUp
                && edge_scan(grid, polygons, reference, reference, SearchDirection::RightDown);
        }
        Some(_) => {}
    }

    let mut visited = vec![false; grid.rows() * grid.cols()];
    let mut pending = vec![cell];
    let mut color_changed = false;
    if let Some(i) = grid.index(cell) {
        visited[i] = true;
    }

    while let Some(current) = pending.pop() {
        if polygons.borders(color, current) {
            return true;
        }
        for next in direction.neighbors(current).into_iter().flatten() {
            let Some(i) = grid.index(next) else {
                continue;
            };
            if grid.color(next) == Some(color) {
                if !visited[i] {
                    visited[i] = true;
                    pending.push(next);
                }
            } else if direction == SearchDirection::LeftUp {
                color_changed = true;
            }
        }
    }

    color_changed && edge_scan(grid, polygons, reference, reference, SearchDirection::RightDown)
}

/// Count the 4-connected same-color regions of `grid`.
#[must_use]
pub fn count_regions(grid: &Grid) -> usize {
    let mut index = CoverageIndex::new(grid, CoverageStrategy::ComponentMap);
    let empty = PolygonSet::new();
    let mut regions = 0;
    for (cell, _) in grid.cells() {
        if !index.is_captured(grid, &empty, cell, cell, SearchDirection::LeftUp) {
            index.mark_region(grid, cell);
            regions += 1;
        }
    }
    regions
}
