//! Region scanner: finds the seed cell of every region and walks it.
//!
//! Rows are scanned top to bottom and columns left to right. Each row
//! starts with the color of its leftmost cell as the *color of interest*.
//! A cell of that color is examined: unless the coverage index already
//! considers it captured, a walk is seeded there. After every examined
//! cell the color of interest flips, so every run start in the row is
//! examined and the rest of each run is skipped.

use tracing::debug;

use crate::coverage::{CoverageIndex, CoverageStrategy, SearchDirection};
use crate::grid::Grid;
use crate::types::{Color, Polygon, PolygonSet, TraceError};
use crate::walker;

/// Counters collected while scanning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Cells examined (matched the color of interest).
    pub coverage_queries: usize,
    /// Examined cells that were already captured.
    pub captured_hits: usize,
    /// Saddle vertices resolved across all walks.
    pub saddles: usize,
    /// Points across all walked polygons, closing repeats included.
    pub traced_points: usize,
}

/// Result of a full scan.
#[derive(Debug, Clone)]
pub struct Scan {
    /// Finalized polygons in emission order.
    pub polygons: PolygonSet,
    /// Counters for diagnostics.
    pub stats: ScanStats,
}

/// Scan `grid`, walking one polygon per uncaptured seed.
///
/// `on_polygon` is called once per finalized polygon, in emission order,
/// before the scan moves on to the next cell.
///
/// # Errors
///
/// Returns [`TraceError::InvariantViolation`] if any walk fails. No
/// partial polygon set is returned.
pub fn scan<F>(
    grid: &Grid,
    strategy: CoverageStrategy,
    mut on_polygon: F,
) -> Result<Scan, TraceError>
where
    F: FnMut(&Polygon),
{
    let mut coverage = CoverageIndex::new(grid, strategy);
    let mut polygons = PolygonSet::new();
    let mut stats = ScanStats::default();
    let mut interest = Color::Light;

    for (cell, color) in grid.cells() {
        // Row starts reset the color of interest.
        if cell.col == 0 {
            interest = color;
        }
        if color != interest {
            continue;
        }
        interest = interest.opposite();
        stats.coverage_queries += 1;

        if coverage.is_captured(grid, &polygons, cell, cell, SearchDirection::LeftUp) {
            stats.captured_hits += 1;
            continue;
        }

        let walk = walker::walk(grid, cell)?;
        coverage.mark_region(grid, cell);
        stats.saddles += walk.saddles;
        stats.traced_points += walk.polygon.len();
        debug!(
            row = cell.row,
            col = cell.col,
            color = ?walk.polygon.color(),
            points = walk.polygon.len(),
            "polygon finalized"
        );
        on_polygon(&walk.polygon);
        polygons.push(walk.polygon);
    }

    Ok(Scan { polygons, stats })
}
