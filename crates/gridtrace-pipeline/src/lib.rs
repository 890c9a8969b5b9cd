//! gridtrace-pipeline: binary-grid contour tracing (sans-IO).
//!
//! Converts a rectangular grid of `0`/`1` cells (a QR code, a bitmap
//! glyph) into a minimal set of filled polygons through:
//! region scan -> contour walk -> point reduction -> document transform.
//!
//! Every 4-connected same-color region yields exactly one polygon tracing
//! its outer boundary. Polygons are emitted in row-major order of their
//! seed cells, so a region nested in another region's hole is always
//! emitted after its surround: painting in emission order shows every
//! cell in its own color.
//!
//! This crate has **no I/O dependencies**. It operates on in-memory grids
//! and image bytes and hands geometry to a [`Renderer`]; output formats
//! live in `gridtrace-export`.

pub mod coverage;
pub mod diagnostics;
pub mod direction;
pub mod grid;
pub mod raster;
pub mod reduce;
pub mod render;
pub mod scanner;
pub mod types;
pub mod walker;

pub use coverage::{CoverageIndex, CoverageStrategy, SearchDirection, count_regions};
pub use diagnostics::TraceDiagnostics;
pub use direction::{Direction, resolve_saddle};
pub use grid::{Grid, Neighborhood};
pub use reduce::{OutputTransform, reduce};
pub use render::{Collector, Renderer};
pub use types::{
    Cell, Color, DocumentSize, InvalidGridError, Point, Polygon, PolygonSet, TraceConfig,
    TraceError, Vertex,
};

use tracing::info;

/// Trace `grid` into lattice-space polygons.
///
/// Returns the closed, unreduced polygons in emission order.
///
/// # Errors
///
/// Returns [`TraceError::InvalidConfig`] if `config` fails validation and
/// [`TraceError::InvariantViolation`] if a walk cannot continue.
pub fn trace(grid: &Grid, config: &TraceConfig) -> Result<PolygonSet, TraceError> {
    config.validate()?;
    Ok(scanner::scan(grid, config.coverage, |_| {})?.polygons)
}

/// Trace `grid` and draw the result into `renderer`.
///
/// The whole grid is scanned before the renderer sees anything, so a
/// failed trace leaves the renderer untouched. Each polygon is then
/// reduced, mapped into a document whose longer side is
/// `config.document_size`, and filled in emission order.
///
/// # Errors
///
/// Same as [`trace`].
pub fn trace_into<R: Renderer + ?Sized>(
    grid: &Grid,
    config: &TraceConfig,
    renderer: &mut R,
) -> Result<TraceDiagnostics, TraceError> {
    let start = web_time::Instant::now();
    config.validate()?;

    let mut diagnostics = TraceDiagnostics::new(grid.rows(), grid.cols(), config.coverage);
    let scan = scanner::scan(grid, config.coverage, |polygon| match polygon.color() {
        Color::Light => diagnostics.light_polygons += 1,
        Color::Dark => diagnostics.dark_polygons += 1,
    })?;
    diagnostics.scan_duration = start.elapsed();
    diagnostics.record_scan(&scan.stats);

    let transform = OutputTransform::fit(grid, config.document_size);
    renderer.begin(transform.document());
    for polygon in &scan.polygons {
        let points = transform.to_output(polygon.points());
        diagnostics.reduced_points += points.len();
        renderer.fill_polygon(&points, polygon.color());
    }
    diagnostics.total_duration = start.elapsed();

    info!(
        rows = grid.rows(),
        cols = grid.cols(),
        coverage = config.coverage.name(),
        polygons = diagnostics.polygon_count(),
        points = diagnostics.reduced_points,
        "trace complete"
    );
    Ok(diagnostics)
}
