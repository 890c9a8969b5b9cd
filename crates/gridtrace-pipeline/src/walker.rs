//! Contour walker: traces one polygon around the region containing a seed
//! cell.
//!
//! The walk keeps the traced region on its right (clockwise in y-down
//! lattice space). It starts along the top edge of the seed cell, which
//! the region scanner guarantees is a boundary edge: the seed is the first
//! cell of its region in row-major order.

use tracing::trace;

use crate::direction::{Direction, resolve_saddle};
use crate::grid::Grid;
use crate::types::{Cell, Color, Polygon, TraceError, Vertex};

/// Lifecycle of a single walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    /// First two points placed, nothing decided yet.
    Seeded,
    /// Extending the point list one vertex at a time.
    Walking,
    /// The cursor returned to the first point.
    Closed,
}

/// A finished walk: the closed polygon plus counters for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walk {
    /// The closed polygon (first point repeated at the end).
    pub polygon: Polygon,
    /// How many checkerboard vertices the walk resolved.
    pub saddles: usize,
}

/// Tracer state for one polygon.
#[derive(Debug)]
pub struct ContourWalker<'g> {
    grid: &'g Grid,
    color: Color,
    points: Vec<Vertex>,
    cursor: Vertex,
    previous: Direction,
    state: WalkState,
    saddles: usize,
}

impl<'g> ContourWalker<'g> {
    /// Seed a walk at `seed`, tracing the seed cell's color.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::InvariantViolation`] if `seed` is outside the
    /// grid.
    pub fn seed(grid: &'g Grid, seed: Cell) -> Result<Self, TraceError> {
        let start = Vertex::new(seed.col, seed.row);
        let color = grid.color(seed).ok_or(TraceError::InvariantViolation {
            vertex: start,
            reason: "seed cell outside the grid",
        })?;
        Ok(Self::seed_with_color(grid, seed, color))
    }

    /// Seed a walk tracing `color`, regardless of the seed cell's color.
    pub(crate) fn seed_with_color(grid: &'g Grid, seed: Cell, color: Color) -> Self {
        let start = Vertex::new(seed.col, seed.row);
        let second = Vertex::new(seed.col + 1, seed.row);
        Self {
            grid,
            color,
            points: vec![start, second],
            cursor: second,
            previous: Direction::Right,
            state: WalkState::Seeded,
            saddles: 0,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> WalkState {
        self.state
    }

    /// The color being traced.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// The vertex the walk is extending from.
    #[must_use]
    pub const fn cursor(&self) -> Vertex {
        self.cursor
    }

    /// Points placed so far.
    #[must_use]
    pub fn points(&self) -> &[Vertex] {
        &self.points
    }

    /// Advance the walk by one vertex and return it.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::InvariantViolation`] if no direction is legal
    /// at the cursor, or if a saddle resolution is blocked.
    pub fn step(&mut self) -> Result<Vertex, TraceError> {
        let hood = self.grid.neighborhood(self.cursor);

        let (direction, next) = if hood.is_saddle() {
            self.saddles += 1;
            let direction = resolve_saddle(self.previous);
            let next = direction
                .advance_in(self.cursor, &hood, self.color)
                .ok_or(TraceError::InvariantViolation {
                    vertex: self.cursor,
                    reason: "saddle resolution is blocked",
                })?;
            (direction, next)
        } else {
            Direction::ALL
                .into_iter()
                .filter(|d| d.barrier(&hood) != Some(self.color))
                .find_map(|d| d.advance_in(self.cursor, &hood, self.color).map(|v| (d, v)))
                .ok_or(TraceError::InvariantViolation {
                    vertex: self.cursor,
                    reason: "no legal direction",
                })?
        };

        self.previous = direction;
        self.cursor = next;
        self.points.push(next);
        self.state = if Some(&next) == self.points.first() {
            WalkState::Closed
        } else {
            WalkState::Walking
        };
        Ok(next)
    }

    /// Walk until the polygon closes.
    ///
    /// # Errors
    ///
    /// Propagates [`step`](Self::step) failures, and reports
    /// [`TraceError::InvariantViolation`] if the walk grows longer than the
    /// grid has lattice edges.
    pub fn run(mut self) -> Result<Walk, TraceError> {
        let limit = self.grid.lattice_edge_count();
        while self.state != WalkState::Closed {
            if self.points.len() > limit {
                return Err(TraceError::InvariantViolation {
                    vertex: self.cursor,
                    reason: "walk did not close",
                });
            }
            self.step()?;
        }
        trace!(
            color = ?self.color,
            points = self.points.len(),
            saddles = self.saddles,
            "walk closed"
        );
        Ok(Walk {
            polygon: Polygon::new(self.color, self.points),
            saddles: self.saddles,
        })
    }
}

/// Trace the outer boundary of the region whose first cell is `seed`.
///
/// # Errors
///
/// Returns [`TraceError::InvariantViolation`] if the walk cannot continue.
pub fn walk(grid: &Grid, seed: Cell) -> Result<Walk, TraceError> {
    ContourWalker::seed(grid, seed)?.run()
}
