//! Shared types for the gridtrace tracing core.

use serde::{Deserialize, Serialize};

use crate::coverage::CoverageStrategy;

/// Re-export `GrayImage` so downstream crates can hand decoded rasters
/// to the grid producer without depending on `image` directly.
pub use image::GrayImage;

/// The value of one grid cell.
///
/// `Light` is the `0` bit and `Dark` the `1` bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// Cell value `0`, rendered with 0% gray fill.
    Light,
    /// Cell value `1`, rendered with 100% gray fill.
    Dark,
}

impl Color {
    /// Interpret a raw cell value. Only `0` and `1` are valid.
    #[must_use]
    pub const fn from_bit(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Light),
            1 => Some(Self::Dark),
            _ => None,
        }
    }

    /// The raw cell value of this color.
    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            Self::Light => 0,
            Self::Dark => 1,
        }
    }

    /// The other color.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Fill intensity as a percentage of gray (0 = white, 100 = black).
    #[must_use]
    pub const fn gray_percent(self) -> u8 {
        match self {
            Self::Light => 0,
            Self::Dark => 100,
        }
    }
}

/// A grid cell address (`row`, `col`), in cell space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Row index, increasing downwards.
    pub row: usize,
    /// Column index, increasing to the right.
    pub col: usize,
}

impl Cell {
    /// Create a new cell address.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The four lattice corners of this cell, clockwise from top-left.
    #[must_use]
    pub const fn corners(self) -> [Vertex; 4] {
        let (x, y) = (self.col, self.row);
        [
            Vertex::new(x, y),
            Vertex::new(x + 1, y),
            Vertex::new(x + 1, y + 1),
            Vertex::new(x, y + 1),
        ]
    }

    /// Returns `true` if `vertex` is one of this cell's corners.
    #[must_use]
    pub const fn has_corner(self, vertex: Vertex) -> bool {
        (vertex.x == self.col || vertex.x == self.col + 1)
            && (vertex.y == self.row || vertex.y == self.row + 1)
    }

    /// The cell to the left, if any.
    #[must_use]
    pub fn left(self) -> Option<Self> {
        self.col.checked_sub(1).map(|col| Self::new(self.row, col))
    }

    /// The cell above, if any.
    #[must_use]
    pub fn up(self) -> Option<Self> {
        self.row.checked_sub(1).map(|row| Self::new(row, self.col))
    }

    /// The cell to the right. Not bounds-checked against a grid.
    #[must_use]
    pub const fn right(self) -> Self {
        Self::new(self.row, self.col + 1)
    }

    /// The cell below. Not bounds-checked against a grid.
    #[must_use]
    pub const fn down(self) -> Self {
        Self::new(self.row + 1, self.col)
    }
}

/// A lattice point between cells.
///
/// Lattice space is `(cols + 1) x (rows + 1)`: `x` is the column line and
/// `y` the row line, so vertex `(x, y)` is the top-left corner of cell
/// `(row = y, col = x)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vertex {
    /// Column line.
    pub x: usize,
    /// Row line, increasing downwards.
    pub y: usize,
}

impl Vertex {
    /// Create a new lattice vertex.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns `true` if the two vertices differ by exactly one unit along
    /// exactly one axis.
    #[must_use]
    pub const fn is_adjacent(self, other: Self) -> bool {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) == 1
    }
}

/// A 2D point in target drawing space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position (increasing upwards in target space).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A closed lattice polygon tracing one region's outer boundary.
///
/// The point list is stored closed: the last point repeats the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polygon {
    color: Color,
    points: Vec<Vertex>,
}

impl Polygon {
    /// Create a polygon from a closed point list.
    #[must_use]
    pub const fn new(color: Color, points: Vec<Vertex>) -> Self {
        Self { color, points }
    }

    /// The color of the region this polygon encloses.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// The closed point list (first point repeated at the end).
    #[must_use]
    pub fn points(&self) -> &[Vertex] {
        &self.points
    }

    /// Number of points, including the closing repeat.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the polygon has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns `true` if `vertex` appears anywhere in the point list.
    #[must_use]
    pub fn contains_vertex(&self, vertex: Vertex) -> bool {
        self.points.contains(&vertex)
    }

    /// Returns `true` if two consecutive points of this polygon are both
    /// corners of `cell`, i.e. one of the polygon's edges lies on the
    /// cell's boundary.
    #[must_use]
    pub fn has_edge_on(&self, cell: Cell) -> bool {
        self.points
            .windows(2)
            .any(|pair| cell.has_corner(pair[0]) && cell.has_corner(pair[1]))
    }

    /// Consumes the polygon and returns its closed point list.
    #[must_use]
    pub fn into_points(self) -> Vec<Vertex> {
        self.points
    }
}

/// Append-only, ordered collection of finalized polygons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolygonSet(Vec<Polygon>);

impl PolygonSet {
    /// Create an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a finalized polygon.
    pub fn push(&mut self, polygon: Polygon) {
        self.0.push(polygon);
    }

    /// Number of polygons.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no polygon has been finalized.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in finalization order.
    pub fn iter(&self) -> std::slice::Iter<'_, Polygon> {
        self.0.iter()
    }

    /// All polygons in finalization order.
    #[must_use]
    pub fn as_slice(&self) -> &[Polygon] {
        &self.0
    }

    /// Returns `true` if some polygon of `color` has an edge on `cell`'s
    /// boundary.
    #[must_use]
    pub fn borders(&self, color: Color, cell: Cell) -> bool {
        self.0
            .iter()
            .filter(|polygon| polygon.color == color)
            .any(|polygon| polygon.has_edge_on(cell))
    }
}

impl<'a> IntoIterator for &'a PolygonSet {
    type Item = &'a Polygon;
    type IntoIter = std::slice::Iter<'a, Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Target document dimensions, in drawing units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DocumentSize {
    /// Document width.
    pub width: f64,
    /// Document height.
    pub height: f64,
}

/// Configuration for a trace run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// How the scanner decides that a cell is already enclosed.
    pub coverage: CoverageStrategy,

    /// Length of the longer document side in target units. The grid is
    /// scaled uniformly so its longer side spans this length.
    pub document_size: f64,
}

impl TraceConfig {
    /// Drawing units per inch (PostScript points).
    pub const POINTS_PER_INCH: f64 = 72.0;

    /// Default document size: two inches.
    pub const DEFAULT_DOCUMENT_SIZE: f64 = 2.0 * Self::POINTS_PER_INCH;

    /// Check the configuration before tracing.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::InvalidConfig`] if `document_size` is not a
    /// finite, positive number.
    pub fn validate(&self) -> Result<(), TraceError> {
        if !self.document_size.is_finite() || self.document_size <= 0.0 {
            return Err(TraceError::InvalidConfig(format!(
                "document size must be finite and positive, got {}",
                self.document_size
            )));
        }
        Ok(())
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            coverage: CoverageStrategy::default(),
            document_size: Self::DEFAULT_DOCUMENT_SIZE,
        }
    }
}

/// Reasons a grid is rejected before tracing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidGridError {
    /// The grid has no rows or no columns.
    #[error("grid is empty")]
    Empty,

    /// A row's length differs from the first row's.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Offending row index.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },

    /// A cell holds something other than `0` or `1`.
    #[error("cell ({row}, {col}) has value {value:?}, expected 0 or 1")]
    InvalidCell {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// The rejected value, as written in the input.
        value: String,
    },
}

/// Errors that can occur while producing or tracing a grid.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    /// The input grid is malformed.
    #[error("invalid grid: {0}")]
    InvalidGrid(#[from] InvalidGridError),

    /// Trace configuration is invalid.
    #[error("invalid trace configuration: {0}")]
    InvalidConfig(String),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The contour walker reached a state a well-formed grid cannot
    /// produce. Indicates a bug, never retried.
    #[error("trace invariant violated at vertex ({}, {}): {reason}", .vertex.x, .vertex.y)]
    InvariantViolation {
        /// Cursor position when the walk failed.
        vertex: Vertex,
        /// What went wrong.
        reason: &'static str,
    },
}
