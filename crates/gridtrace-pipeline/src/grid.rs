//! The binary grid model.
//!
//! A [`Grid`] is validated once on construction (rectangular, every cell
//! `0` or `1`) and is read-only for the rest of a trace. Queries that may
//! fall outside the grid return `Option` so callers can treat the border
//! as an ordinary base case.

use std::str::FromStr;

use crate::types::{Cell, Color, InvalidGridError, Vertex};

/// A validated rectangular matrix of [`Color`]s, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Color>,
}

impl Grid {
    /// Build a grid from rows of raw cell values.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidGridError::Empty`] if there are no rows or the first
    /// row is empty, [`InvalidGridError::RaggedRow`] if any row's length
    /// differs from the first, and [`InvalidGridError::InvalidCell`] for
    /// any value other than `0` or `1`.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, InvalidGridError> {
        let cols = rows.first().map_or(0, |row| row.as_ref().len());
        if cols == 0 {
            return Err(InvalidGridError::Empty);
        }

        let mut cells = Vec::with_capacity(rows.len() * cols);
        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(InvalidGridError::RaggedRow {
                    row: r,
                    expected: cols,
                    found: row.len(),
                });
            }
            for (c, &value) in row.iter().enumerate() {
                let color = Color::from_bit(value).ok_or_else(|| InvalidGridError::InvalidCell {
                    row: r,
                    col: c,
                    value: value.to_string(),
                })?;
                cells.push(color);
            }
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            cells,
        })
    }

    /// Build a grid from already-typed colors.
    ///
    /// # Errors
    ///
    /// Same shape checks as [`from_rows`](Self::from_rows).
    pub fn from_colors(rows: &[Vec<Color>]) -> Result<Self, InvalidGridError> {
        let raw: Vec<Vec<u8>> = rows
            .iter()
            .map(|row| row.iter().map(|c| c.bit()).collect())
            .collect();
        Self::from_rows(&raw)
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `true` if `cell` lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// The color of `cell`, or `None` outside the grid.
    #[must_use]
    pub fn color(&self, cell: Cell) -> Option<Color> {
        self.index(cell).map(|i| self.cells[i])
    }

    /// Row-major index of `cell`, or `None` outside the grid.
    #[must_use]
    pub const fn index(&self, cell: Cell) -> Option<usize> {
        if self.contains(cell) {
            Some(cell.row * self.cols + cell.col)
        } else {
            None
        }
    }

    /// Iterate over all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Cell, Color)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &color)| (Cell::new(i / self.cols, i % self.cols), color))
    }

    /// The four cells meeting at `vertex`.
    #[must_use]
    pub fn neighborhood(&self, vertex: Vertex) -> Neighborhood {
        let up = vertex.y.checked_sub(1);
        let left = vertex.x.checked_sub(1);
        let at = |row: Option<usize>, col: Option<usize>| {
            row.zip(col).and_then(|(r, c)| self.color(Cell::new(r, c)))
        };
        Neighborhood {
            up_left: at(up, left),
            up_right: at(up, Some(vertex.x)),
            down_left: at(Some(vertex.y), left),
            down_right: at(Some(vertex.y), Some(vertex.x)),
        }
    }

    /// Total number of lattice edges. No closed walk can be longer.
    #[must_use]
    pub const fn lattice_edge_count(&self) -> usize {
        self.rows * (self.cols + 1) + self.cols * (self.rows + 1)
    }

    /// Render the grid back to its text form (one line per row).
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.rows * (self.cols + 1));
        for row in self.cells.chunks(self.cols) {
            for color in row {
                out.push(if color.bit() == 1 { '1' } else { '0' });
            }
            out.push('\n');
        }
        out
    }
}

impl FromStr for Grid {
    type Err = InvalidGridError;

    /// Parse the text grid format: one row per non-blank line, cells
    /// written as `0` or `1`, whitespace inside a line ignored.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut rows: Vec<Vec<u8>> = Vec::new();
        for line in text.lines().filter(|line| !line.trim().is_empty()) {
            let r = rows.len();
            let row = line
                .chars()
                .filter(|ch| !ch.is_whitespace())
                .enumerate()
                .map(|(c, ch)| match ch {
                    '0' => Ok(0),
                    '1' => Ok(1),
                    other => Err(InvalidGridError::InvalidCell {
                        row: r,
                        col: c,
                        value: other.to_string(),
                    }),
                })
                .collect::<Result<Vec<u8>, _>>()?;
            rows.push(row);
        }
        Self::from_rows(&rows)
    }
}

/// The 2x2 block of cells around a lattice vertex. `None` marks a cell
/// outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighborhood {
    /// Cell `(y - 1, x - 1)`.
    pub up_left: Option<Color>,
    /// Cell `(y - 1, x)`.
    pub up_right: Option<Color>,
    /// Cell `(y, x - 1)`.
    pub down_left: Option<Color>,
    /// Cell `(y, x)`.
    pub down_right: Option<Color>,
}

impl Neighborhood {
    /// Returns `true` for a checkerboard vertex: all four cells in the
    /// grid, diagonals equal, and the two diagonals of different colors.
    #[must_use]
    pub fn is_saddle(&self) -> bool {
        match (self.up_left, self.up_right, self.down_left, self.down_right) {
            (Some(ul), Some(ur), Some(dl), Some(dr)) => ul == dr && ur == dl && ul != ur,
            _ => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_builds_grid() {
        let grid = Grid::from_rows(&[[0, 1, 0], [1, 1, 0]]).unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.color(Cell::new(1, 0)), Some(Color::Dark));
        assert_eq!(grid.color(Cell::new(0, 2)), Some(Color::Light));
    }

    #[test]
    fn empty_grid_rejected() {
        let rows: [[u8; 0]; 0] = [];
        assert_eq!(Grid::from_rows(&rows), Err(InvalidGridError::Empty));
        assert_eq!(
            Grid::from_rows(&[Vec::<u8>::new()]),
            Err(InvalidGridError::Empty)
        );
    }

    #[test]
    fn ragged_rows_rejected() {
        let rows = vec![vec![0, 1, 0], vec![1, 1]];
        assert_eq!(
            Grid::from_rows(&rows),
            Err(InvalidGridError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2,
            })
        );
    }

    #[test]
    fn non_binary_cell_rejected() {
        let result = Grid::from_rows(&[[0, 1], [2, 0]]);
        assert_eq!(
            result,
            Err(InvalidGridError::InvalidCell {
                row: 1,
                col: 0,
                value: "2".to_string(),
            })
        );
    }

    #[test]
    fn out_of_bounds_color_is_none() {
        let grid = Grid::from_rows(&[[1]]).unwrap();
        assert_eq!(grid.color(Cell::new(0, 1)), None);
        assert_eq!(grid.color(Cell::new(1, 0)), None);
    }

    #[test]
    fn parse_text_grid() {
        let grid: Grid = "01\n 1 0 \n\n".parse().unwrap();
        assert_eq!(grid, Grid::from_rows(&[[0, 1], [1, 0]]).unwrap());
    }

    #[test]
    fn parse_rejects_foreign_characters() {
        let result = "01\n0x\n".parse::<Grid>();
        assert_eq!(
            result,
            Err(InvalidGridError::InvalidCell {
                row: 1,
                col: 1,
                value: "x".to_string(),
            })
        );
    }

    #[test]
    fn text_round_trip() {
        let text = "010\n110\n";
        let grid: Grid = text.parse().unwrap();
        assert_eq!(grid.to_text(), text);
    }

    #[test]
    fn cells_iterate_row_major() {
        let grid = Grid::from_rows(&[[0, 1], [1, 1]]).unwrap();
        let cells: Vec<Cell> = grid.cells().map(|(cell, _)| cell).collect();
        assert_eq!(
            cells,
            vec![
                Cell::new(0, 0),
                Cell::new(0, 1),
                Cell::new(1, 0),
                Cell::new(1, 1),
            ]
        );
    }

    #[test]
    fn neighborhood_at_corner_vertex() {
        let grid = Grid::from_rows(&[[1, 0], [0, 1]]).unwrap();
        let hood = grid.neighborhood(Vertex::new(0, 0));
        assert_eq!(hood.up_left, None);
        assert_eq!(hood.up_right, None);
        assert_eq!(hood.down_left, None);
        assert_eq!(hood.down_right, Some(Color::Dark));
        assert!(!hood.is_saddle());
    }

    #[test]
    fn checkerboard_center_is_saddle() {
        let grid = Grid::from_rows(&[[1, 0], [0, 1]]).unwrap();
        assert!(grid.neighborhood(Vertex::new(1, 1)).is_saddle());
    }

    #[test]
    fn uniform_block_is_not_saddle() {
        let grid = Grid::from_rows(&[[0, 0], [0, 0]]).unwrap();
        assert!(!grid.neighborhood(Vertex::new(1, 1)).is_saddle());
    }

    #[test]
    fn border_vertex_is_never_saddle() {
        let grid = Grid::from_rows(&[[1, 0, 1], [0, 1, 0]]).unwrap();
        // Vertex on the bottom border has only two in-grid cells.
        assert!(!grid.neighborhood(Vertex::new(1, 2)).is_saddle());
        assert!(grid.neighborhood(Vertex::new(1, 1)).is_saddle());
    }

    #[test]
    fn lattice_edge_count_of_unit_grid() {
        let grid = Grid::from_rows(&[[0]]).unwrap();
        assert_eq!(grid.lattice_edge_count(), 4);
    }
}
