//! Directional movers and the saddle resolver.
//!
//! A walk moves along lattice edges. Each [`Direction`] is legal at a
//! vertex only when its one *backing* cell (the cell the traced region
//! must occupy for that edge to be a boundary with the region on the
//! walker's right) is inside the grid and holds the traced color.
//!
//! Checkerboard vertices are ambiguous under that test: two directions
//! are legal. [`resolve_saddle`] breaks the tie by always turning right,
//! which keeps diagonally touching cells of one color apart.

use serde::{Deserialize, Serialize};

use crate::grid::{Grid, Neighborhood};
use crate::types::{Color, Vertex};

/// One of the four lattice directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// `x + 1`.
    Right,
    /// `y + 1`.
    Down,
    /// `x - 1`.
    Left,
    /// `y - 1`.
    Up,
}

impl Direction {
    /// Candidate order used by the walker at ordinary vertices.
    pub const ALL: [Self; 4] = [Self::Right, Self::Down, Self::Left, Self::Up];

    /// The next direction clockwise (a right turn in y-down space).
    #[must_use]
    pub const fn clockwise(self) -> Self {
        match self {
            Self::Right => Self::Down,
            Self::Down => Self::Left,
            Self::Left => Self::Up,
            Self::Up => Self::Right,
        }
    }

    /// The cell that must hold the traced color for this move to be legal.
    #[must_use]
    pub const fn backing(self, hood: &Neighborhood) -> Option<Color> {
        match self {
            Self::Right => hood.down_right,
            Self::Down => hood.down_left,
            Self::Left => hood.up_left,
            Self::Up => hood.up_right,
        }
    }

    /// The cell whose absence or opposite color makes the walker consider
    /// this direction: Top -> Right, Right -> Down, Bottom -> Left,
    /// Left -> Up.
    #[must_use]
    pub const fn barrier(self, hood: &Neighborhood) -> Option<Color> {
        match self {
            Self::Right => hood.up_right,
            Self::Down => hood.down_right,
            Self::Left => hood.down_left,
            Self::Up => hood.up_left,
        }
    }

    /// Shift `vertex` one unit in this direction. `None` would leave the
    /// lattice on the low side.
    #[must_use]
    pub fn step(self, vertex: Vertex) -> Option<Vertex> {
        match self {
            Self::Right => Some(Vertex::new(vertex.x + 1, vertex.y)),
            Self::Down => Some(Vertex::new(vertex.x, vertex.y + 1)),
            Self::Left => vertex.x.checked_sub(1).map(|x| Vertex::new(x, vertex.y)),
            Self::Up => vertex.y.checked_sub(1).map(|y| Vertex::new(vertex.x, y)),
        }
    }

    /// Mover: the next vertex if moving this way from `vertex` keeps a
    /// `color` cell on the walker's right, otherwise `None` (blocked).
    #[must_use]
    pub fn advance(self, vertex: Vertex, grid: &Grid, color: Color) -> Option<Vertex> {
        self.advance_in(vertex, &grid.neighborhood(vertex), color)
    }

    /// [`advance`](Self::advance) with a precomputed neighborhood.
    #[must_use]
    pub fn advance_in(self, vertex: Vertex, hood: &Neighborhood, color: Color) -> Option<Vertex> {
        if self.backing(hood) == Some(color) {
            self.step(vertex)
        } else {
            None
        }
    }
}

/// Direction to take out of a saddle vertex reached via `previous`.
///
/// Cycles Right -> Down -> Left -> Up -> Right, one step per visit.
#[must_use]
pub const fn resolve_saddle(previous: Direction) -> Direction {
    previous.clockwise()
}
