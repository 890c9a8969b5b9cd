//! Point-list reduction and the lattice-to-document transform.
//!
//! A walk emits one point per lattice edge. Every point that lies on a
//! straight run between its two neighbors is redundant; removing them
//! leaves only the corners. The reduced ring is then mapped into document
//! space with a uniform scale and a vertical flip.

use crate::grid::Grid;
use crate::types::{DocumentSize, Point, Vertex};

/// Reduce a closed point list to its corners.
///
/// Drops the repeated closing point, then removes points collinear with
/// both ring neighbors until none remain. The result is an open ring:
/// re-closing it encloses the same area in the same order.
///
/// The seed point of a walk is always a corner, so walker output keeps its
/// first point. Reducing an already reduced ring returns it unchanged.
#[must_use = "returns the reduced ring"]
pub fn reduce(points: &[Vertex]) -> Vec<Vertex> {
    let mut ring = points.to_vec();
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }

    loop {
        let n = ring.len();
        if n < 3 {
            return ring;
        }
        let kept: Vec<Vertex> = (0..n)
            .filter(|&i| !is_collinear(ring[(i + n - 1) % n], ring[i], ring[(i + 1) % n]))
            .map(|i| ring[i])
            .collect();
        // A ring that is one straight line has no corners to keep.
        if kept.len() == n || kept.len() < 3 {
            return ring;
        }
        ring = kept;
    }
}

/// Axis-aligned collinearity: all three share an x or all share a y.
const fn is_collinear(a: Vertex, b: Vertex, c: Vertex) -> bool {
    (a.x == b.x && b.x == c.x) || (a.y == b.y && b.y == c.y)
}

/// Maps lattice vertices into document space.
///
/// `x' = x * scale`, `y' = height - y * scale`: the document's y axis
/// points up, the lattice's points down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputTransform {
    scale: f64,
    width: f64,
    height: f64,
}

impl OutputTransform {
    /// Fit `grid` into a document whose longer side is `document_size`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fit(grid: &Grid, document_size: f64) -> Self {
        let longest = grid.rows().max(grid.cols()).max(1) as f64;
        let scale = document_size / longest;
        Self {
            scale,
            width: grid.cols() as f64 * scale,
            height: grid.rows() as f64 * scale,
        }
    }

    /// Document units per lattice unit.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Size of the document the transform maps into.
    #[must_use]
    pub const fn document(&self) -> DocumentSize {
        DocumentSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Map one vertex.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn apply(&self, vertex: Vertex) -> Point {
        Point::new(
            vertex.x as f64 * self.scale,
            (vertex.y as f64).mul_add(-self.scale, self.height),
        )
    }

    /// Reduce a closed walk and map the corners into document space.
    #[must_use]
    pub fn to_output(&self, points: &[Vertex]) -> Vec<Point> {
        reduce(points).into_iter().map(|v| self.apply(v)).collect()
    }
}

/// Twice the signed area of a ring (shoelace formula).
#[must_use]
pub fn doubled_area(ring: &[Vertex]) -> i64 {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let a = ring[i];
            let b = ring[(i + 1) % n];
            coord(a.x) * coord(b.y) - coord(b.x) * coord(a.y)
        })
        .sum()
}

fn coord(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
