//! The drawing surface a trace writes into.
//!
//! The pipeline stays sans-IO: it hands each finished, reduced polygon to
//! a [`Renderer`] in emission order and never touches the output format
//! itself. Later polygons paint over earlier ones, which is how a region
//! nested inside another region's hole becomes visible.

use crate::types::{Color, DocumentSize, Point};

/// A sink for filled polygons.
pub trait Renderer {
    /// Called once before any polygon, with the document size in target
    /// units.
    fn begin(&mut self, document: DocumentSize) {
        let _ = document;
    }

    /// Fill one closed polygon. `points` is open (the first point is not
    /// repeated) and in target space.
    fn fill_polygon(&mut self, points: &[Point], color: Color);
}

/// Collects polygons in memory. Useful for tests and for callers that
/// want the geometry without an output format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collector {
    /// Document size passed to [`Renderer::begin`], if it was called.
    pub document: Option<DocumentSize>,
    /// Filled polygons in emission order.
    pub shapes: Vec<(Color, Vec<Point>)>,
}

impl Renderer for Collector {
    fn begin(&mut self, document: DocumentSize) {
        self.document = Some(document);
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        self.shapes.push((color, points.to_vec()));
    }
}
