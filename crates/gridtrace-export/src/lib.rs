//! gridtrace-export: output formats for traced grids (sans-IO).
//!
//! Currently supports SVG.

pub mod svg;

pub use svg::{SvgMetadata, SvgRenderer, build_path_data, fill, to_svg};
