//! Raster grid producer: sample a scanned or rendered image into a grid.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, WebP), converts them to
//! luminance and reads one pixel per cell. The image is split into square
//! cells of `cell_size` pixels starting at the top-left corner; partial
//! cells along the right and bottom edges are ignored.

use image::GrayImage;

use crate::grid::Grid;
use crate::types::{Color, TraceError};

/// Luminance below which a sampled pixel counts as dark (color 1).
pub const DEFAULT_THRESHOLD: u8 = 128;

/// Decode raw image bytes into a grid.
///
/// # Errors
///
/// Returns [`TraceError::EmptyInput`] if `bytes` is empty,
/// [`TraceError::ImageDecode`] if the image format is unrecognized or the
/// data is corrupt, and [`TraceError::InvalidConfig`] if `cell_size` does
/// not fit the image.
pub fn decode_grid(bytes: &[u8], cell_size: u32, threshold: u8) -> Result<Grid, TraceError> {
    let gray = decode_luma(bytes)?;
    grid_from_luma(&gray, cell_size, threshold)
}

/// Decode raw image bytes and convert to grayscale.
///
/// The standard luminance formula is used for RGB-to-gray conversion.
///
/// # Errors
///
/// Returns [`TraceError::EmptyInput`] if `bytes` is empty and
/// [`TraceError::ImageDecode`] if the data cannot be decoded.
pub fn decode_luma(bytes: &[u8]) -> Result<GrayImage, TraceError> {
    if bytes.is_empty() {
        return Err(TraceError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    Ok(img.to_luma8())
}

/// Sample the center pixel of every `cell_size` x `cell_size` cell.
///
/// # Errors
///
/// Returns [`TraceError::InvalidConfig`] if `cell_size` is zero or larger
/// than either image dimension.
pub fn grid_from_luma(gray: &GrayImage, cell_size: u32, threshold: u8) -> Result<Grid, TraceError> {
    if cell_size == 0 {
        return Err(TraceError::InvalidConfig(
            "cell size must be at least one pixel".to_string(),
        ));
    }
    let cols = gray.width() / cell_size;
    let rows = gray.height() / cell_size;
    if cols == 0 || rows == 0 {
        return Err(TraceError::InvalidConfig(format!(
            "cell size {cell_size} does not fit a {}x{} image",
            gray.width(),
            gray.height(),
        )));
    }

    let half = cell_size / 2;
    let colors: Vec<Vec<Color>> = (0..rows)
        .map(|r| {
            (0..cols)
                .map(|c| {
                    let luma = gray.get_pixel(c * cell_size + half, r * cell_size + half).0[0];
                    if luma < threshold {
                        Color::Dark
                    } else {
                        Color::Light
                    }
                })
                .collect()
        })
        .collect();

    Ok(Grid::from_colors(&colors)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Cell;

    /// Helper: encode a grayscale image as a PNG byte buffer.
    fn encode_png(img: &GrayImage) -> Vec<u8> {
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::L8,
        )
        .ok();
        buf
    }

    /// A `cols` x `rows` grid of `cell` pixel squares, dark where `dark`
    /// says so.
    fn draw(rows: u32, cols: u32, cell: u32, dark: impl Fn(u32, u32) -> bool) -> GrayImage {
        GrayImage::from_fn(cols * cell, rows * cell, |x, y| {
            if dark(y / cell, x / cell) {
                image::Luma([0])
            } else {
                image::Luma([255])
            }
        })
    }

    #[test]
    fn empty_input_returns_error() {
        let result = decode_grid(&[], 1, DEFAULT_THRESHOLD);
        assert!(matches!(result, Err(TraceError::EmptyInput)));
    }

    #[test]
    fn corrupt_bytes_returns_image_decode_error() {
        let result = decode_grid(&[0xFF, 0xFE, 0x00, 0x01], 1, DEFAULT_THRESHOLD);
        assert!(matches!(result, Err(TraceError::ImageDecode(_))));
    }

    #[test]
    fn zero_cell_size_rejected() {
        let img = GrayImage::new(4, 4);
        let result = grid_from_luma(&img, 0, DEFAULT_THRESHOLD);
        assert!(matches!(result, Err(TraceError::InvalidConfig(_))));
    }

    #[test]
    fn oversized_cell_rejected() {
        let img = GrayImage::new(4, 8);
        let result = grid_from_luma(&img, 5, DEFAULT_THRESHOLD);
        assert!(matches!(result, Err(TraceError::InvalidConfig(_))));
    }

    #[test]
    fn checkerboard_png_decodes_to_grid() {
        let img = draw(2, 3, 4, |r, c| (r + c) % 2 == 0);
        let grid = decode_grid(&encode_png(&img), 4, DEFAULT_THRESHOLD).unwrap();
        assert_eq!(grid, Grid::from_rows(&[[1, 0, 1], [0, 1, 0]]).unwrap());
    }

    #[test]
    fn partial_cells_are_ignored() {
        let base = draw(2, 2, 3, |_, _| false);
        // Pad to 7x7 with a dark border strip that no cell center reaches.
        let img = GrayImage::from_fn(7, 7, |x, y| {
            if x < 6 && y < 6 {
                *base.get_pixel(x, y)
            } else {
                image::Luma([0])
            }
        });
        let grid = grid_from_luma(&img, 3, DEFAULT_THRESHOLD).unwrap();
        assert_eq!((grid.rows(), grid.cols()), (2, 2));
        assert!(grid.cells().all(|(_, color)| color == Color::Light));
    }

    #[test]
    fn threshold_splits_midtones() {
        let img = GrayImage::from_fn(2, 1, |x, _| image::Luma([if x == 0 { 100 } else { 200 }]));
        let grid = grid_from_luma(&img, 1, 150).unwrap();
        assert_eq!(grid.color(Cell::new(0, 0)), Some(Color::Dark));
        assert_eq!(grid.color(Cell::new(0, 1)), Some(Color::Light));

        let grid = grid_from_luma(&img, 1, 100).unwrap();
        // Strictly below the threshold is dark.
        assert_eq!(grid.color(Cell::new(0, 0)), Some(Color::Light));
    }

    #[test]
    fn weighted_luminance_orders_channels() {
        // Pure green is brighter than pure red, which is brighter than
        // pure blue.
        let img = image::RgbImage::from_fn(3, 1, |x, _| match x {
            0 => image::Rgb([255, 0, 0]),
            1 => image::Rgb([0, 255, 0]),
            _ => image::Rgb([0, 0, 255]),
        });
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgb8,
        )
        .ok();
        let gray = decode_luma(&buf).unwrap();
        let [r, g, b] = [0, 1, 2].map(|x| gray.get_pixel(x, 0).0[0]);
        assert!(g > r && r > b, "R={r} G={g} B={b}");
    }
}
