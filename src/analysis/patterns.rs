//! Source bitmap loading and colour quantization into symbols

use crate::io::error::{AlgorithmError, Result};
use crate::spatial::tiles::Symbol;
use image::RgbaImage;
use ndarray::Array2;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// Symbol grid of a source image together with its colour palette
///
/// Symbol `s` stands for `palette[s]`.
#[derive(Clone, Debug)]
pub struct SourceBitmap {
    symbols: Array2<Symbol>,
    palette: Vec<[u8; 4]>,
}

impl SourceBitmap {
    /// Load and quantize a PNG file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file at the given path cannot be opened or read
    /// - The file is not a valid image format
    /// - The image has no pixels
    pub fn from_png_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let img = image::open(&path_buf).map_err(|e| AlgorithmError::ImageLoad {
            path: path_buf,
            source: e,
        })?;

        Self::from_rgba_image(&img.to_rgba8())
    }

    /// Map every distinct RGBA colour to one symbol
    ///
    /// # Errors
    ///
    /// Returns an error if the image has no pixels
    pub fn from_rgba_image(img: &RgbaImage) -> Result<Self> {
        let (width, height) = (img.width() as usize, img.height() as usize);
        if width == 0 || height == 0 {
            return Err(AlgorithmError::InvalidSourceData {
                reason: "Source image has no pixels".to_string(),
            });
        }

        // Deterministic colour ordering ensures reproducible symbol assignments
        let palette: Vec<[u8; 4]> = img
            .pixels()
            .map(|pixel| pixel.0)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let lookup: HashMap<[u8; 4], Symbol> = palette
            .iter()
            .enumerate()
            .map(|(symbol, &color)| (color, symbol))
            .collect();

        let symbols = Array2::from_shape_fn((height, width), |(row, col)| {
            lookup
                .get(&img.get_pixel(col as u32, row as u32).0)
                .copied()
                .unwrap_or_default()
        });

        Ok(Self { symbols, palette })
    }

    /// Wrap an already quantized grid with a grey-ramp palette
    ///
    /// # Errors
    ///
    /// Returns an error if the grid is empty
    pub fn from_symbols(symbols: Array2<Symbol>) -> Result<Self> {
        if symbols.is_empty() {
            return Err(AlgorithmError::InvalidSourceData {
                reason: "Source bitmap has no pixels".to_string(),
            });
        }

        let symbol_count = symbols.iter().max().map_or(1, |&max| max + 1);
        let span = symbol_count.saturating_sub(1).max(1);
        let palette = (0..symbol_count)
            .map(|s| {
                let level = (s * 255 / span).min(255) as u8;
                [level, level, level, 255]
            })
            .collect();

        Ok(Self { symbols, palette })
    }

    /// Symbol grid indexed by (row, col)
    pub const fn symbols(&self) -> &Array2<Symbol> {
        &self.symbols
    }

    /// RGBA colour of each symbol
    pub fn palette(&self) -> &[[u8; 4]] {
        &self.palette
    }

    /// Number of distinct symbols
    pub fn symbol_count(&self) -> usize {
        self.palette.len()
    }

    /// Bitmap size as (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.symbols.ncols(), self.symbols.nrows())
    }

    /// Consume the bitmap and return its symbols and palette
    pub fn into_parts(self) -> (Array2<Symbol>, Vec<[u8; 4]>) {
        (self.symbols, self.palette)
    }
}
