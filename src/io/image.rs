//! PNG rendering of grids, including superposition previews

use crate::algorithm::bitset::TileBitset;
use crate::analysis::weights::TileCatalog;
use crate::io::error::{AlgorithmError, Result, invariant_violation};
use crate::spatial::grid::{CellState, Grid};
use crate::spatial::tiles::Symbol;
use image::{Rgba, RgbaImage};
use ndarray::Array2;
use std::path::Path;

const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// How uncollapsed cells are drawn
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Uncollapsed cells are transparent
    #[default]
    Collapsed,
    /// Uncollapsed cells show the weighted average of their candidates
    Superposition,
}

fn symbol_color(palette: &[[u8; 4]], symbol: Symbol) -> Result<[u8; 4]> {
    palette.get(symbol).copied().ok_or_else(|| {
        invariant_violation(
            "render",
            &format!("symbol {symbol} is outside a palette of {}", palette.len()),
        )
    })
}

/// Weight-normalized average colour of every candidate tile, per pixel
///
/// An empty candidate set renders fully transparent.
///
/// # Errors
///
/// Returns an error if a candidate is not in the catalog or one of its
/// symbols has no palette entry
pub fn superposition_tile(
    candidates: &TileBitset,
    catalog: &TileCatalog,
    palette: &[[u8; 4]],
) -> Result<Array2<[u8; 4]>> {
    let (tile_width, tile_height) = catalog.tile_dimensions();
    let mut sums = Array2::from_elem((tile_height, tile_width), [0.0_f64; 4]);
    let mut total_weight = 0.0;

    for id in candidates.iter() {
        let weight = catalog.weight(id)?;
        let tile = catalog.tile(id)?;
        total_weight += weight;

        for ((i, j), &symbol) in tile.cells().indexed_iter() {
            let color = symbol_color(palette, symbol)?;
            if let Some(sum) = sums.get_mut((i, j)) {
                for (channel, &value) in sum.iter_mut().zip(color.iter()) {
                    *channel += f64::from(value) * weight;
                }
            }
        }
    }

    if total_weight <= 0.0 {
        return Ok(Array2::from_elem((tile_height, tile_width), TRANSPARENT));
    }

    Ok(sums.map(|sum| sum.map(|channel| (channel / total_weight).round().min(255.0) as u8)))
}

/// Draw every cell's tile into one image
///
/// The image measures `grid_width * tile_width` by
/// `grid_height * tile_height` pixels.
///
/// # Errors
///
/// Returns an error if a tile is not in the catalog or a symbol has no
/// palette entry
pub fn render_grid(
    grid: &Grid,
    catalog: &TileCatalog,
    palette: &[[u8; 4]],
    mode: RenderMode,
) -> Result<RgbaImage> {
    let (tile_width, tile_height) = catalog.tile_dimensions();
    let mut img = RgbaImage::new(
        (grid.width() * tile_width) as u32,
        (grid.height() * tile_height) as u32,
    );

    for ([row, col], cell) in grid.indexed_cells() {
        let pixels = match (cell.state(), mode) {
            (CellState::Collapsed(id), _) => catalog
                .tile(*id)?
                .cells()
                .map(|&symbol| symbol_color(palette, symbol))
                .into_iter()
                .collect::<Result<Vec<[u8; 4]>>>()?,
            (CellState::Superposed(candidates), RenderMode::Superposition) => {
                superposition_tile(candidates, catalog, palette)?
                    .into_iter()
                    .collect()
            }
            (CellState::Superposed(_), RenderMode::Collapsed) => {
                vec![TRANSPARENT; tile_width * tile_height]
            }
        };

        for (offset, color) in pixels.into_iter().enumerate() {
            let x = col * tile_width + offset % tile_width;
            let y = row * tile_height + offset / tile_width;
            img.put_pixel(x as u32, y as u32, Rgba(color));
        }
    }

    Ok(img)
}

/// Render the grid and save it as a PNG
///
/// # Errors
///
/// Returns an error if:
/// - Rendering fails (unknown tile or symbol)
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_grid_as_png(
    grid: &Grid,
    catalog: &TileCatalog,
    palette: &[[u8; 4]],
    mode: RenderMode,
    output_path: &Path,
) -> Result<()> {
    let img = render_grid(grid, catalog, palette, mode)?;

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| AlgorithmError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save(output_path)
        .map_err(|e| AlgorithmError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}
