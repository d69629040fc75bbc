//! Frame capture and GIF generation for collapse visualization

use crate::analysis::weights::TileCatalog;
use crate::io::configuration::{FINAL_FRAME_HOLD, MAX_GIF_FRAMES};
use crate::io::error::{AlgorithmError, Result};
use crate::io::image::{RenderMode, render_grid};
use crate::spatial::grid::Grid;
use image::{Delay, Frame, RgbaImage};
use std::path::Path;

/// Captures rendered grid snapshots while a run progresses
///
/// Uncollapsed cells are drawn as superposition previews, so the animation
/// shows cells settling from blended colours into tiles. Long runs keep
/// every n-th step to stay within [`MAX_GIF_FRAMES`].
pub struct VisualizationCapture {
    frames: Vec<RgbaImage>,
    palette: Vec<[u8; 4]>,
    stride: usize,
    steps_seen: usize,
}

impl VisualizationCapture {
    /// Prepare a capture for a run of at most `expected_steps` collapses
    pub fn new(palette: Vec<[u8; 4]>, expected_steps: usize) -> Self {
        let stride = expected_steps.div_ceil(MAX_GIF_FRAMES).max(1);
        Self {
            frames: Vec::with_capacity(expected_steps.min(MAX_GIF_FRAMES) + 1),
            palette,
            stride,
            steps_seen: 0,
        }
    }

    /// Record the grid after one step, subject to the frame stride
    ///
    /// # Errors
    ///
    /// Returns an error if the grid cannot be rendered
    pub fn record_step(&mut self, grid: &Grid, catalog: &TileCatalog) -> Result<()> {
        self.steps_seen += 1;
        if self.steps_seen % self.stride == 0 {
            self.record_frame(grid, catalog)?;
        }
        Ok(())
    }

    /// Record the grid unconditionally
    ///
    /// # Errors
    ///
    /// Returns an error if the grid cannot be rendered
    pub fn record_frame(&mut self, grid: &Grid, catalog: &TileCatalog) -> Result<()> {
        let frame = render_grid(grid, catalog, &self.palette, RenderMode::Superposition)?;
        self.frames.push(frame);
        Ok(())
    }

    /// Number of frames captured so far
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Steps between two captured frames
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// Write the captured frames as an animated GIF
    ///
    /// The final frame is held [`FINAL_FRAME_HOLD`] times longer.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No frames were captured
    /// - File system operations fail
    /// - GIF encoding fails
    pub fn export_gif(&self, output_path: &Path, frame_delay_ms: u32) -> Result<()> {
        if self.frames.is_empty() {
            return Err(AlgorithmError::InvalidSourceData {
                reason: "No frames captured for visualization".to_string(),
            });
        }

        let last = self.frames.len() - 1;
        let frames: Vec<Frame> = self
            .frames
            .iter()
            .enumerate()
            .map(|(index, img)| {
                let delay = if index == last {
                    frame_delay_ms * FINAL_FRAME_HOLD
                } else {
                    frame_delay_ms
                };
                Frame::from_parts(img.clone(), 0, 0, Delay::from_numer_denom_ms(delay, 1))
            })
            .collect();

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AlgorithmError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }

        let file = std::fs::File::create(output_path).map_err(|e| AlgorithmError::FileSystem {
            path: output_path.to_path_buf(),
            operation: "create file",
            source: e,
        })?;

        let mut encoder = image::codecs::gif::GifEncoder::new(file);
        encoder
            .encode_frames(frames)
            .map_err(|e| AlgorithmError::ImageExport {
                path: output_path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }
}
