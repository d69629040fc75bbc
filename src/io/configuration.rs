//! Generation defaults and the immutable run configuration

use crate::algorithm::adjacency::AdjacencyMode;
use crate::io::error::{Result, invalid_parameter};

/// Default output grid width and height, in tiles
pub const DEFAULT_GRID_SIZE: usize = 24;

/// Default tile width and height, in bitmap pixels
pub const DEFAULT_TILE_SIZE: usize = 3;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed grid dimension
pub const MAX_GRID_DIMENSION: usize = 10_000;

/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

/// Restarts allowed per run after a contradiction
pub const DEFAULT_ATTEMPTS: usize = 10;

/// Independent outputs generated per source bitmap
pub const DEFAULT_RUNS: usize = 1;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_wfc";
/// Suffix added to collapse animation filenames
pub const VISUALIZATION_SUFFIX: &str = "_collapse";
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 40;
/// Multiplier applied to the delay of the final GIF frame
pub const FINAL_FRAME_HOLD: u32 = 25;
/// Upper bound on captured frames per animation
pub const MAX_GIF_FRAMES: usize = 400;

/// Parameters of one tile model and the grids generated from it
///
/// Built once (by the CLI or [`Default`]) and passed by reference into every
/// component; nothing mutates it afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Output grid width, in tiles
    pub grid_width: usize,
    /// Output grid height, in tiles
    pub grid_height: usize,
    /// Width of sampled tiles, in bitmap pixels
    pub tile_width: usize,
    /// Height of sampled tiles, in bitmap pixels
    pub tile_height: usize,
    /// Edge comparison used for adjacency
    pub adjacency: AdjacencyMode,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            grid_width: DEFAULT_GRID_SIZE,
            grid_height: DEFAULT_GRID_SIZE,
            tile_width: DEFAULT_TILE_SIZE,
            tile_height: DEFAULT_TILE_SIZE,
            adjacency: AdjacencyMode::Exact,
        }
    }
}

impl GenerationConfig {
    /// Check every dimension is within bounds
    ///
    /// Tile sizes are only checked against zero here; the bitmap-dependent
    /// bound is enforced when the catalog is built.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid parameter
    pub fn validate(&self) -> Result<()> {
        for (parameter, value, limit) in [
            ("grid_width", self.grid_width, MAX_GRID_DIMENSION),
            ("grid_height", self.grid_height, MAX_GRID_DIMENSION),
            ("tile_width", self.tile_width, usize::MAX),
            ("tile_height", self.tile_height, usize::MAX),
        ] {
            if value == 0 {
                return Err(invalid_parameter(parameter, &value, &"must be at least 1"));
            }
            if value > limit {
                return Err(invalid_parameter(
                    parameter,
                    &value,
                    &format!("must not exceed {limit}"),
                ));
            }
        }
        Ok(())
    }

    /// Number of cells in the output grid
    pub const fn cell_count(&self) -> usize {
        self.grid_width * self.grid_height
    }
}
