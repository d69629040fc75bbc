//! Command-line interface for batch generation from PNG source bitmaps

use crate::algorithm::adjacency::AdjacencyMode;
use crate::algorithm::executor::{RunResult, RunState, TileModel};
use crate::analysis::patterns::SourceBitmap;
use crate::analysis::statistics::OutputStatistics;
use crate::io::configuration::{
    DEFAULT_ATTEMPTS, DEFAULT_GRID_SIZE, DEFAULT_RUNS, DEFAULT_SEED, DEFAULT_TILE_SIZE,
    GIF_FRAME_DELAY_MS, GenerationConfig, OUTPUT_SUFFIX, VISUALIZATION_SUFFIX,
};
use crate::io::error::{Result, WithContext, invalid_parameter};
use crate::io::image::{RenderMode, export_grid_as_png};
use crate::io::progress::ProgressManager;
use crate::io::visualization::VisualizationCapture;
use clap::Parser;
use log::{LevelFilter, debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "tilewave")]
#[command(
    author,
    version,
    about = "Generate tiled patterns from a PNG using wave function collapse"
)]
/// Command-line arguments for the generator
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input PNG file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Output grid width in tiles (implies square if height not specified)
    #[arg(short = 'w', long)]
    pub width: Option<usize>,

    /// Output grid height in tiles
    #[arg(short = 'H', long)]
    pub height: Option<usize>,

    /// Tile width and height in source pixels
    #[arg(short, long, default_value_t = DEFAULT_TILE_SIZE)]
    pub tile_size: usize,

    /// Also accept neighbours whose shared edge matches when reversed
    #[arg(short, long)]
    pub mirror: bool,

    /// Restarts allowed per run after a contradiction
    #[arg(short, long, default_value_t = DEFAULT_ATTEMPTS)]
    pub attempts: usize,

    /// Number of independent outputs per input
    #[arg(short, long, default_value_t = DEFAULT_RUNS)]
    pub runs: usize,

    /// Render uncollapsed cells as a blend of their candidates
    #[arg(long)]
    pub superposition: bool,

    /// Write an animated GIF of the collapse
    #[arg(short = 'g', long)]
    pub visualize: bool,

    /// Suppress progress output and warnings
    #[arg(short, long)]
    pub quiet: bool,

    /// Log every collapse
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Log level selected by `--quiet` and `--verbose`
    pub const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        }
    }

    /// Render mode for the written PNG
    pub const fn render_mode(&self) -> RenderMode {
        if self.superposition {
            RenderMode::Superposition
        } else {
            RenderMode::Collapsed
        }
    }

    /// Configuration assembled from the arguments
    pub fn generation_config(&self) -> GenerationConfig {
        let (grid_height, grid_width) = match (self.height, self.width) {
            (Some(h), Some(w)) => (h, w),
            (Some(h), None) => (h, h),
            (None, Some(w)) => (w, w),
            (None, None) => (DEFAULT_GRID_SIZE, DEFAULT_GRID_SIZE),
        };

        GenerationConfig {
            grid_width,
            grid_height,
            tile_width: self.tile_size,
            tile_height: self.tile_size,
            adjacency: AdjacencyMode::from_mirror_aware(self.mirror),
        }
    }

    /// Seed of one attempt of one run
    ///
    /// Run 0, attempt 0 uses `seed` itself; every other pair gets its own
    /// offset.
    pub const fn run_seed(&self, run: usize, attempt: usize) -> u64 {
        let offset = run
            .wrapping_mul(self.attempts.wrapping_add(1))
            .wrapping_add(attempt);
        self.seed.wrapping_add(offset as u64)
    }

    /// Install a stderr logger at [`Self::log_level`]
    ///
    /// # Errors
    ///
    /// Returns an error if a logger is already installed
    pub fn init_logger(&self) -> Result<()> {
        fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "[{} {}] {}",
                    record.level(),
                    record.target(),
                    message
                ));
            })
            .level(self.log_level())
            .chain(std::io::stderr())
            .apply()?;
        Ok(())
    }
}

/// Orchestrates batch processing of PNG files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if target validation, generation, or export fails
    pub fn process(&mut self) -> Result<()> {
        self.cli.generation_config().validate()?;
        if self.cli.runs == 0 {
            return Err(invalid_parameter("runs", &self.cli.runs, &"must be at least 1"));
        }

        let files = self.collect_files()?;
        if files.is_empty() {
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for (index, file) in files.iter().enumerate() {
            self.process_file(file, index)?;
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    /// PNG files selected by the target, in sorted order
    ///
    /// # Errors
    ///
    /// Returns an error if the target is neither a PNG file nor a readable
    /// directory
    pub fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let target = &self.cli.target;
        if target.is_file() {
            if is_png(target) {
                Ok(self
                    .should_process_file(target)
                    .then(|| target.clone())
                    .into_iter()
                    .collect())
            } else {
                Err(invalid_parameter(
                    "target",
                    &target.display(),
                    &"must be a PNG image",
                ))
            }
        } else if target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(target)
                .with_path(target)
                .with_operation("read directory")?
            {
                let path = entry.with_path(target).with_operation("read directory")?.path();
                if is_png(&path) && !is_generated(&path) && self.should_process_file(&path) {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_parameter(
                "target",
                &target.display(),
                &"must be a PNG file or directory",
            ))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = output_path(input_path, 0, self.cli.runs);
        if output_path.exists() {
            info!("Skipping {} (output exists)", input_path.display());
            false
        } else {
            true
        }
    }

    fn process_file(&mut self, input_path: &Path, index: usize) -> Result<()> {
        let start_time = Instant::now();
        let config = self.cli.generation_config();

        let bitmap = SourceBitmap::from_png_file(input_path)?;
        let model = TileModel::build(bitmap.symbols(), &config)?;
        info!(
            "{}: {} symbols, {} tiles, {} adjacency rules",
            input_path.display(),
            bitmap.symbol_count(),
            model.catalog().len(),
            model.adjacency().rule_count()
        );

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path, config.cell_count());
        }

        for run in 0..self.cli.runs {
            let (result, capture) = self.run_with_restarts(&model, &bitmap, &config, index, run)?;

            if let Some(cell) = result.contradiction() {
                warn!(
                    "{}: run {} contradicted at {cell:?} after {} attempts, writing partial grid",
                    input_path.display(),
                    run + 1,
                    self.cli.attempts.saturating_add(1)
                );
            }

            let statistics = OutputStatistics::from_grid(result.grid(), model.catalog());
            info!(
                "{}: run {} used {} of {} tiles, distance to source weights {:.4}",
                input_path.display(),
                run + 1,
                statistics.distinct_tiles(),
                model.catalog().len(),
                statistics.total_variation_distance(model.catalog().weights())
            );

            export_grid_as_png(
                result.grid(),
                model.catalog(),
                bitmap.palette(),
                self.cli.render_mode(),
                &output_path(input_path, run, self.cli.runs),
            )?;

            if let Some(capture) = capture {
                capture.export_gif(
                    &visualization_path(input_path, run, self.cli.runs),
                    GIF_FRAME_DELAY_MS,
                )?;
            }
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index);
        }
        info!(
            "{}: finished in {:.2?}",
            input_path.display(),
            start_time.elapsed()
        );

        Ok(())
    }

    /// Run attempts until one finishes or the restart budget is spent
    fn run_with_restarts(
        &mut self,
        model: &TileModel,
        bitmap: &SourceBitmap,
        config: &GenerationConfig,
        index: usize,
        run: usize,
    ) -> Result<(RunResult, Option<VisualizationCapture>)> {
        let mut attempt = 0;
        loop {
            let seed = self.cli.run_seed(run, attempt);
            let outcome = self.run_attempt(model, bitmap, config, index, run, attempt, seed)?;
            if outcome.0.is_done() || attempt >= self.cli.attempts {
                return Ok(outcome);
            }
            debug!(
                "Run {} attempt {} with seed {seed} contradicted, restarting",
                run + 1,
                attempt + 1
            );
            attempt += 1;
        }
    }

    fn run_attempt(
        &mut self,
        model: &TileModel,
        bitmap: &SourceBitmap,
        config: &GenerationConfig,
        index: usize,
        run: usize,
        attempt: usize,
        seed: u64,
    ) -> Result<(RunResult, Option<VisualizationCapture>)> {
        let mut engine = model.engine(config.grid_height, config.grid_width, seed)?;
        let mut capture = self
            .cli
            .visualize
            .then(|| VisualizationCapture::new(bitmap.palette().to_vec(), config.cell_count()));

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_attempt(index, run, attempt);
        }
        if let Some(ref mut capture) = capture {
            capture.record_frame(engine.grid(), model.catalog())?;
        }

        // Each step collapses one cell, so the run is terminal within the budget
        for _ in 0..config.cell_count() {
            let state = engine.step()?;
            if let Some(ref mut pm) = self.progress_manager {
                pm.update_collapses(index, engine.collapses());
            }
            if let Some(ref mut capture) = capture {
                capture.record_step(engine.grid(), model.catalog())?;
            }
            if state != RunState::Running {
                break;
            }
        }

        if let Some(ref mut capture) = capture {
            capture.record_frame(engine.grid(), model.catalog())?;
        }

        Ok((engine.into_result()?, capture))
    }
}

fn is_png(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("png")
}

fn is_generated(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.contains(OUTPUT_SUFFIX))
}

fn run_file_name(input_path: &Path, suffix: &str, run: usize, runs: usize, extension: &str) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default().to_string_lossy();
    let name = if runs > 1 {
        format!("{stem}{suffix}_{}.{extension}", run + 1)
    } else {
        format!("{stem}{suffix}.{extension}")
    };

    if let Some(parent) = input_path.parent() {
        parent.join(name)
    } else {
        PathBuf::from(name)
    }
}

/// Path of the PNG written for one run
///
/// A run number is appended only when more than one run is requested.
pub fn output_path(input_path: &Path, run: usize, runs: usize) -> PathBuf {
    run_file_name(input_path, OUTPUT_SUFFIX, run, runs, "png")
}

/// Path of the collapse animation written for one run
pub fn visualization_path(input_path: &Path, run: usize, runs: usize) -> PathBuf {
    run_file_name(input_path, VISUALIZATION_SUFFIX, run, runs, "gif")
}
