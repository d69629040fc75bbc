//! Collapse progress display across files, with batching for large sets

use crate::io::configuration::{MAX_INDIVIDUAL_PROGRESS_BARS, PROGRESS_BAR_WIDTH};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

static COLLAPSE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{msg}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{prefix}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] Files: [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

#[derive(Clone, Debug, Default)]
struct FileProgress {
    name: String,
    label: String,
    collapsed: usize,
    cells: usize,
}

/// Tracks collapsed cells per file
///
/// Shows one bar per recent file, and adds a single batch bar once the file
/// count exceeds [`MAX_INDIVIDUAL_PROGRESS_BARS`].
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    file_bars: Vec<ProgressBar>,
    files: Vec<FileProgress>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            file_bars: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Allocate bars for `file_count` files
    pub fn initialize(&mut self, file_count: usize) {
        if file_count > MAX_INDIVIDUAL_PROGRESS_BARS + 1 {
            let batch_bar = ProgressBar::new(file_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        for _ in 0..file_count.min(MAX_INDIVIDUAL_PROGRESS_BARS) {
            let bar = ProgressBar::new(0);
            bar.set_style(COLLAPSE_STYLE.clone());
            self.file_bars.push(self.multi_progress.add(bar));
        }
    }

    /// Begin tracking a file whose grids hold `cells` cells
    pub fn start_file(&mut self, index: usize, path: &Path, cells: usize) {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if index >= self.files.len() {
            self.files.resize(index + 1, FileProgress::default());
        }
        if let Some(file) = self.files.get_mut(index) {
            *file = FileProgress {
                name,
                label: String::new(),
                collapsed: 0,
                cells,
            };
        }
        self.update_bars();
    }

    /// Reset the bar for a new attempt of a run
    pub fn start_attempt(&mut self, index: usize, run: usize, attempt: usize) {
        if let Some(file) = self.files.get_mut(index) {
            file.collapsed = 0;
            file.label = if attempt == 0 {
                format!("run {}", run + 1)
            } else {
                format!("run {} retry {attempt}", run + 1)
            };
        }
        self.update_bars();
    }

    /// Report the number of collapsed cells
    pub fn update_collapses(&mut self, index: usize, collapsed: usize) {
        if let Some(file) = self.files.get_mut(index) {
            file.collapsed = collapsed;
        }
        self.update_bars();
    }

    /// Mark a file as finished
    pub fn complete_file(&mut self, index: usize) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }

        if let Some(file) = self.files.get_mut(index) {
            file.name = format!("✓ {}", file.name);
            file.collapsed = file.cells;
            file.label.clear();
        }
        self.update_bars();
    }

    /// Collapsed and total cells of a tracked file
    pub fn file_progress(&self, index: usize) -> Option<(usize, usize)> {
        self.files
            .get(index)
            .filter(|f| !f.name.is_empty())
            .map(|f| (f.collapsed, f.cells))
    }

    /// Remove every bar from the terminal
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All files processed");
        }
        let _ = self.multi_progress.clear();
    }

    /// Point the bars at the most recent files
    fn update_bars(&self) {
        let active: Vec<&FileProgress> = self.files.iter().filter(|f| !f.name.is_empty()).collect();
        let start = active.len().saturating_sub(MAX_INDIVIDUAL_PROGRESS_BARS);
        let visible = active.get(start..).unwrap_or(&[]);

        for (bar, file) in self.file_bars.iter().zip(visible) {
            bar.set_length(file.cells as u64);
            bar.set_position(file.collapsed as u64);
            let width = file.cells.to_string().len();
            bar.set_message(format!("{:>width$}/{}", file.collapsed, file.cells));
            if file.label.is_empty() {
                bar.set_prefix(file.name.clone());
            } else {
                bar.set_prefix(format!("{} ({})", file.name, file.label));
            }
        }

        for bar in self.file_bars.iter().skip(visible.len()) {
            bar.set_length(0);
            bar.set_position(0);
            bar.set_message(String::new());
            bar.set_prefix(String::new());
        }
    }
}
