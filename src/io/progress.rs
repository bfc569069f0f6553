//! Progress display for multi-run generation

use std::sync::LazyLock;

use indicatif::{ProgressBar, ProgressStyle};

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{prefix} [{bar:30.cyan/blue}] {pos}/{len} cells {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// One bar per run, counting collapsed cells and contradiction resets
pub struct ProgressManager {
    bar: Option<ProgressBar>,
    runs: usize,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a progress manager with no active bar
    pub const fn new() -> Self {
        Self { bar: None, runs: 0 }
    }

    /// Set the number of runs shown in each bar's prefix
    pub const fn initialize(&mut self, runs: usize) {
        self.runs = runs;
    }

    /// Show a fresh bar for a run over `cells` cells
    pub fn start_run(&mut self, index: usize, tileset: &str, cells: usize) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
        let bar = ProgressBar::new(cells as u64);
        bar.set_style(PROGRESS_STYLE.clone());
        bar.set_prefix(format!("{tileset} {}/{}", index + 1, self.runs.max(index + 1)));
        self.bar = Some(bar);
    }

    /// Report the number of collapsed cells and resets so far
    pub fn update(&self, collapsed: usize, resets: usize) {
        if let Some(bar) = &self.bar {
            bar.set_position(collapsed as u64);
            if resets > 0 {
                bar.set_message(format!("({resets} resets)"));
            }
        }
    }

    /// Mark the current run as finished
    pub fn complete_run(&mut self, resets: usize) {
        if let Some(bar) = self.bar.take() {
            bar.finish_with_message(format!("✓ ({resets} resets)"));
        }
    }

    /// Clean up any remaining display
    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
