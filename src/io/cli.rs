//! Command-line interface for headless tile-grid generation

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;

use crate::algorithm::executor::TickOutcome;
use crate::io::catalog::TilesetCatalog;
use crate::io::configuration::{
    DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, DEFAULT_MAX_RESETS, DEFAULT_RUNS, DEFAULT_SEED,
    DEFAULT_SPEED, DEFAULT_TILESET_DIR, OUTPUT_SUFFIX, TILE_SIZE,
};
use crate::io::error::{Result, WfcError};
use crate::io::image::{SpriteSheet, blank_canvas, draw_cell, export_grid_as_png};
use crate::io::progress::ProgressManager;
use crate::io::session::{Session, SessionConfig};
use crate::io::visualization::{UpdateReplay, frame_delay_ms};

#[derive(Parser, Debug)]
#[command(name = "wavetile")]
#[command(
    author,
    version,
    about = "Fill a tile grid with wavefunction collapse over a tileset's edge rules"
)]
/// Command-line arguments for the generation tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Directory holding one sub-directory per tileset
    #[arg(value_name = "TILESETS", default_value = DEFAULT_TILESET_DIR)]
    pub tilesets: PathBuf,

    /// Tileset to use (picked at random when omitted)
    #[arg(short, long)]
    pub tileset: Option<String>,

    /// Grid columns
    #[arg(short = 'W', long, default_value_t = DEFAULT_GRID_WIDTH)]
    pub width: usize,

    /// Grid rows
    #[arg(short = 'H', long, default_value_t = DEFAULT_GRID_HEIGHT)]
    pub height: usize,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Number of grids to generate
    #[arg(short, long, default_value_t = DEFAULT_RUNS)]
    pub runs: usize,

    /// Contradiction resets allowed per grid before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_RESETS)]
    pub max_resets: usize,

    /// Override a base tile's weight, as TILE=WEIGHT
    #[arg(long = "weight", value_name = "TILE=WEIGHT", value_parser = parse_weight)]
    pub weights: Vec<(usize, u32)>,

    /// Switch a base tile off
    #[arg(long = "disable", value_name = "TILE")]
    pub disabled: Vec<usize>,

    /// Collapses per second in the animated replay
    #[arg(long, default_value_t = DEFAULT_SPEED)]
    pub speed: u32,

    /// Also write an animated GIF of each grid being filled
    #[arg(short = 'g', long)]
    pub visualize: bool,

    /// Write one page per variant showing its allowed right-hand neighbours
    #[arg(short, long)]
    pub inspect: bool,

    /// Directory to write images into
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Raise log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Grid size, seed and pacing for the session
    pub const fn session_config(&self) -> SessionConfig {
        SessionConfig {
            width: self.width,
            height: self.height,
            seed: self.seed,
            speed: self.speed,
        }
    }
}

/// Parse a `TILE=WEIGHT` override
///
/// # Errors
///
/// Returns a message if either side is missing or not a number
pub fn parse_weight(text: &str) -> std::result::Result<(usize, u32), String> {
    let (tile, weight) = text
        .split_once('=')
        .ok_or_else(|| format!("expected TILE=WEIGHT, got '{text}'"))?;
    let tile = tile
        .trim()
        .parse()
        .map_err(|e| format!("invalid tile index '{tile}': {e}"))?;
    let weight = weight
        .trim()
        .parse()
        .map_err(|e| format!("invalid weight '{weight}': {e}"))?;
    Ok((tile, weight))
}

/// Drives a session from the command line and writes its images
pub struct Runner {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl Runner {
    /// Create a runner for the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Generate or inspect according to the CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the tileset cannot be loaded, an override is
    /// invalid, a grid exceeds its reset limit, or an image cannot be written
    pub fn run(&mut self) -> Result<()> {
        let mut session = Session::open(
            TilesetCatalog::new(&self.cli.tilesets),
            self.cli.tileset.as_deref(),
            self.cli.session_config(),
        )?;
        self.apply_overrides(&mut session)?;
        let sheet = Self::sprite_sheet(&session)?;

        if self.cli.inspect {
            return self.inspect(&mut session, &sheet);
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(self.cli.runs);
        }
        for run in 0..self.cli.runs {
            self.generate(&mut session, &sheet, run)?;
        }
        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }
        Ok(())
    }

    fn apply_overrides(&self, session: &mut Session) -> Result<()> {
        for &(tile, weight) in &self.cli.weights {
            session.set_base_tile_weight(tile, weight)?;
        }
        for &tile in &self.cli.disabled {
            session.set_base_tile_enabled(tile, false)?;
        }
        if !self.cli.disabled.is_empty() {
            // Switches only take effect on a fresh grid
            session.reset();
        }
        Ok(())
    }

    fn sprite_sheet(session: &Session) -> Result<SpriteSheet> {
        let sprite_count = session.model().sprite_count();
        match &session.tileset().image {
            Some(path) => SpriteSheet::load(path, sprite_count),
            None => {
                tracing::info!(
                    tileset = %session.tileset().name,
                    "no sprite strip found, drawing placeholder tiles"
                );
                Ok(SpriteSheet::placeholder(sprite_count, TILE_SIZE))
            }
        }
    }

    fn generate(&mut self, session: &mut Session, sheet: &SpriteSheet, run: usize) -> Result<()> {
        let start_time = Instant::now();
        if run > 0 {
            session.reset();
        }

        let cells = session.engine().grid().cell_count();
        if let Some(ref mut pm) = self.progress_manager {
            pm.start_run(run, &session.tileset().name, cells);
        }

        let mut resets = 0;
        loop {
            match session.engine_mut().tick()? {
                TickOutcome::Idle | TickOutcome::Completed(_) => break,
                TickOutcome::Collapsed(_) => {}
                TickOutcome::Reset { .. } => {
                    resets += 1;
                    if resets > self.cli.max_resets {
                        return Err(WfcError::ResetLimitExceeded { resets });
                    }
                }
            }
            if let Some(ref pm) = self.progress_manager {
                pm.update(session.engine().updates().len(), resets);
            }
        }

        let engine = session.engine();
        let stem = self.output_stem(&session.tileset().name, run);
        export_grid_as_png(
            engine.grid(),
            engine.model(),
            sheet,
            &stem.with_extension("png"),
        )?;

        if self.cli.visualize {
            let grid = engine.grid();
            UpdateReplay::new(engine.updates(), grid.width(), grid.height()).export_gif(
                engine.model(),
                sheet,
                frame_delay_ms(self.cli.speed),
                &stem.with_extension("gif"),
            )?;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_run(resets);
        }
        tracing::info!(
            run = run + 1,
            resets,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            output = %stem.display(),
            "grid generated"
        );
        Ok(())
    }

    fn inspect(&self, session: &mut Session, sheet: &SpriteSheet) -> Result<()> {
        let (width, height) = {
            let grid = session.engine().grid();
            (grid.width(), grid.height())
        };
        let name = session.tileset().name.clone();

        while let Some(page) = session.inspect_next() {
            let mut canvas = blank_canvas(sheet, width, height);
            for cell in &page.cells {
                draw_cell(&mut canvas, sheet, session.model(), *cell)?;
            }
            let path = self.cli.output.join(format!(
                "{name}_inspect_{}_{}.png",
                page.subject.base, page.subject.orientation
            ));
            save_canvas(&canvas, &path)?;
        }
        Ok(())
    }

    fn output_stem(&self, tileset: &str, run: usize) -> PathBuf {
        let name = if self.cli.runs > 1 {
            format!("{tileset}{OUTPUT_SUFFIX}_{}", run + 1)
        } else {
            format!("{tileset}{OUTPUT_SUFFIX}")
        };
        self.cli.output.join(name)
    }
}

fn save_canvas(canvas: &image::RgbaImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| WfcError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }
    canvas.save(path).map_err(|e| WfcError::ImageExport {
        path: path.to_path_buf(),
        source: e,
    })
}
