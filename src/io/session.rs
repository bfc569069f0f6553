//! Control surface a presenter drives between frames
//!
//! A [`Session`] ties the tileset catalog, the collapse engine, the tick
//! scheduler and the debug inspector together. Commands are applied
//! between ticks, never during one.

use std::sync::Arc;
use std::time::Duration;

use crate::algorithm::executor::{CellView, CollapseEngine};
use crate::algorithm::inspector::{InspectorPage, TilesetInspector};
use crate::algorithm::schedule::{Advance, Scheduler};
use crate::algorithm::selection::RandomSelector;
use crate::io::catalog::{TilesetCatalog, TilesetPaths};
use crate::io::error::Result;
use crate::spatial::grid::Position;
use crate::tileset::compiler::compile_file;
use crate::tileset::model::AdjacencyModel;

/// Grid size, seed and pacing for a new session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Grid columns
    pub width: usize,
    /// Grid rows
    pub height: usize,
    /// Seed for tileset choice and generation
    pub seed: u64,
    /// Ticks per second
    pub speed: u32,
}

/// Running generation over one tileset of a catalog
pub struct Session {
    catalog: TilesetCatalog,
    tileset: TilesetPaths,
    engine: CollapseEngine,
    scheduler: Scheduler,
    inspector: TilesetInspector,
}

impl Session {
    /// Load a tileset from the catalog and start a fresh grid
    ///
    /// With no name given a tileset is picked at random.
    ///
    /// # Errors
    ///
    /// Returns an error if the tileset cannot be found or compiled, or the
    /// grid size or speed is out of range
    pub fn open(catalog: TilesetCatalog, name: Option<&str>, config: SessionConfig) -> Result<Self> {
        let tileset = match name {
            Some(name) => catalog.resolve(name)?,
            None => catalog.pick(&mut RandomSelector::new(config.seed))?,
        };
        let model = Arc::new(compile_file(&tileset.data)?);
        let engine = CollapseEngine::new(model, config.width, config.height, config.seed)?;
        let scheduler = Scheduler::new(config.speed)?;
        tracing::info!(tileset = %tileset.name, "session started");

        Ok(Self {
            catalog,
            tileset,
            engine,
            scheduler,
            inspector: TilesetInspector::new(),
        })
    }

    /// Discard the grid and start again at full entropy
    pub fn reset(&mut self) {
        self.engine.reset();
        self.scheduler.clear();
    }

    /// Pause or resume generation
    pub const fn set_running(&mut self, running: bool) {
        self.engine.set_running(running);
    }

    /// Change the tick rate
    ///
    /// # Errors
    ///
    /// Returns an error if `speed` exceeds `MAX_SPEED`
    pub fn set_speed(&mut self, speed: u32) -> Result<()> {
        self.scheduler.set_speed(speed)
    }

    /// Switch to another tileset of the catalog
    ///
    /// The new tileset is compiled before anything is discarded; on error
    /// the current tileset and grid stay as they were.
    ///
    /// # Errors
    ///
    /// Returns an error if the tileset does not exist or fails to compile
    pub fn set_tileset_directory(&mut self, name: &str) -> Result<()> {
        let tileset = self.catalog.resolve(name)?;
        let model = compile_file(&tileset.data).inspect_err(|error| {
            tracing::warn!(tileset = name, %error, "keeping current tileset");
        })?;

        self.engine.replace_model(Arc::new(model));
        self.scheduler.clear();
        self.inspector.rewind();
        tracing::info!(from = %self.tileset.name, to = %tileset.name, "tileset changed");
        self.tileset = tileset;
        Ok(())
    }

    /// Change a base tile's sampling weight
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown base tile or an out-of-range weight
    pub fn set_base_tile_weight(&mut self, base: usize, weight: u32) -> Result<()> {
        self.engine.set_base_tile_weight(base, weight)
    }

    /// Stage a base tile to be switched on or off at the next reset
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown base tile
    pub fn set_base_tile_enabled(&mut self, base: usize, enabled: bool) -> Result<()> {
        self.engine.set_base_tile_enabled(base, enabled)
    }

    /// Spend one frame's worth of time on generation
    ///
    /// # Errors
    ///
    /// Propagates errors raised while collapsing
    pub fn advance(&mut self, elapsed: Duration) -> Result<Advance> {
        self.scheduler.advance(&mut self.engine, elapsed)
    }

    /// Next page of the debug inspector for the current tileset
    pub fn inspect_next(&mut self) -> Option<InspectorPage> {
        let grid = self.engine.grid();
        let (width, height) = (grid.width(), grid.height());
        self.inspector
            .next_page(self.engine.model(), width, height)
    }

    /// Drawing view of a cell
    pub fn cell(&self, position: Position) -> Option<CellView> {
        self.engine.cell_view(position)
    }

    /// Files of the current tileset
    pub const fn tileset(&self) -> &TilesetPaths {
        &self.tileset
    }

    /// Compiled model of the current tileset
    pub fn model(&self) -> &Arc<AdjacencyModel> {
        self.engine.model()
    }

    /// The collapse engine
    pub const fn engine(&self) -> &CollapseEngine {
        &self.engine
    }

    /// Mutable access to the collapse engine
    pub const fn engine_mut(&mut self) -> &mut CollapseEngine {
        &mut self.engine
    }

    /// The tick scheduler
    pub const fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// The tileset catalog
    pub const fn catalog(&self) -> &TilesetCatalog {
        &self.catalog
    }
}
