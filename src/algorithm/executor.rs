use std::sync::Arc;

use crate::algorithm::bitset::TileBitset;
use crate::algorithm::entropy::EntropyIndex;
use crate::algorithm::propagation::{Propagation, propagate};
use crate::algorithm::selection::{RandomSelector, choose_variant, select_next_cell};
use crate::io::configuration::MAX_GRID_DIMENSION;
use crate::io::error::{Result, WfcError, invalid_parameter};
use crate::spatial::grid::{Grid, Position};
use crate::tileset::model::{AdjacencyModel, TileVariant};
use crate::tileset::weights::WeightSwitchboard;

/// One cell collapse, in the order the engine performed them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellUpdate {
    /// Cell that was collapsed
    pub position: Position,
    /// Variant it collapsed to
    pub variant: TileVariant,
}

/// Read-only view of a cell for drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellView {
    /// Whether the cell has been collapsed
    pub resolved: bool,
    /// Base tile index, zero while unresolved
    pub base: usize,
    /// Orientation, zero while unresolved
    pub orientation: usize,
}

/// What a single [`CollapseEngine::tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Paused, or nothing left to collapse
    Idle,
    /// One cell collapsed and its constraints propagated
    Collapsed(CellUpdate),
    /// The last uncollapsed cell collapsed
    Completed(CellUpdate),
    /// Propagation emptied a cell and the grid was reset
    Reset {
        /// Cell whose possibilities emptied
        position: Position,
        /// Cell being propagated from at the time
        frontier: Position,
    },
}

/// Totals for a [`CollapseEngine::run_until_collapsed`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks that collapsed a cell
    pub collapses: usize,
    /// Resets caused by contradictions
    pub resets: usize,
}

/// Wavefunction collapse engine over a fixed-size grid
///
/// Owns the adjacency model reference, the cell grid, the entropy worklist,
/// the random generator and the weight switches. Every tick runs one
/// collapse and its full propagation to completion.
pub struct CollapseEngine {
    model: Arc<AdjacencyModel>,
    weights: WeightSwitchboard,
    grid: Grid,
    entropy: EntropyIndex,
    selector: RandomSelector,
    updates: Vec<CellUpdate>,
    running: bool,
    collapsed: bool,
    contradictions: usize,
}

impl CollapseEngine {
    /// Create an engine with every cell at full entropy
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or exceeds
    /// `MAX_GRID_DIMENSION`
    pub fn new(model: Arc<AdjacencyModel>, width: usize, height: usize, seed: u64) -> Result<Self> {
        for (parameter, value) in [("width", width), ("height", height)] {
            if value == 0 || value > MAX_GRID_DIMENSION {
                return Err(invalid_parameter(
                    parameter,
                    &value,
                    &format!("must lie between 1 and {MAX_GRID_DIMENSION}"),
                ));
            }
        }

        let variant_count = model.variant_count();
        let mut entropy = EntropyIndex::new(width, height);
        entropy.fill(height, variant_count);

        Ok(Self {
            weights: WeightSwitchboard::new(&model),
            grid: Grid::new(width, height, variant_count),
            entropy,
            selector: RandomSelector::new(seed),
            updates: Vec::with_capacity(width * height),
            running: true,
            collapsed: false,
            contradictions: 0,
            model,
        })
    }

    /// Discard the grid and start again at full entropy
    ///
    /// Staged tile switches become active here.
    pub fn reset(&mut self) {
        self.weights.commit(&self.model);
        self.grid.reset(self.model.variant_count());
        self.entropy
            .fill(self.grid.height(), self.model.variant_count());
        self.updates.clear();
        self.collapsed = false;
        tracing::debug!(
            width = self.grid.width(),
            height = self.grid.height(),
            "grid reset"
        );
    }

    /// Swap in a newly compiled tileset and restart the grid
    ///
    /// Weights and switches start over from the new tileset's declarations.
    pub fn replace_model(&mut self, model: Arc<AdjacencyModel>) {
        self.weights = WeightSwitchboard::new(&model);
        self.model = model;
        self.reset();
    }

    /// Collapse the next cell and propagate its constraints
    ///
    /// # Errors
    ///
    /// Returns [`WfcError::ZeroTotalWeight`] if the chosen cell only holds
    /// variants of zero weight; the grid is left untouched in that case
    pub fn tick(&mut self) -> Result<TickOutcome> {
        if !self.running || self.collapsed {
            return Ok(TickOutcome::Idle);
        }

        let Some((position, _)) = select_next_cell(&self.entropy, &mut self.selector) else {
            self.collapsed = true;
            return Ok(TickOutcome::Idle);
        };
        let update = self.collapse_cell(position)?;

        if self.entropy.is_empty() {
            return Ok(self.complete(update));
        }

        match propagate(
            &mut self.grid,
            &mut self.entropy,
            &self.model,
            self.weights.enabled_mask(),
            position,
        ) {
            Propagation::Contradiction {
                position: emptied,
                frontier,
            } => {
                tracing::warn!(
                    x = frontier.x,
                    y = frontier.y,
                    emptied_x = emptied.x,
                    emptied_y = emptied.y,
                    "tile cannot be collapsed, resetting grid"
                );
                self.contradictions += 1;
                self.reset();
                Ok(TickOutcome::Reset {
                    position: emptied,
                    frontier,
                })
            }
            Propagation::Settled { .. } if self.entropy.is_empty() => Ok(self.complete(update)),
            Propagation::Settled { .. } => Ok(TickOutcome::Collapsed(update)),
        }
    }

    /// Tick until the grid is fully collapsed or the engine is paused
    ///
    /// # Errors
    ///
    /// Returns [`WfcError::ResetLimitExceeded`] once more than `max_resets`
    /// contradictions occur, or any error raised by [`CollapseEngine::tick`]
    pub fn run_until_collapsed(&mut self, max_resets: usize) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        loop {
            match self.tick()? {
                TickOutcome::Idle => return Ok(summary),
                TickOutcome::Collapsed(_) => summary.collapses += 1,
                TickOutcome::Completed(_) => {
                    summary.collapses += 1;
                    return Ok(summary);
                }
                TickOutcome::Reset { .. } => {
                    summary.resets += 1;
                    if summary.resets > max_resets {
                        return Err(WfcError::ResetLimitExceeded {
                            resets: summary.resets,
                        });
                    }
                }
            }
        }
    }

    fn collapse_cell(&mut self, position: Position) -> Result<CellUpdate> {
        let possibilities = self
            .grid
            .possibilities(position)
            .cloned()
            .unwrap_or_else(|| TileBitset::new(self.model.variant_count()));
        let bit = choose_variant(
            position,
            &possibilities,
            &self.model,
            &self.weights,
            &mut self.selector,
        )?;
        let variant = self
            .model
            .variant_of(bit)
            .ok_or(WfcError::InvalidTileIndex {
                index: bit,
                max_tiles: self.model.variant_count(),
            })?;

        if let Some(mask) = self.grid.possibilities_mut(position) {
            *mask = TileBitset::single(self.model.variant_count(), bit);
        }
        self.grid.set_resolved(position, variant);
        self.entropy.remove(position);

        let update = CellUpdate { position, variant };
        self.updates.push(update);
        Ok(update)
    }

    fn complete(&mut self, update: CellUpdate) -> TickOutcome {
        self.collapsed = true;
        tracing::info!(
            cells = self.grid.cell_count(),
            contradictions = self.contradictions,
            "grid fully collapsed"
        );
        TickOutcome::Completed(update)
    }

    /// Pause or resume ticking
    pub const fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Whether ticks currently do work
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Whether every cell has been collapsed
    pub const fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Change a base tile's sampling weight
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown base tile or an out-of-range weight
    pub fn set_base_tile_weight(&mut self, base: usize, weight: u32) -> Result<()> {
        self.weights.set_weight(base, weight)
    }

    /// Stage a base tile to be switched on or off at the next reset
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown base tile
    pub fn set_base_tile_enabled(&mut self, base: usize, enabled: bool) -> Result<()> {
        self.weights.set_enabled(base, enabled)
    }

    /// Drawing view of a cell
    pub fn cell_view(&self, position: Position) -> Option<CellView> {
        if !self.grid.contains(position) {
            return None;
        }
        Some(self.grid.resolved(position).map_or(
            CellView {
                resolved: false,
                base: 0,
                orientation: 0,
            },
            |variant| CellView {
                resolved: true,
                base: variant.base,
                orientation: variant.orientation,
            },
        ))
    }

    /// Collapses since the last reset, oldest first
    pub fn updates(&self) -> &[CellUpdate] {
        &self.updates
    }

    /// Contradictions met over the engine's lifetime
    pub const fn contradictions(&self) -> usize {
        self.contradictions
    }

    /// The adjacency model in use
    pub fn model(&self) -> &Arc<AdjacencyModel> {
        &self.model
    }

    /// The cell grid
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The entropy worklist
    pub const fn entropy(&self) -> &EntropyIndex {
        &self.entropy
    }

    /// Runtime weights and switches
    pub const fn weights(&self) -> &WeightSwitchboard {
        &self.weights
    }
}
