//! Runtime tile weights with deferred enable/disable switches
//!
//! Weight edits apply at once, but switching a base tile on or off is only
//! staged: the staged switches become active when the grid is next reset,
//! so a running grid never loses tiles it may already have placed.

use crate::algorithm::bitset::TileBitset;
use crate::io::configuration::{MAX_TILE_WEIGHT, MIN_TILE_WEIGHT};
use crate::io::error::{Result, WfcError, invalid_parameter};
use crate::tileset::model::AdjacencyModel;

/// Current and saved weights plus active and staged enable switches
#[derive(Debug, Clone)]
pub struct WeightSwitchboard {
    /// Weights used for sampling, zero while a tile is disabled
    current: Vec<u32>,
    /// Weights a disabled tile returns to when enabled again
    saved: Vec<u32>,
    /// Switches in effect for the running grid
    active: Vec<bool>,
    /// Switches that take effect at the next reset
    staged: Vec<bool>,
    /// Variant mask of enabled base tiles, kept in step with `active`
    enabled_mask: TileBitset,
}

impl WeightSwitchboard {
    /// Start from the declared weights with every tile enabled
    pub fn new(model: &AdjacencyModel) -> Self {
        let base_count = model.base_count();
        Self {
            current: model.weights().to_vec(),
            saved: model.weights().to_vec(),
            active: vec![true; base_count],
            staged: vec![true; base_count],
            enabled_mask: TileBitset::all(model.variant_count()),
        }
    }

    /// Sampling weight of a base tile
    pub fn weight(&self, base: usize) -> u32 {
        self.current.get(base).copied().unwrap_or(0)
    }

    /// Sampling weights of every base tile
    pub fn weights(&self) -> &[u32] {
        &self.current
    }

    /// Whether a base tile is enabled for the running grid
    pub fn is_enabled(&self, base: usize) -> bool {
        self.active.get(base).copied().unwrap_or(false)
    }

    /// Whether a base tile will be enabled after the next reset
    pub fn is_staged_enabled(&self, base: usize) -> bool {
        self.staged.get(base).copied().unwrap_or(false)
    }

    /// Variants of enabled base tiles, intersected into every propagation
    pub const fn enabled_mask(&self) -> &TileBitset {
        &self.enabled_mask
    }

    /// Change the sampling weight of a base tile
    ///
    /// A disabled tile keeps the new value aside until it is enabled again.
    ///
    /// # Errors
    ///
    /// Returns an error if the base tile does not exist or the weight lies
    /// outside `MIN_TILE_WEIGHT..=MAX_TILE_WEIGHT`
    pub fn set_weight(&mut self, base: usize, weight: u32) -> Result<()> {
        self.check_base(base)?;
        if !(MIN_TILE_WEIGHT..=MAX_TILE_WEIGHT).contains(&weight) {
            return Err(invalid_parameter(
                "weight",
                &weight,
                &format!("must lie between {MIN_TILE_WEIGHT} and {MAX_TILE_WEIGHT}"),
            ));
        }
        let slot = if self.is_enabled(base) {
            self.current.get_mut(base)
        } else {
            self.saved.get_mut(base)
        };
        if let Some(slot) = slot {
            *slot = weight;
        }
        Ok(())
    }

    /// Stage a base tile to be switched on or off at the next reset
    ///
    /// # Errors
    ///
    /// Returns an error if the base tile does not exist
    pub fn set_enabled(&mut self, base: usize, enabled: bool) -> Result<()> {
        self.check_base(base)?;
        if let Some(slot) = self.staged.get_mut(base) {
            *slot = enabled;
        }
        Ok(())
    }

    /// Make the staged switches active, migrating weights of toggled tiles
    ///
    /// Tiles leaving the disabled state get their saved weight back; tiles
    /// entering it save their weight and sample with zero.
    pub fn commit(&mut self, model: &AdjacencyModel) {
        for base in 0..self.current.len() {
            let was_enabled = self.is_enabled(base);
            let will_enable = self.is_staged_enabled(base);
            if let (Some(current), Some(saved)) =
                (self.current.get_mut(base), self.saved.get_mut(base))
            {
                if !was_enabled {
                    *current = *saved;
                }
                if !will_enable {
                    *saved = *current;
                    *current = 0;
                }
            }
        }
        self.active.clone_from(&self.staged);
        self.enabled_mask = model.mask_of_bases(
            self.active
                .iter()
                .enumerate()
                .filter_map(|(base, &enabled)| enabled.then_some(base)),
        );
    }

    fn check_base(&self, base: usize) -> Result<()> {
        if base < self.current.len() {
            Ok(())
        } else {
            Err(WfcError::InvalidTileIndex {
                index: base,
                max_tiles: self.current.len(),
            })
        }
    }
}
