use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::algorithm::bitset::TileBitset;
use crate::algorithm::entropy::EntropyIndex;
use crate::io::error::{Result, WfcError};
use crate::spatial::grid::Position;
use crate::tileset::model::AdjacencyModel;
use crate::tileset::weights::WeightSwitchboard;

/// Seeded random selector for reproducible stochastic choices
#[derive(Debug, Clone)]
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform choice of one element
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        match items.len() {
            0 => None,
            1 => items.first(),
            len => items.get(self.rng.random_range(0..len)),
        }
    }

    /// Integer-weighted random selection
    ///
    /// Returns an index into `weights` drawn with probability proportional
    /// to its weight, or `None` when the weights sum to zero.
    pub fn weighted_choice(&mut self, weights: &[u32]) -> Option<usize> {
        let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
        if total == 0 {
            return None;
        }

        let mut remaining = self.rng.random_range(0..total);
        for (i, &weight) in weights.iter().enumerate() {
            let weight = u64::from(weight);
            if remaining < weight {
                return Some(i);
            }
            remaining -= weight;
        }
        None
    }
}

/// Pick the next cell to collapse from the lowest-entropy bucket
///
/// A lone cell is taken as is; ties are broken uniformly by position.
pub fn select_next_cell(
    entropy: &EntropyIndex,
    selector: &mut RandomSelector,
) -> Option<(Position, usize)> {
    let (lowest, cells) = entropy.minimum()?;
    selector.pick(cells).map(|&position| (position, lowest))
}

/// Choose the bit-identity a cell collapses to
///
/// Each still-possible variant is weighted by its base tile's current
/// weight. A cell that already holds one variant keeps it.
///
/// # Errors
///
/// Returns [`WfcError::ZeroTotalWeight`] if the cell is empty or every
/// remaining variant weighs zero
pub fn choose_variant(
    position: Position,
    possibilities: &TileBitset,
    model: &AdjacencyModel,
    weights: &WeightSwitchboard,
    selector: &mut RandomSelector,
) -> Result<usize> {
    if let Some(bit) = possibilities.sole() {
        return Ok(bit);
    }

    let candidates = possibilities.to_vec();
    let candidate_weights: Vec<u32> = candidates
        .iter()
        .map(|&bit| {
            model
                .variant_of(bit)
                .map_or(0, |variant| weights.weight(variant.base))
        })
        .collect();

    selector
        .weighted_choice(&candidate_weights)
        .and_then(|chosen| candidates.get(chosen).copied())
        .ok_or(WfcError::ZeroTotalWeight {
            position,
            candidates: candidates.len(),
        })
}
