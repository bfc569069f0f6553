use std::collections::VecDeque;

use crate::algorithm::bitset::TileBitset;
use crate::algorithm::entropy::EntropyIndex;
use crate::spatial::grid::{Direction, Grid, Position};
use crate::tileset::model::AdjacencyModel;

/// Result of one breadth-first propagation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Every reachable neighbour is consistent again
    Settled {
        /// Cells taken off the queue during the pass
        visited: usize,
        /// Cells whose possibility set shrank
        narrowed: usize,
    },
    /// A cell ran out of possibilities
    Contradiction {
        /// The cell whose possibility set emptied
        position: Position,
        /// The cell being processed when it emptied
        frontier: Position,
    },
}

impl Propagation {
    /// Whether the pass ended in a contradiction
    pub const fn is_contradiction(&self) -> bool {
        matches!(self, Self::Contradiction { .. })
    }
}

/// Union of every variant that may sit next to any of `possibilities`
///
/// Each possible variant is turned so its edge facing `direction` becomes
/// the canonical right edge, its right-neighbour mask is looked up, and the
/// mask is turned back into the grid's frame.
pub fn allowed_neighbors(
    possibilities: &TileBitset,
    direction: Direction,
    model: &AdjacencyModel,
) -> TileBitset {
    let rotation = model.rotation();
    let mut allowed = TileBitset::new(model.variant_count());
    for bit in possibilities.iter_ones() {
        let canonical = rotation.into_right_frame(bit, direction);
        if let Some(right) = model.connects_to(canonical) {
            allowed.union_with(&rotation.out_of_right_frame(right, direction));
        }
    }
    allowed
}

/// Restore arc consistency outward from a freshly collapsed cell
///
/// Neighbours already down to one variant, or already processed in this
/// pass, are left alone. `enabled` removes switched-off tiles from every
/// narrowed cell. The pass stops at the first contradiction; the grid is then
/// partially updated and must be reset by the caller.
pub fn propagate(
    grid: &mut Grid,
    entropy: &mut EntropyIndex,
    model: &AdjacencyModel,
    enabled: &TileBitset,
    origin: Position,
) -> Propagation {
    let cell_count = grid.cell_count();
    let mut resolved = vec![false; cell_count];
    let mut in_queue = vec![false; cell_count];
    let mut queue = VecDeque::from([origin]);
    if let Some(flag) = in_queue.get_mut(grid.linear_index(origin)) {
        *flag = true;
    }

    let mut visited = 0;
    let mut narrowed = 0;

    while let Some(frontier) = queue.pop_front() {
        let Some(frontier_mask) = grid.possibilities(frontier).cloned() else {
            continue;
        };
        visited += 1;

        for direction in Direction::ALL {
            let Some(near) = grid.neighbor(frontier, direction) else {
                continue;
            };
            let near_index = grid.linear_index(near);
            if grid.entropy(near) == 1 || resolved.get(near_index).copied().unwrap_or(true) {
                continue;
            }

            let mut allowed = allowed_neighbors(&frontier_mask, direction, model);
            allowed.intersect_with(enabled);

            let Some(near_mask) = grid.possibilities_mut(near) else {
                continue;
            };
            let old_count = near_mask.count();
            near_mask.intersect_with(&allowed);
            let new_count = near_mask.count();

            if new_count == 0 {
                return Propagation::Contradiction {
                    position: near,
                    frontier,
                };
            }

            if new_count != old_count {
                entropy.update(near, new_count);
                narrowed += 1;
            }

            if let Some(queued) = in_queue.get_mut(near_index)
                && !*queued
            {
                *queued = true;
                queue.push_back(near);
            }
        }

        if let Some(done) = resolved.get_mut(grid.linear_index(frontier)) {
            *done = true;
        }
    }

    Propagation::Settled { visited, narrowed }
}
