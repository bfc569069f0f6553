//! Entropy-ordered worklist of uncollapsed cells
//!
//! Cells are bucketed by possibility count; the smallest key is the next
//! place to collapse. A cell leaves the index when it is collapsed, so
//! cells narrowed to one variant by propagation wait in bucket `1` until
//! their turn comes. Each bucket is a dense vector so a uniform pick is one
//! index, and a side table remembers every cell's slot so it can leave its
//! bucket by `swap_remove` in constant time.

use std::collections::BTreeMap;

use crate::spatial::grid::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    entropy: usize,
    index: usize,
}

/// Buckets of uncollapsed cells keyed by entropy
#[derive(Debug, Clone)]
pub struct EntropyIndex {
    buckets: BTreeMap<usize, Vec<Position>>,
    slots: Vec<Option<Slot>>,
    width: usize,
    len: usize,
}

impl EntropyIndex {
    /// Create an empty index for a grid of the given size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            buckets: BTreeMap::new(),
            slots: vec![None; width * height],
            width,
            len: 0,
        }
    }

    /// Place every cell of the grid in a single bucket
    pub fn fill(&mut self, height: usize, entropy: usize) {
        self.clear();
        if entropy == 0 {
            return;
        }
        for y in 0..height {
            for x in 0..self.width {
                self.insert(Position::new(x, y), entropy);
            }
        }
    }

    /// Remove every cell
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.slots.fill(None);
        self.len = 0;
    }

    /// Number of cells tracked
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether every cell has been collapsed
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of non-empty buckets
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Cells currently at a given entropy
    pub fn bucket(&self, entropy: usize) -> &[Position] {
        self.buckets
            .get(&entropy)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Lowest entropy present and the cells holding it
    pub fn minimum(&self) -> Option<(usize, &[Position])> {
        self.buckets
            .first_key_value()
            .map(|(&entropy, cells)| (entropy, cells.as_slice()))
    }

    /// Entropy under which a cell is filed
    pub fn entropy_of(&self, position: Position) -> Option<usize> {
        self.slot(position).map(|slot| slot.entropy)
    }

    /// Whether a cell is tracked
    pub fn contains(&self, position: Position) -> bool {
        self.slot(position).is_some()
    }

    /// File a cell under an entropy, replacing any previous filing
    ///
    /// An entropy of zero leaves the cell out of the index.
    pub fn insert(&mut self, position: Position, entropy: usize) {
        self.remove(position);
        if entropy == 0 {
            return;
        }
        let Some(slot_ref) = self.slot_index(position) else {
            return;
        };
        let bucket = self.buckets.entry(entropy).or_default();
        bucket.push(position);
        let index = bucket.len() - 1;
        if let Some(slot) = self.slots.get_mut(slot_ref) {
            *slot = Some(Slot { entropy, index });
        }
        self.len += 1;
    }

    /// Move a cell to the bucket of its new entropy
    pub fn update(&mut self, position: Position, entropy: usize) {
        if self.entropy_of(position) != Some(entropy) {
            self.insert(position, entropy);
        }
    }

    /// Remove a cell, dropping its bucket if it empties
    pub fn remove(&mut self, position: Position) -> bool {
        let Some(slot_ref) = self.slot_index(position) else {
            return false;
        };
        let Some(Slot { entropy, index }) = self.slots.get_mut(slot_ref).and_then(Option::take)
        else {
            return false;
        };
        self.len -= 1;

        let Some(bucket) = self.buckets.get_mut(&entropy) else {
            return true;
        };
        if index < bucket.len() {
            bucket.swap_remove(index);
        }
        if let Some(&moved) = bucket.get(index)
            && let Some(moved_slot) = self
                .slot_index(moved)
                .and_then(|moved_ref| self.slots.get_mut(moved_ref))
        {
            *moved_slot = Some(Slot { entropy, index });
        }
        if self.buckets.get(&entropy).is_some_and(Vec::is_empty) {
            self.buckets.remove(&entropy);
        }
        true
    }

    /// Iterate `(entropy, cells)` in ascending entropy
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Position])> {
        self.buckets
            .iter()
            .map(|(&entropy, cells)| (entropy, cells.as_slice()))
    }

    fn slot_index(&self, position: Position) -> Option<usize> {
        let index = position.y * self.width + position.x;
        (position.x < self.width && index < self.slots.len()).then_some(index)
    }

    fn slot(&self, position: Position) -> Option<Slot> {
        self.slot_index(position)
            .and_then(|index| self.slots.get(index).copied().flatten())
    }
}
