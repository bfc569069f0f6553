use bitvec::prelude::*;
use std::fmt;

/// Fixed-width bitset standing in for a set of tile variants
///
/// Bit `i` is the variant whose bit-identity is `i`. The width is fixed at
/// construction (the compiled tileset's variant count) so every mask taking
/// part in one propagation has the same length and set operations stay
/// plain word-wise `&` / `|`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TileBitset {
    bits: BitVec,
}

impl TileBitset {
    /// Create a bitset with no variants present
    pub fn new(width: usize) -> Self {
        Self {
            bits: bitvec![0; width],
        }
    }

    /// Create a bitset containing every variant
    pub fn all(width: usize) -> Self {
        Self {
            bits: bitvec![1; width],
        }
    }

    /// Create a bitset holding exactly one variant
    pub fn single(width: usize, bit: usize) -> Self {
        let mut bitset = Self::new(width);
        bitset.insert(bit);
        bitset
    }

    /// Number of addressable variants
    pub fn width(&self) -> usize {
        self.bits.len()
    }

    /// Insert a variant; out-of-range bits are ignored
    pub fn insert(&mut self, bit: usize) {
        if bit < self.bits.len() {
            self.bits.set(bit, true);
        }
    }

    /// Remove a variant
    pub fn remove(&mut self, bit: usize) {
        if bit < self.bits.len() {
            self.bits.set(bit, false);
        }
    }

    /// Test variant membership
    pub fn contains(&self, bit: usize) -> bool {
        self.bits.get(bit).as_deref() == Some(&true)
    }

    /// Intersect this bitset with another in-place
    pub fn intersect_with(&mut self, other: &Self) {
        self.bits &= &other.bits;
    }

    /// Union this bitset with another in-place
    pub fn union_with(&mut self, other: &Self) {
        self.bits |= &other.bits;
    }

    /// Create a new bitset containing the intersection
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.intersect_with(other);
        result
    }

    /// Create a new bitset containing the union
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.union_with(other);
        result
    }

    /// Test if no variants are present
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Count variants in the set (the entropy of a cell)
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// The only set bit, if exactly one is set
    pub fn sole(&self) -> Option<usize> {
        let mut ones = self.bits.iter_ones();
        match (ones.next(), ones.next()) {
            (Some(bit), None) => Some(bit),
            _ => None,
        }
    }

    /// Iterate the set bit-identities in ascending order
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Extract all set bit-identities as a vector
    pub fn to_vec(&self) -> Vec<usize> {
        self.bits.iter_ones().collect()
    }
}

impl fmt::Display for TileBitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TileBitset({} variants: {:?})", self.count(), self.to_vec())
    }
}
