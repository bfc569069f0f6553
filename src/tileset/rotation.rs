//! Quarter-turn rotation of variant bit-identities and variant masks
//!
//! A single clockwise step maps orientation `i` of a base tile to
//! orientation `(i + 1) % symmetry`. Masks rotate bit by bit; masks that
//! name a connection group are additionally pre-registered so the hot path
//! of propagation is one hash lookup instead of a walk over set bits.

use std::collections::HashMap;

use crate::algorithm::bitset::TileBitset;
use crate::spatial::grid::Direction;

/// Rotation sense of a quarter-turn step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// Orientation index increases
    Clockwise,
    /// Orientation index decreases
    Counterclockwise,
}

impl Turn {
    /// The opposite rotation sense
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Clockwise => Self::Counterclockwise,
            Self::Counterclockwise => Self::Clockwise,
        }
    }
}

/// One-step rotation tables for single bits and registered masks
#[derive(Debug, Clone)]
pub struct RotationTable {
    width: usize,
    bit_clockwise: Vec<usize>,
    bit_counterclockwise: Vec<usize>,
    mask_clockwise: HashMap<TileBitset, TileBitset>,
    mask_counterclockwise: HashMap<TileBitset, TileBitset>,
}

impl RotationTable {
    /// Create identity tables for `width` bit-identities
    pub fn identity(width: usize) -> Self {
        Self {
            width,
            bit_clockwise: (0..width).collect(),
            bit_counterclockwise: (0..width).collect(),
            mask_clockwise: HashMap::new(),
            mask_counterclockwise: HashMap::new(),
        }
    }

    /// Number of bit-identities covered
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Register that one clockwise step takes bit `from` to bit `to`
    pub fn link_bits(&mut self, from: usize, to: usize) {
        if let Some(slot) = self.bit_clockwise.get_mut(from) {
            *slot = to;
        }
        if let Some(slot) = self.bit_counterclockwise.get_mut(to) {
            *slot = from;
        }
    }

    /// Register that one clockwise step takes mask `from` to mask `to`
    pub fn link_masks(&mut self, from: TileBitset, to: TileBitset) {
        self.mask_counterclockwise.insert(to.clone(), from.clone());
        self.mask_clockwise.insert(from, to);
    }

    /// Number of pre-registered mask rotations in each direction
    pub fn registered_masks(&self) -> usize {
        self.mask_clockwise.len()
    }

    /// Rotate a single bit-identity by one quarter turn
    pub fn step_bit(&self, bit: usize, turn: Turn) -> usize {
        let table = match turn {
            Turn::Clockwise => &self.bit_clockwise,
            Turn::Counterclockwise => &self.bit_counterclockwise,
        };
        table.get(bit).copied().unwrap_or(bit)
    }

    /// Rotate a mask by one quarter turn
    ///
    /// Registered masks resolve through the pre-expanded table; any other
    /// mask is rotated bit by bit, which is the defining behaviour the
    /// tables are built from.
    pub fn step_mask(&self, mask: &TileBitset, turn: Turn) -> TileBitset {
        if let Some(bit) = mask.sole() {
            return TileBitset::single(mask.width(), self.step_bit(bit, turn));
        }
        let table = match turn {
            Turn::Clockwise => &self.mask_clockwise,
            Turn::Counterclockwise => &self.mask_counterclockwise,
        };
        if let Some(rotated) = table.get(mask) {
            return rotated.clone();
        }
        let mut rotated = TileBitset::new(mask.width());
        for bit in mask.iter_ones() {
            rotated.insert(self.step_bit(bit, turn));
        }
        rotated
    }

    /// Rotate a single bit-identity by `steps` quarter turns
    ///
    /// Three steps one way are one step the other way; two steps always
    /// apply the counterclockwise table twice.
    pub fn rotate(&self, bit: usize, steps: usize, turn: Turn) -> usize {
        match steps % 4 {
            0 => bit,
            1 => self.step_bit(bit, turn),
            2 => self.step_bit(
                self.step_bit(bit, Turn::Counterclockwise),
                Turn::Counterclockwise,
            ),
            _ => self.step_bit(bit, turn.inverse()),
        }
    }

    /// Rotate a mask by `steps` quarter turns, with the same composition
    /// rules as [`RotationTable::rotate`]
    pub fn rotate_mask(&self, mask: &TileBitset, steps: usize, turn: Turn) -> TileBitset {
        match steps % 4 {
            0 => mask.clone(),
            1 => self.step_mask(mask, turn),
            2 => self.step_mask(
                &self.step_mask(mask, Turn::Counterclockwise),
                Turn::Counterclockwise,
            ),
            _ => self.step_mask(mask, turn.inverse()),
        }
    }

    /// Rotate a bit so that its edge facing `direction` becomes its right edge
    pub fn into_right_frame(&self, bit: usize, direction: Direction) -> usize {
        self.rotate(bit, direction.steps(), Turn::Counterclockwise)
    }

    /// Rotate a right-frame mask back so its right side faces `direction`
    pub fn out_of_right_frame(&self, mask: &TileBitset, direction: Direction) -> TileBitset {
        self.rotate_mask(mask, direction.steps(), Turn::Clockwise)
    }
}
