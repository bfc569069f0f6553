//! Compiled adjacency model of one tileset
//!
//! Built once by the compiler and then only read: the engine, the
//! inspector and any renderer share it behind an `Arc` and a tileset change
//! replaces it wholesale.

use std::ops::Range;

use crate::algorithm::bitset::TileBitset;
use crate::tileset::rotation::RotationTable;

/// One concrete rotated form of a base tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileVariant {
    /// Index of the base tile in declaration order
    pub base: usize,
    /// Quarter turns clockwise from the base sprite, below the base symmetry
    pub orientation: usize,
}

impl TileVariant {
    /// Create a variant from base tile and orientation
    pub const fn new(base: usize, orientation: usize) -> Self {
        Self { base, orientation }
    }
}

/// Where a variant's image comes from in the tileset sprite strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    /// Column of the sprite in the strip
    pub index: usize,
    /// Clockwise quarter turns to apply when drawing
    pub quarter_turns: usize,
}

/// Immutable constraint table for one compiled tileset
#[derive(Debug, Clone)]
pub struct AdjacencyModel {
    pub(crate) rotatable: bool,
    pub(crate) symmetry: Vec<usize>,
    pub(crate) weights: Vec<u32>,
    pub(crate) base_offset: Vec<usize>,
    pub(crate) variants: Vec<TileVariant>,
    pub(crate) rotation: RotationTable,
    pub(crate) connects_to: Vec<TileBitset>,
}

impl AdjacencyModel {
    /// Whether placements may use all four orientations of a sprite
    pub const fn is_rotatable(&self) -> bool {
        self.rotatable
    }

    /// Number of base tiles
    pub fn base_count(&self) -> usize {
        self.symmetry.len()
    }

    /// Number of distinct bit-identities, the full entropy of a cell
    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    /// Symmetry count of a base tile
    pub fn symmetry(&self, base: usize) -> Option<usize> {
        self.symmetry.get(base).copied()
    }

    /// Declared weight of a base tile
    pub fn weight(&self, base: usize) -> Option<u32> {
        self.weights.get(base).copied()
    }

    /// Declared weights of all base tiles
    pub fn weights(&self) -> &[u32] {
        &self.weights
    }

    /// First bit-identity belonging to a base tile
    pub fn base_offset(&self, base: usize) -> Option<usize> {
        self.base_offset.get(base).copied()
    }

    /// Bit-identities belonging to a base tile
    pub fn variant_bits(&self, base: usize) -> Range<usize> {
        match (self.base_offset(base), self.symmetry(base)) {
            (Some(offset), Some(symmetry)) => offset..offset + symmetry,
            _ => 0..0,
        }
    }

    /// Bit-identity of a variant
    pub fn bit_of(&self, variant: TileVariant) -> Option<usize> {
        let symmetry = self.symmetry(variant.base)?;
        if variant.orientation >= symmetry {
            return None;
        }
        Some(self.base_offset(variant.base)? + variant.orientation)
    }

    /// Variant owning a bit-identity
    pub fn variant_of(&self, bit: usize) -> Option<TileVariant> {
        self.variants.get(bit).copied()
    }

    /// Canonical right-neighbour mask of a bit-identity
    ///
    /// Variants without a right-edge rule connect to nothing.
    pub fn connects_to(&self, bit: usize) -> Option<&TileBitset> {
        self.connects_to.get(bit)
    }

    /// Rotation tables of this tileset
    pub const fn rotation(&self) -> &RotationTable {
        &self.rotation
    }

    /// Mask of every variant of the given base tiles
    pub fn mask_of_bases(&self, bases: impl IntoIterator<Item = usize>) -> TileBitset {
        let mut mask = TileBitset::new(self.variant_count());
        for base in bases {
            for bit in self.variant_bits(base) {
                mask.insert(bit);
            }
        }
        mask
    }

    /// Sprite strip lookup for drawing a variant
    ///
    /// Rotating tilesets draw the base sprite turned by the orientation;
    /// non-rotating tilesets keep one flat sprite per variant.
    pub fn sprite(&self, variant: TileVariant) -> Option<Sprite> {
        let bit = self.bit_of(variant)?;
        Some(if self.rotatable {
            Sprite {
                index: variant.base,
                quarter_turns: variant.orientation,
            }
        } else {
            Sprite {
                index: bit,
                quarter_turns: 0,
            }
        })
    }

    /// Number of sprites the tileset strip must hold
    pub fn sprite_count(&self) -> usize {
        if self.rotatable {
            self.base_count()
        } else {
            self.variant_count()
        }
    }
}
