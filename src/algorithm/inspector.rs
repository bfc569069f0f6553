//! Page-by-page walk over a tileset's adjacency rules
//!
//! Each page shows one variant at column 0 of row `INSPECTOR_SUBJECT_ROW`
//! and every variant allowed to its right, filled top to bottom from column
//! `INSPECTOR_FIRST_COLUMN` and wrapping to the next column at the grid
//! height. Placements that fall off the grid are dropped.

use crate::algorithm::executor::CellUpdate;
use crate::io::configuration::{INSPECTOR_FIRST_COLUMN, INSPECTOR_SUBJECT_ROW};
use crate::spatial::grid::Position;
use crate::tileset::model::{AdjacencyModel, TileVariant};

/// One inspector page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectorPage {
    /// Variant whose right-hand neighbours are shown
    pub subject: TileVariant,
    /// Every placement on the page, subject first
    pub cells: Vec<CellUpdate>,
}

/// Stored cursor over every variant of a tileset
#[derive(Debug, Clone, Default)]
pub struct TilesetInspector {
    cursor: usize,
}

impl TilesetInspector {
    /// Start at the first variant
    pub const fn new() -> Self {
        Self { cursor: 0 }
    }

    /// Go back to the first variant, e.g. after a tileset change
    pub const fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Bit-identity the next page will show
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Lay out the next variant and advance, or `None` once every variant was shown
    pub fn next_page(
        &mut self,
        model: &AdjacencyModel,
        width: usize,
        height: usize,
    ) -> Option<InspectorPage> {
        let subject = model.variant_of(self.cursor)?;
        let mut cells = Vec::new();
        let mut place = |position: Position, variant: TileVariant| {
            if position.x < width && position.y < height {
                cells.push(CellUpdate { position, variant });
            }
        };
        place(Position::new(0, INSPECTOR_SUBJECT_ROW), subject);

        if height > 0 {
            let mut row = 0;
            let mut column = INSPECTOR_FIRST_COLUMN;
            let neighbours = model
                .connects_to(self.cursor)
                .map(|mask| mask.to_vec())
                .unwrap_or_default();
            for bit in neighbours {
                if row == height {
                    row = 0;
                    column += 1;
                }
                if let Some(variant) = model.variant_of(bit) {
                    place(Position::new(column, row), variant);
                }
                row += 1;
            }
        }

        self.cursor += 1;
        Some(InspectorPage { subject, cells })
    }
}
