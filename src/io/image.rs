//! Sprite strip loading and PNG export of a collapsed grid

use std::path::Path;

use image::{GenericImage, Rgba, RgbaImage, imageops};

use crate::algorithm::executor::CellUpdate;
use crate::io::error::{Result, WfcError, invalid_parameter};
use crate::spatial::grid::{Grid, Position};
use crate::tileset::model::{AdjacencyModel, Sprite};

const PLACEHOLDER_PALETTE: [[u8; 3]; 8] = [
    [230, 159, 0],
    [86, 180, 233],
    [0, 158, 115],
    [240, 228, 66],
    [0, 114, 178],
    [213, 94, 0],
    [204, 121, 167],
    [120, 120, 120],
];

/// Square tile sprites cut from a horizontal strip
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    sprites: Vec<RgbaImage>,
    tile_size: u32,
}

impl SpriteSheet {
    /// Load a strip holding at least `sprite_count` square sprites
    ///
    /// The tile size is the strip's height.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be decoded or holds too few sprites
    pub fn load(path: &Path, sprite_count: usize) -> Result<Self> {
        let strip = image::open(path)
            .map_err(|source| WfcError::ImageLoad {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        Self::from_strip(&strip, sprite_count)
    }

    /// Cut `sprite_count` square sprites from the left of a strip
    ///
    /// # Errors
    ///
    /// Returns an error if the strip is empty or too narrow
    pub fn from_strip(strip: &RgbaImage, sprite_count: usize) -> Result<Self> {
        let tile_size = strip.height();
        let available = if tile_size == 0 {
            0
        } else {
            (strip.width() / tile_size) as usize
        };
        if available < sprite_count || tile_size == 0 {
            return Err(invalid_parameter(
                "sprite strip",
                &format!("{}x{}", strip.width(), strip.height()),
                &format!("needs {sprite_count} square sprites, holds {available}"),
            ));
        }

        let sprites = (0..sprite_count)
            .map(|index| {
                imageops::crop_imm(strip, index as u32 * tile_size, 0, tile_size, tile_size)
                    .to_image()
            })
            .collect();
        Ok(Self { sprites, tile_size })
    }

    /// Flat-coloured stand-ins for tilesets shipped without a strip
    ///
    /// The top edge of each sprite is darkened so orientation stays visible.
    pub fn placeholder(sprite_count: usize, tile_size: u32) -> Self {
        let edge = (tile_size / 8).max(1);
        let sprites = (0..sprite_count)
            .map(|index| {
                let [r, g, b] = PLACEHOLDER_PALETTE
                    .get(index % PLACEHOLDER_PALETTE.len())
                    .copied()
                    .unwrap_or([128, 128, 128]);
                // Later cycles of the palette are lightened to stay distinct
                let lift = ((index / PLACEHOLDER_PALETTE.len()) * 24).min(96) as u8;
                let fill = Rgba([
                    r.saturating_add(lift),
                    g.saturating_add(lift),
                    b.saturating_add(lift),
                    255,
                ]);
                let mark = Rgba([r / 3, g / 3, b / 3, 255]);
                RgbaImage::from_fn(tile_size, tile_size, |_, y| if y < edge { mark } else { fill })
            })
            .collect();
        Self { sprites, tile_size }
    }

    /// Side length of every sprite in pixels
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Number of sprites
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// Whether the sheet holds no sprites
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Sprite image turned clockwise by its quarter turns
    pub fn render(&self, sprite: Sprite) -> Option<RgbaImage> {
        let base = self.sprites.get(sprite.index)?;
        Some(match sprite.quarter_turns % 4 {
            1 => imageops::rotate90(base),
            2 => imageops::rotate180(base),
            3 => imageops::rotate270(base),
            _ => base.clone(),
        })
    }
}

/// Blank canvas covering a grid of the given size
pub fn blank_canvas(sheet: &SpriteSheet, width: usize, height: usize) -> RgbaImage {
    RgbaImage::new(
        width as u32 * sheet.tile_size(),
        height as u32 * sheet.tile_size(),
    )
}

/// Draw one resolved cell onto a canvas
///
/// # Errors
///
/// Returns [`WfcError::InvalidTileIndex`] if the sheet has no sprite for the
/// variant, or an error if the cell lies outside the canvas
pub fn draw_cell(
    canvas: &mut RgbaImage,
    sheet: &SpriteSheet,
    model: &AdjacencyModel,
    cell: CellUpdate,
) -> Result<()> {
    let sprite = model
        .sprite(cell.variant)
        .and_then(|sprite| sheet.render(sprite))
        .ok_or(WfcError::InvalidTileIndex {
            index: cell.variant.base,
            max_tiles: sheet.len(),
        })?;
    let Position { x, y } = cell.position;
    canvas
        .copy_from(
            &sprite,
            x as u32 * sheet.tile_size(),
            y as u32 * sheet.tile_size(),
        )
        .map_err(|source| WfcError::ImageExport {
            path: "<canvas>".into(),
            source,
        })
}

/// Compose every resolved cell of a grid; unresolved cells stay transparent
///
/// # Errors
///
/// Returns an error if a resolved variant has no sprite in the sheet
pub fn render_grid(grid: &Grid, model: &AdjacencyModel, sheet: &SpriteSheet) -> Result<RgbaImage> {
    let mut canvas = blank_canvas(sheet, grid.width(), grid.height());
    for position in grid.positions() {
        if let Some(variant) = grid.resolved(position) {
            draw_cell(&mut canvas, sheet, model, CellUpdate { position, variant })?;
        }
    }
    Ok(canvas)
}

/// Export a grid as a PNG image
///
/// # Errors
///
/// Returns an error if:
/// - A resolved variant has no sprite in the sheet
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_grid_as_png(
    grid: &Grid,
    model: &AdjacencyModel,
    sheet: &SpriteSheet,
    output_path: &Path,
) -> Result<()> {
    let canvas = render_grid(grid, model, sheet)?;

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| WfcError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    canvas
        .save(output_path)
        .map_err(|e| WfcError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;
    tracing::debug!(path = %output_path.display(), "grid exported");

    Ok(())
}
