//! Animated GIF replay of the update log

use std::path::Path;

use image::{Delay, Frame, RgbaImage};

use crate::algorithm::executor::CellUpdate;
use crate::io::configuration::VIEWER_MIN_FRAME_DELAY_MS;
use crate::io::error::{Result, WfcError};
use crate::io::image::{SpriteSheet, blank_canvas, draw_cell};
use crate::tileset::model::AdjacencyModel;

/// Final frame is shown this many frame delays longer
const FINAL_FRAME_HOLD: u32 = 25;

/// Frame delay matching a collapse speed in ticks per second
pub const fn frame_delay_ms(speed: u32) -> u32 {
    if speed == 0 {
        1000
    } else {
        let delay = 1000 / speed;
        if delay == 0 { 1 } else { delay }
    }
}

/// Replays collapses one cell at a time over a fixed-size grid
pub struct UpdateReplay<'a> {
    updates: &'a [CellUpdate],
    width: usize,
    height: usize,
}

impl<'a> UpdateReplay<'a> {
    /// Replay `updates` on a `width` by `height` grid
    pub const fn new(updates: &'a [CellUpdate], width: usize, height: usize) -> Self {
        Self {
            updates,
            width,
            height,
        }
    }

    /// Number of recorded collapses
    pub const fn len(&self) -> usize {
        self.updates.len()
    }

    /// Whether nothing was recorded
    pub const fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Render the frames of the replay
    ///
    /// Delays shorter than viewers support are stretched to
    /// `VIEWER_MIN_FRAME_DELAY_MS` and frames are skipped to keep the
    /// apparent speed. The last frame is held longer.
    ///
    /// # Errors
    ///
    /// Returns an error if a variant has no sprite or lies off the grid
    pub fn frames(
        &self,
        model: &AdjacencyModel,
        sheet: &SpriteSheet,
        frame_delay_ms: u32,
    ) -> Result<Vec<Frame>> {
        let frame_delay_ms = frame_delay_ms.max(1);
        let effective_delay_ms = frame_delay_ms.max(VIEWER_MIN_FRAME_DELAY_MS);
        let skip_factor = if frame_delay_ms < VIEWER_MIN_FRAME_DELAY_MS {
            VIEWER_MIN_FRAME_DELAY_MS.div_ceil(frame_delay_ms) as usize
        } else {
            1
        };

        let mut canvas = blank_canvas(sheet, self.width, self.height);
        let mut frames = vec![Self::frame(&canvas, effective_delay_ms)];

        for (applied, update) in self.updates.iter().enumerate() {
            draw_cell(&mut canvas, sheet, model, *update)?;
            if (applied + 1) % skip_factor == 0 {
                frames.push(Self::frame(&canvas, effective_delay_ms));
            }
        }
        if self.updates.len() % skip_factor != 0 {
            frames.push(Self::frame(&canvas, effective_delay_ms));
        }

        frames.push(Self::frame(
            &canvas,
            effective_delay_ms.saturating_mul(FINAL_FRAME_HOLD),
        ));
        Ok(frames)
    }

    /// Encode the replay as a GIF
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No collapses were recorded
    /// - A variant has no sprite in the sheet
    /// - File system operations fail
    /// - GIF encoding fails
    pub fn export_gif(
        &self,
        model: &AdjacencyModel,
        sheet: &SpriteSheet,
        frame_delay_ms: u32,
        output_path: &Path,
    ) -> Result<()> {
        if self.is_empty() {
            return Err(crate::io::error::invalid_parameter(
                "updates",
                &0,
                &"no collapses recorded to replay",
            ));
        }

        let frames = self.frames(model, sheet, frame_delay_ms)?;

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| WfcError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }

        let file = std::fs::File::create(output_path).map_err(|e| WfcError::FileSystem {
            path: output_path.to_path_buf(),
            operation: "create file",
            source: e,
        })?;

        let mut encoder = image::codecs::gif::GifEncoder::new(file);
        encoder
            .encode_frames(frames)
            .map_err(|e| WfcError::ImageExport {
                path: output_path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    fn frame(canvas: &RgbaImage, delay_ms: u32) -> Frame {
        Frame::from_parts(
            canvas.clone(),
            0,
            0,
            Delay::from_numer_denom_ms(delay_ms, 1),
        )
    }
}
