//! Spatial data structures
//!
//! This module contains the grid of cell possibility sets and the
//! cardinal directions used to walk between neighbouring cells.

/// Grid cells, positions and directions
pub mod grid;

pub use grid::{Direction, Grid, Position};
