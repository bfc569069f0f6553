//! Wavefunction collapse for tile grids
//!
//! A tileset description is compiled into an adjacency model of rotated tile
//! variants. The collapse engine then fills a grid one cell at a time: it
//! picks a lowest-entropy cell, collapses it to a weighted random variant and
//! propagates the edge constraints breadth-first, resetting the whole grid
//! whenever a cell runs out of possibilities.

#![forbid(unsafe_code)]

/// Collapse engine: entropy worklist, selection, propagation and pacing
pub mod algorithm;
/// Tileset discovery, sessions, image export, logging and the CLI
pub mod io;
/// Grid cell storage and neighbourhood navigation
pub mod spatial;
/// Tileset compilation, rotation tables and runtime weights
pub mod tileset;

pub use io::error::{Result, WfcError};
