//! Tileset compilation into bit-encoded adjacency rules
//!
//! This module contains:
//! - The description parser and compiler
//! - The immutable adjacency model it produces
//! - Quarter-turn rotation tables
//! - Runtime weights with deferred enable switches

/// Tileset description parsing and compilation
pub mod compiler;
/// Compiled adjacency model and variant identities
pub mod model;
/// Quarter-turn rotation of bit-identities and masks
pub mod rotation;
/// Runtime weights and staged tile switches
pub mod weights;

pub use compiler::{compile_file, compile_str};
pub use model::{AdjacencyModel, Sprite, TileVariant};
