/// Dynamically sized bitset over variant bit-identities
pub mod bitset;
/// Entropy-bucketed worklist of uncollapsed cells
pub mod entropy;
/// Collapse engine: tick, reset and the update log
pub mod executor;
/// Debug walk over a tileset's adjacency rules
pub mod inspector;
/// Breadth-first constraint propagation
pub mod propagation;
/// Wall-clock pacing of engine ticks
pub mod schedule;
/// Seeded cell and variant selection
pub mod selection;
