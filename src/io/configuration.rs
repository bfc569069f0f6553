//! Algorithm constants and runtime configuration defaults

// Grid dimensions used when none are given
/// Default number of grid columns
pub const DEFAULT_GRID_WIDTH: usize = 24;
/// Default number of grid rows
pub const DEFAULT_GRID_HEIGHT: usize = 12;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed grid dimension
pub const MAX_GRID_DIMENSION: usize = 10_000;

/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

/// Default number of completed grids produced per run
pub const DEFAULT_RUNS: usize = 1;

/// Default number of contradiction resets tolerated per completed grid
pub const DEFAULT_MAX_RESETS: usize = 1000;

// Simulation pacing
/// Collapses per second while running
pub const DEFAULT_SPEED: u32 = 30;
/// Upper bound accepted for the collapse speed
pub const MAX_SPEED: u32 = 1000;
/// Seconds a completed grid is held before it resets
pub const COMPLETION_HOLD_SECS: f32 = 5.0;

// Weight controls
/// Smallest weight a tile may be given at runtime
pub const MIN_TILE_WEIGHT: u32 = 1;
/// Largest weight a tile may be given at runtime
pub const MAX_TILE_WEIGHT: u32 = 200;

// Tileset layout on disk
/// Directory holding one sub-directory per tileset
pub const DEFAULT_TILESET_DIR: &str = "tilesets";
/// Description file inside a tileset directory
pub const TILESET_DATA_FILE: &str = "data.txt";
/// Sprite strip inside a tileset directory
pub const TILESET_IMAGE_FILE: &str = "tileset.png";
/// Edge length of one sprite in the strip, in pixels
pub const TILE_SIZE: u32 = 32;

// Inspector layout
/// Row the inspected variant is drawn in
pub const INSPECTOR_SUBJECT_ROW: usize = 3;
/// First column used for the inspected variant's neighbours
pub const INSPECTOR_FIRST_COLUMN: usize = 2;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_result";
/// Minimum frame delay that viewers reliably support (in milliseconds)
pub const VIEWER_MIN_FRAME_DELAY_MS: u32 = 20;
