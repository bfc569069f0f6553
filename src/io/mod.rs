/// Tileset directory discovery
pub mod catalog;
/// Command-line interface and generation runner
pub mod cli;
/// Crate-wide constants and defaults
pub mod configuration;
/// Error types and context management
pub mod error;
/// Sprite strips and PNG export
pub mod image;
/// Tracing subscriber setup
pub mod logging;
/// Terminal progress bars
pub mod progress;
/// Control surface over a running generation
pub mod session;
/// Animated GIF replay of collapses
pub mod visualization;
