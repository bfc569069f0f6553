//! Error types and context management for tileset loading and generation

use std::fmt;
use std::path::PathBuf;

use crate::spatial::grid::Position;

/// Main error type for all tileset and collapse operations
#[derive(Debug)]
pub enum WfcError {
    /// Tileset description could not be opened or read
    TilesetOpen {
        /// Path to the description file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A required section of the description is absent
    MissingSection {
        /// Path to the description file
        path: PathBuf,
        /// Name of the missing section
        section: &'static str,
    },

    /// First line is neither `rotate` nor `no rotation`
    InvalidRotationMode {
        /// Path to the description file
        path: PathBuf,
        /// Text found instead
        found: String,
    },

    /// A line does not follow the `{a,b}` / `name - ...` syntax
    MalformedLine {
        /// Path to the description file
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// Explanation of what is wrong
        reason: String,
    },

    /// Base tile symmetry outside {1, 2, 4}
    InvalidSymmetry {
        /// Path to the description file
        path: PathBuf,
        /// Index of the offending base tile
        base: usize,
        /// Declared symmetry
        symmetry: usize,
    },

    /// Base tile weight is not a positive integer
    InvalidWeight {
        /// Path to the description file
        path: PathBuf,
        /// Index of the offending base tile
        base: usize,
        /// Declared weight
        weight: u64,
    },

    /// A `{tile,orientation}` pair names a variant that was never declared
    UnknownVariant {
        /// Path to the description file
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// Referenced base tile
        base: usize,
        /// Referenced orientation
        orientation: usize,
    },

    /// An edge rule refers to a connection group that was never defined
    UnknownConnection {
        /// Path to the description file
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// Name of the undefined group
        name: String,
    },

    /// Requested tileset directory does not exist in the catalog
    UnknownTileset {
        /// Requested tileset name
        name: String,
        /// Directory that was searched
        base_dir: PathBuf,
    },

    /// Every still-possible variant of a cell has zero weight
    ZeroTotalWeight {
        /// Cell being collapsed
        position: Position,
        /// Number of variants that were still possible
        candidates: usize,
    },

    /// The grid kept contradicting itself past the allowed number of resets
    ResetLimitExceeded {
        /// Resets performed before giving up
        resets: usize,
    },

    /// Base tile index exceeds the tileset
    InvalidTileIndex {
        /// The invalid base tile index
        index: usize,
        /// Number of base tiles available
        max_tiles: usize,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Failed to load the tileset sprite strip
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a rendered image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for WfcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TilesetOpen { path, source } => {
                write!(f, "Could not open tileset '{}': {source}", path.display())
            }
            Self::MissingSection { path, section } => {
                write!(
                    f,
                    "Tileset '{}' is missing its {section} section",
                    path.display()
                )
            }
            Self::InvalidRotationMode { path, found } => {
                write!(
                    f,
                    "Rotation type in '{}' must be 'rotate' or 'no rotation', found '{found}'",
                    path.display()
                )
            }
            Self::MalformedLine { path, line, reason } => {
                write!(f, "{}:{line}: {reason}", path.display())
            }
            Self::InvalidSymmetry {
                path,
                base,
                symmetry,
            } => {
                write!(
                    f,
                    "Tile {base} in '{}' has symmetry {symmetry} (expected 1, 2 or 4)",
                    path.display()
                )
            }
            Self::InvalidWeight { path, base, weight } => {
                write!(
                    f,
                    "Tile {base} in '{}' has weight {weight} (expected a positive integer)",
                    path.display()
                )
            }
            Self::UnknownVariant {
                path,
                line,
                base,
                orientation,
            } => {
                write!(
                    f,
                    "{}:{line}: variant {{{base},{orientation}}} is not declared",
                    path.display()
                )
            }
            Self::UnknownConnection { path, line, name } => {
                write!(
                    f,
                    "{}:{line}: connection '{name}' is not defined",
                    path.display()
                )
            }
            Self::UnknownTileset { name, base_dir } => {
                write!(
                    f,
                    "Tileset '{name}' not found in '{}'",
                    base_dir.display()
                )
            }
            Self::ZeroTotalWeight {
                position,
                candidates,
            } => {
                write!(
                    f,
                    "Cell ({}, {}) has {candidates} possible variants but all weigh zero",
                    position.x, position.y
                )
            }
            Self::ResetLimitExceeded { resets } => {
                write!(
                    f,
                    "Grid was reset {resets} times after contradictions without completing"
                )
            }
            Self::InvalidTileIndex { index, max_tiles } => {
                write!(f, "Tile index {index} is out of bounds (tiles: {max_tiles})")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for WfcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::TilesetOpen { source, .. } | Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl WfcError {
    /// Whether this error comes from a malformed tileset description
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::TilesetOpen { .. }
                | Self::MissingSection { .. }
                | Self::InvalidRotationMode { .. }
                | Self::MalformedLine { .. }
                | Self::InvalidSymmetry { .. }
                | Self::InvalidWeight { .. }
                | Self::UnknownVariant { .. }
                | Self::UnknownConnection { .. }
        )
    }
}

/// Convenience type alias for results in this crate
pub type Result<T> = std::result::Result<T, WfcError>;

/// Additional context to enrich error messages
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Tileset description being processed
    pub path: Option<PathBuf>,
    /// Operation being performed
    pub operation: Option<&'static str>,
}

/// Enriches errors with the tileset or operation they occurred in
pub trait WithContext<T> {
    /// Add error context to a Result
    ///
    /// # Errors
    ///
    /// Propagates the original error with additional context applied
    fn with_context(self, context: ErrorContext) -> Result<T>;

    /// Add just the operation context
    ///
    /// # Errors
    ///
    /// Propagates the original error with the operation context applied
    fn with_operation(self, operation: &'static str) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<WfcError>,
{
    fn with_context(self, context: ErrorContext) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            // Only filesystem errors are created without knowing their path
            if let WfcError::FileSystem {
                path, operation, ..
            } = &mut error
            {
                if let Some(context_path) = &context.path {
                    path.clone_from(context_path);
                }
                if let Some(context_operation) = context.operation {
                    *operation = context_operation;
                }
            }
            error
        })
    }

    fn with_operation(self, operation: &'static str) -> Result<T> {
        self.with_context(ErrorContext {
            operation: Some(operation),
            ..Default::default()
        })
    }
}

impl From<std::io::Error> for WfcError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> WfcError {
    WfcError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
