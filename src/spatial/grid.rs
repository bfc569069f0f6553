//! Grid cell storage for the collapse engine
//!
//! Every cell owns a possibility set (a [`TileBitset`] over variant
//! bit-identities) and, once that set holds a single bit, the resolved
//! [`TileVariant`]. Cells are addressed by `(x, y)` with `x` growing to the
//! right and `y` growing downward; storage is row-major (`[y, x]`).

use ndarray::Array2;

use crate::algorithm::bitset::TileBitset;
use crate::tileset::model::TileVariant;

/// Cell coordinates within the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Column, growing to the right
    pub x: usize,
    /// Row, growing downward
    pub y: usize,
}

impl Position {
    /// Create a position from column and row
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Cardinal neighbour directions in rotation-frame order
///
/// The discriminant doubles as the number of counterclockwise quarter turns
/// that bring an edge facing this way onto the canonical right edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// +x
    Right = 0,
    /// +y
    Down = 1,
    /// -x
    Left = 2,
    /// -y
    Up = 3,
}

impl Direction {
    /// All directions in frame order
    pub const ALL: [Self; 4] = [Self::Right, Self::Down, Self::Left, Self::Up];

    /// Quarter turns between this direction and the canonical right edge
    pub const fn steps(self) -> usize {
        self as usize
    }

    /// The direction facing the other way
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Up => Self::Down,
        }
    }
}

/// Possibility sets and resolved variants for every cell
#[derive(Debug, Clone)]
pub struct Grid {
    possibilities: Array2<TileBitset>,
    resolved: Array2<Option<TileVariant>>,
    width: usize,
    height: usize,
}

impl Grid {
    /// Create a grid with every cell at full entropy
    pub fn new(width: usize, height: usize, variant_count: usize) -> Self {
        Self {
            possibilities: Array2::from_elem((height, width), TileBitset::all(variant_count)),
            resolved: Array2::from_elem((height, width), None),
            width,
            height,
        }
    }

    /// Restore every cell to full entropy and forget all resolutions
    pub fn reset(&mut self, variant_count: usize) {
        self.possibilities.fill(TileBitset::all(variant_count));
        self.resolved.fill(None);
    }

    /// Number of columns
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells
    pub const fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Check whether a position lies inside the grid
    pub const fn contains(&self, position: Position) -> bool {
        position.x < self.width && position.y < self.height
    }

    /// Possibility set of a cell
    pub fn possibilities(&self, position: Position) -> Option<&TileBitset> {
        self.possibilities.get([position.y, position.x])
    }

    /// Mutable possibility set of a cell
    pub fn possibilities_mut(&mut self, position: Position) -> Option<&mut TileBitset> {
        self.possibilities.get_mut([position.y, position.x])
    }

    /// Entropy (possibility count) of a cell, zero outside the grid
    pub fn entropy(&self, position: Position) -> usize {
        self.possibilities(position).map_or(0, TileBitset::count)
    }

    /// Resolved variant of a cell, if it has been collapsed
    pub fn resolved(&self, position: Position) -> Option<TileVariant> {
        self.resolved.get([position.y, position.x]).copied().flatten()
    }

    /// Record the variant a cell collapsed to
    pub fn set_resolved(&mut self, position: Position, variant: TileVariant) {
        if let Some(cell) = self.resolved.get_mut([position.y, position.x]) {
            *cell = Some(variant);
        }
    }

    /// Number of cells with a recorded resolution
    pub fn resolved_count(&self) -> usize {
        self.resolved.iter().filter(|cell| cell.is_some()).count()
    }

    /// Neighbouring position in a direction, if it lies inside the grid
    pub fn neighbor(&self, position: Position, direction: Direction) -> Option<Position> {
        let candidate = match direction {
            Direction::Right => Position::new(position.x.checked_add(1)?, position.y),
            Direction::Down => Position::new(position.x, position.y.checked_add(1)?),
            Direction::Left => Position::new(position.x.checked_sub(1)?, position.y),
            Direction::Up => Position::new(position.x, position.y.checked_sub(1)?),
        };
        self.contains(candidate).then_some(candidate)
    }

    /// Iterate every position in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    /// Row-major linear index of a position
    pub const fn linear_index(&self, position: Position) -> usize {
        position.y * self.width + position.x
    }
}
