//! Coordinate type definitions

use std::fmt;

/// A point in source-image pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalPoint {
    /// Horizontal pixel offset from the source image's left edge
    pub x: f64,
    /// Vertical pixel offset from the source image's top edge
    pub y: f64,
}

/// An axis-aligned bounding box in tile-local pixel space.
///
/// Corners satisfy `x1 <= x2` and `y1 <= y2`; (x1, y1) is the top-left
/// corner relative to the tile's own origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl LocalBox {
    /// Creates a box from its two corners.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Horizontal extent of the box.
    #[inline]
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Vertical extent of the box.
    #[inline]
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}

/// An axis-aligned bounding box in source-image pixel space.
///
/// Derived from a [`LocalBox`] by translation; the extent is carried over
/// unchanged, only the corners move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl GlobalBox {
    /// Horizontal extent of the box.
    #[inline]
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Vertical extent of the box.
    #[inline]
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}

impl fmt::Display for GlobalBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x1, self.y1, self.x2, self.y2)
    }
}

/// Errors that can occur during coordinate translation.
///
/// Each variant names the single offending parameter and carries the
/// rejected value, so callers can tell exactly which input was invalid.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Tile width is zero or negative
    InvalidTileWidth(f64),
    /// Tile height is zero or negative
    InvalidTileHeight(f64),
    /// Tile column index is negative
    InvalidColumn(i64),
    /// Tile row index is negative
    InvalidRow(i64),
    /// Tile-local x coordinate is negative
    InvalidLocalX(f64),
    /// Tile-local y coordinate is negative
    InvalidLocalY(f64),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidTileWidth(width) => {
                write!(f, "Invalid tile width: {} (must be positive)", width)
            }
            CoordError::InvalidTileHeight(height) => {
                write!(f, "Invalid tile height: {} (must be positive)", height)
            }
            CoordError::InvalidColumn(col) => {
                write!(f, "Invalid tile column: {} (cannot be negative)", col)
            }
            CoordError::InvalidRow(row) => {
                write!(f, "Invalid tile row: {} (cannot be negative)", row)
            }
            CoordError::InvalidLocalX(x) => {
                write!(f, "Invalid local x: {} (cannot be negative)", x)
            }
            CoordError::InvalidLocalY(y) => {
                write!(f, "Invalid local y: {} (cannot be negative)", y)
            }
        }
    }
}

impl std::error::Error for CoordError {}
