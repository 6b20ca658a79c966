//! Tile naming grammar.
//!
//! Tile file names follow `tile_<sequence>_<row>_<column>_<angle>` with an
//! arbitrary-length extension. Formatting and parsing both live here so the
//! grammar has exactly one home; any change to tile naming happens in this
//! file and nowhere else.

use std::fmt;
use std::path::PathBuf;

/// Rotation applied to a tile before it was written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationAngle {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl RotationAngle {
    /// Parses a rotation from whole degrees.
    ///
    /// Returns `None` for anything other than 0, 90, 180 or 270.
    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees {
            0 => Some(RotationAngle::Deg0),
            90 => Some(RotationAngle::Deg90),
            180 => Some(RotationAngle::Deg180),
            270 => Some(RotationAngle::Deg270),
            _ => None,
        }
    }

    /// Rotation in whole degrees.
    #[inline]
    pub fn degrees(&self) -> u32 {
        match self {
            RotationAngle::Deg0 => 0,
            RotationAngle::Deg90 => 90,
            RotationAngle::Deg180 => 180,
            RotationAngle::Deg270 => 270,
        }
    }
}

/// Identity of one tile within a single tiling run.
///
/// Uniquely identified by (row, column, rotation); the sequence index
/// records the raster-order position the tiler assigned when the tile
/// was cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileIdentity {
    /// Raster-order index assigned at creation, starting at 1
    pub sequence: u32,
    /// Grid row (0 at the top edge of the source image)
    pub row: u32,
    /// Grid column (0 at the left edge of the source image)
    pub column: u32,
    /// Rotation applied before the tile was written
    pub rotation: RotationAngle,
}

impl TileIdentity {
    /// Parses a tile identity from a file name.
    ///
    /// Strips everything from the first '.' (so multi-part extensions like
    /// `.tar.gz` are removed whole), then requires the stem to split into
    /// the literal prefix `tile` followed by four integer fields:
    /// sequence (>= 1), row, column and a rotation angle of 0/90/180/270.
    ///
    /// # Example
    ///
    /// ```
    /// use tilescore::tile::TileIdentity;
    ///
    /// let identity = TileIdentity::from_file_name("tile_7_1_2_90.png").unwrap();
    /// assert_eq!(identity.sequence, 7);
    /// assert_eq!(identity.row, 1);
    /// assert_eq!(identity.column, 2);
    /// assert_eq!(identity.rotation.degrees(), 90);
    /// ```
    pub fn from_file_name(name: &str) -> Result<Self, TileNameError> {
        let malformed = || TileNameError::Malformed(name.to_string());

        let stem = match name.find('.') {
            Some(dot) => &name[..dot],
            None => name,
        };

        let parts: Vec<&str> = stem.split('_').collect();
        if parts.len() != 5 || parts[0] != "tile" {
            return Err(malformed());
        }

        let sequence: u32 = parts[1].parse().map_err(|_| malformed())?;
        let row: u32 = parts[2].parse().map_err(|_| malformed())?;
        let column: u32 = parts[3].parse().map_err(|_| malformed())?;
        let degrees: u32 = parts[4].parse().map_err(|_| malformed())?;

        if sequence == 0 {
            return Err(malformed());
        }
        let rotation = RotationAngle::from_degrees(degrees).ok_or_else(malformed)?;

        Ok(TileIdentity {
            sequence,
            row,
            column,
            rotation,
        })
    }

    /// Canonical file name for this tile, with the `.png` extension the
    /// tiler writes.
    pub fn file_name(&self) -> String {
        format!("{}.png", self)
    }
}

impl fmt::Display for TileIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tile_{}_{}_{}_{}",
            self.sequence,
            self.row,
            self.column,
            self.rotation.degrees()
        )
    }
}

/// A tile file on disk together with its parsed identity.
#[derive(Debug, Clone)]
pub struct TileSource {
    pub identity: TileIdentity,
    pub path: PathBuf,
}

/// Errors that can occur parsing a tile file name.
#[derive(Debug, Clone, PartialEq)]
pub enum TileNameError {
    /// Name does not match `tile_<sequence>_<row>_<column>_<angle>`
    Malformed(String),
}

impl fmt::Display for TileNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileNameError::Malformed(name) => {
                write!(
                    f,
                    "Malformed tile name: '{}' (expected tile_<sequence>_<row>_<column>_<angle>)",
                    name
                )
            }
        }
    }
}

impl std::error::Error for TileNameError {}
