//! Source image tiling.
//!
//! Breaks a source image into fixed-size tiles written to an intermediate
//! directory, where the scoring pool picks them up later. Tile dimensions
//! must evenly divide the source image. Tiles are cut in raster order
//! (row 0 left to right, then row 1, ...) with the sequence index starting
//! at 1, and each grid cell can optionally be written in four rotations.

use crate::tile::{RotationAngle, TileIdentity, TileSource};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Tiling errors.
#[derive(Debug, Error)]
pub enum TilerError {
    /// Source image could not be opened or decoded
    #[error("Failed to open source image: {0}")]
    OpenFailed(#[from] image::ImageError),

    /// Tile dimensions must be positive
    #[error("Invalid tile size {width}x{height} (both dimensions must be positive)")]
    InvalidTileSize { width: u32, height: u32 },

    /// Tile width must evenly divide the source width
    #[error("Specified tile width {tile} does not evenly divide source image width {source}")]
    UnevenTileWidth { tile: u32, r#source: u32 },

    /// Tile height must evenly divide the source height
    #[error("Specified tile height {tile} does not evenly divide source image height {source}")]
    UnevenTileHeight { tile: u32, r#source: u32 },

    /// A tile image could not be written
    #[error("Failed to write tile '{path}': {reason}")]
    WriteFailed { path: String, reason: String },

    /// Tile directory could not be created, read or cleaned
    #[error("Tile directory error: {0}")]
    DirectoryError(#[from] std::io::Error),
}

/// Cuts a source image into fixed-size tiles on disk.
pub struct ImageTiler {
    tile_dir: PathBuf,
    tile_width: u32,
    tile_height: u32,
}

impl ImageTiler {
    /// Creates a new tiler writing into `tile_dir`.
    pub fn new(tile_dir: impl Into<PathBuf>, tile_width: u32, tile_height: u32) -> Self {
        Self {
            tile_dir: tile_dir.into(),
            tile_width,
            tile_height,
        }
    }

    /// Breaks the source image into tiles and writes them to the tile
    /// directory.
    ///
    /// With `permutations` set, each grid cell is additionally written
    /// rotated by 90, 180 and 270 degrees, yielding four samples per cell.
    /// All four share the cell's sequence index and grid position.
    ///
    /// # Returns
    ///
    /// The written tiles in raster order, so callers never have to rescan
    /// the directory.
    pub fn create_tiles(
        &self,
        source: &Path,
        permutations: bool,
    ) -> Result<Vec<TileSource>, TilerError> {
        let img = image::open(source)?;
        let source_width = img.width();
        let source_height = img.height();

        info!(
            width = source_width,
            height = source_height,
            source = %source.display(),
            "Source image opened"
        );

        self.validate_tile_size(source_width, source_height)?;
        std::fs::create_dir_all(&self.tile_dir)?;

        let columns = source_width / self.tile_width;
        let rows = source_height / self.tile_height;

        let mut tiles = Vec::new();
        let mut sequence: u32 = 1;

        for row in 0..rows {
            for column in 0..columns {
                let x = column * self.tile_width;
                let y = row * self.tile_height;
                let cropped = img.crop_imm(x, y, self.tile_width, self.tile_height);

                tiles.push(self.write_tile(&cropped, sequence, row, column, RotationAngle::Deg0)?);

                if permutations {
                    tiles.push(self.write_tile(
                        &cropped.rotate90(),
                        sequence,
                        row,
                        column,
                        RotationAngle::Deg90,
                    )?);
                    tiles.push(self.write_tile(
                        &cropped.rotate180(),
                        sequence,
                        row,
                        column,
                        RotationAngle::Deg180,
                    )?);
                    tiles.push(self.write_tile(
                        &cropped.rotate270(),
                        sequence,
                        row,
                        column,
                        RotationAngle::Deg270,
                    )?);
                }

                sequence += 1;
            }
        }

        info!(tiles = tiles.len(), rows = rows, columns = columns, "Tiling complete");
        Ok(tiles)
    }

    /// Removes every `.png` tile from the tile directory.
    ///
    /// # Returns
    ///
    /// How many files were deleted.
    pub fn cleanup(&self) -> Result<usize, TilerError> {
        info!(dir = %self.tile_dir.display(), "Removing tiles");

        let mut removed = 0;
        for entry in std::fs::read_dir(&self.tile_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("png") {
                std::fs::remove_file(&path)?;
                removed += 1;
            }
        }

        info!(removed = removed, "Tile cleanup complete");
        Ok(removed)
    }

    fn validate_tile_size(&self, source_width: u32, source_height: u32) -> Result<(), TilerError> {
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(TilerError::InvalidTileSize {
                width: self.tile_width,
                height: self.tile_height,
            });
        }
        if source_height % self.tile_height != 0 {
            return Err(TilerError::UnevenTileHeight {
                tile: self.tile_height,
                source: source_height,
            });
        }
        if source_width % self.tile_width != 0 {
            return Err(TilerError::UnevenTileWidth {
                tile: self.tile_width,
                source: source_width,
            });
        }
        Ok(())
    }

    fn write_tile(
        &self,
        image: &DynamicImage,
        sequence: u32,
        row: u32,
        column: u32,
        rotation: RotationAngle,
    ) -> Result<TileSource, TilerError> {
        let identity = TileIdentity {
            sequence,
            row,
            column,
            rotation,
        };
        let path = self.tile_dir.join(identity.file_name());

        debug!(tile = %path.display(), "Writing tile");
        image.save(&path).map_err(|e| TilerError::WriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(TileSource { identity, path })
    }
}
