//! Tile identity and cataloguing.
//!
//! A tile is one fixed-size crop of the source image, written to disk by the
//! tiler under a name that encodes its grid position and rotation. This
//! module owns that naming grammar (parsing and formatting) and can rebuild
//! the tile list from a directory of previously written tiles.

mod identity;

pub use identity::{RotationAngle, TileIdentity, TileNameError, TileSource};

use std::io;
use std::path::Path;

use tracing::{debug, warn};

/// Scans a directory for `.png` tiles and parses their identities.
///
/// Files whose names violate the tile naming grammar are logged and
/// skipped; a malformed name never aborts the catalogue. Results are
/// sorted by sequence index so callers see tiles in raster order
/// regardless of directory iteration order.
///
/// # Arguments
///
/// * `dir` - Directory containing tile images
///
/// # Returns
///
/// A `Result` with the catalogued tiles, or the I/O error from reading
/// the directory itself.
pub fn catalog_tiles(dir: &Path) -> io::Result<Vec<TileSource>> {
    let mut tiles = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.extension().and_then(|e| e.to_str()) != Some("png") {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        match TileIdentity::from_file_name(name) {
            Ok(identity) => tiles.push(TileSource {
                identity,
                path: path.clone(),
            }),
            Err(e) => {
                warn!(file = %name, error = %e, "Skipping file with unparsable tile name");
            }
        }
    }

    tiles.sort_by_key(|t| (t.identity.sequence, t.identity.rotation.degrees()));
    debug!(count = tiles.len(), dir = %dir.display(), "Catalogued tiles");

    Ok(tiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_catalogs_only_valid_png_tiles() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("tile_1_0_0_0.png"), b"png").unwrap();
        fs::write(dir.path().join("tile_2_0_1_0.png"), b"png").unwrap();
        fs::write(dir.path().join("tile_2_0_1_90.png"), b"png").unwrap();
        // Wrong grammar and wrong extension both get skipped
        fs::write(dir.path().join("notes.png"), b"png").unwrap();
        fs::write(dir.path().join("tile_3_0_2_0.jpg"), b"jpg").unwrap();

        let tiles = catalog_tiles(dir.path()).unwrap();

        assert_eq!(tiles.len(), 3);
        assert_eq!(tiles[0].identity.sequence, 1);
        assert_eq!(tiles[1].identity.sequence, 2);
        assert_eq!(tiles[1].identity.rotation, RotationAngle::Deg0);
        assert_eq!(tiles[2].identity.rotation, RotationAngle::Deg90);
    }

    #[test]
    fn test_empty_directory_yields_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let tiles = catalog_tiles(dir.path()).unwrap();
        assert!(tiles.is_empty());
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(catalog_tiles(&missing).is_err());
    }
}
