//! Coordinate translation module
//!
//! Provides translations from tile-local pixel coordinates to global
//! source-image pixel coordinates. A tile at grid position (column, row)
//! covers the source-image region starting at
//! `(column * tile_width, row * tile_height)`, so a point detected inside
//! a tile maps back to the source by adding that tile's origin offset.

mod types;

pub use types::{CoordError, GlobalBox, GlobalPoint, LocalBox};

/// Translates a tile-local point to global source-image coordinates.
///
/// # Arguments
///
/// * `tile_width` - Tile width in pixels (must be positive)
/// * `tile_height` - Tile height in pixels (must be positive)
/// * `column` - Tile column index in the grid (0 at the left edge)
/// * `row` - Tile row index in the grid (0 at the top edge)
/// * `local_x` - X offset within the tile (cannot be negative)
/// * `local_y` - Y offset within the tile (cannot be negative)
///
/// # Returns
///
/// A `Result` containing the global point or an error naming the first
/// invalid input. Inputs are checked in argument order, one at a time.
///
/// # Example
///
/// ```
/// use tilescore::coord::translate_to_global;
///
/// // A point 100px into the tile at grid position (column 1, row 0)
/// let point = translate_to_global(500.0, 500.0, 1, 0, 100.0, 100.0).unwrap();
/// assert_eq!(point.x, 600.0);
/// assert_eq!(point.y, 100.0);
/// ```
#[inline]
pub fn translate_to_global(
    tile_width: f64,
    tile_height: f64,
    column: i64,
    row: i64,
    local_x: f64,
    local_y: f64,
) -> Result<GlobalPoint, CoordError> {
    // Validate inputs, reporting the first failure in argument order
    if tile_width <= 0.0 {
        return Err(CoordError::InvalidTileWidth(tile_width));
    }
    if tile_height <= 0.0 {
        return Err(CoordError::InvalidTileHeight(tile_height));
    }
    if column < 0 {
        return Err(CoordError::InvalidColumn(column));
    }
    if row < 0 {
        return Err(CoordError::InvalidRow(row));
    }
    if local_x < 0.0 {
        return Err(CoordError::InvalidLocalX(local_x));
    }
    if local_y < 0.0 {
        return Err(CoordError::InvalidLocalY(local_y));
    }

    // The tile's origin in the source image is its grid position scaled
    // by the tile dimensions
    let x = column as f64 * tile_width + local_x;
    let y = row as f64 * tile_height + local_y;

    Ok(GlobalPoint { x, y })
}

/// Translates a tile-local bounding box to global source-image coordinates.
///
/// The box's top-left corner is translated with [`translate_to_global`];
/// the bottom-right corner is placed by carrying the box's width and height
/// over unchanged, so the translated box always has the same extent as the
/// original.
///
/// # Returns
///
/// A `Result` containing the global box or the error from translating the
/// box's top-left corner.
#[inline]
pub fn translate_box_to_global(
    tile_width: f64,
    tile_height: f64,
    column: i64,
    row: i64,
    local_box: &LocalBox,
) -> Result<GlobalBox, CoordError> {
    let origin = translate_to_global(
        tile_width,
        tile_height,
        column,
        row,
        local_box.x1,
        local_box.y1,
    )?;

    Ok(GlobalBox {
        x1: origin.x,
        y1: origin.y,
        x2: origin.x + local_box.width(),
        y2: origin.y + local_box.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_tile_keeps_local_offsets() {
        // Tile (0, 0) starts at the source origin, so local offsets pass
        // through unchanged
        let result = translate_to_global(500.0, 500.0, 0, 0, 100.0, 100.0);
        assert!(result.is_ok(), "Valid inputs should not error");

        let point = result.unwrap();
        assert_eq!(point.x, 100.0);
        assert_eq!(point.y, 100.0);
    }

    #[test]
    fn test_column_shifts_x_by_tile_width() {
        let point = translate_to_global(500.0, 500.0, 1, 0, 100.0, 100.0).unwrap();
        assert_eq!(point.x, 600.0);
        assert_eq!(point.y, 100.0);
    }

    #[test]
    fn test_row_shifts_y_by_tile_height() {
        let point = translate_to_global(500.0, 500.0, 0, 1, 100.0, 100.0).unwrap();
        assert_eq!(point.x, 100.0);
        assert_eq!(point.y, 600.0);
    }

    #[test]
    fn test_column_and_row_shift_together() {
        let point = translate_to_global(500.0, 500.0, 3, 1, 100.0, 100.0).unwrap();
        assert_eq!(point.x, 1600.0);
        assert_eq!(point.y, 600.0);
    }

    #[test]
    fn test_rectangular_tiles_scale_axes_independently() {
        // Width and height contribute to their own axis only
        let point = translate_to_global(640.0, 480.0, 2, 3, 10.0, 20.0).unwrap();
        assert_eq!(point.x, 1290.0);
        assert_eq!(point.y, 1460.0);
    }

    #[test]
    fn test_zero_tile_width() {
        let result = translate_to_global(0.0, 500.0, 0, 0, 100.0, 100.0);
        assert!(matches!(
            result.unwrap_err(),
            CoordError::InvalidTileWidth(_)
        ));
    }

    #[test]
    fn test_negative_tile_width() {
        let result = translate_to_global(-500.0, 500.0, 0, 0, 100.0, 100.0);
        assert!(matches!(
            result.unwrap_err(),
            CoordError::InvalidTileWidth(_)
        ));
    }

    #[test]
    fn test_negative_tile_height() {
        let result = translate_to_global(500.0, -500.0, 0, 0, 100.0, 100.0);
        assert!(matches!(
            result.unwrap_err(),
            CoordError::InvalidTileHeight(_)
        ));
    }

    #[test]
    fn test_negative_column() {
        let result = translate_to_global(500.0, 500.0, -1, 0, 100.0, 100.0);
        assert!(matches!(result.unwrap_err(), CoordError::InvalidColumn(-1)));
    }

    #[test]
    fn test_negative_row() {
        let result = translate_to_global(500.0, 500.0, 0, -1, 100.0, 100.0);
        assert!(matches!(result.unwrap_err(), CoordError::InvalidRow(-1)));
    }

    #[test]
    fn test_negative_local_x() {
        let result = translate_to_global(500.0, 500.0, 0, 0, -100.0, 100.0);
        assert!(matches!(result.unwrap_err(), CoordError::InvalidLocalX(_)));
    }

    #[test]
    fn test_negative_local_y() {
        let result = translate_to_global(500.0, 500.0, 0, 0, 100.0, -100.0);
        assert!(matches!(result.unwrap_err(), CoordError::InvalidLocalY(_)));
    }

    #[test]
    fn test_width_checked_before_other_invalid_inputs() {
        // With multiple invalid inputs, the first in argument order wins
        let result = translate_to_global(0.0, -1.0, -2, -3, -4.0, -5.0);
        assert!(matches!(
            result.unwrap_err(),
            CoordError::InvalidTileWidth(_)
        ));
    }

    #[test]
    fn test_zero_local_offsets_give_tile_origin() {
        let point = translate_to_global(256.0, 256.0, 2, 3, 0.0, 0.0).unwrap();
        assert_eq!(point.x, 512.0);
        assert_eq!(point.y, 768.0);
    }

    #[test]
    fn test_box_translation_preserves_extent() {
        let local = LocalBox::new(10.0, 20.0, 50.0, 60.0);
        let global = translate_box_to_global(500.0, 400.0, 2, 1, &local).unwrap();

        assert_eq!(global.x1, 1010.0);
        assert_eq!(global.y1, 420.0);
        assert_eq!(global.x2, 1050.0);
        assert_eq!(global.y2, 460.0);
        assert_eq!(global.width(), local.width());
        assert_eq!(global.height(), local.height());
    }

    #[test]
    fn test_box_translation_rejects_bad_grid_position() {
        let local = LocalBox::new(10.0, 20.0, 50.0, 60.0);
        let result = translate_box_to_global(500.0, 400.0, -1, 0, &local);
        assert!(matches!(result.unwrap_err(), CoordError::InvalidColumn(-1)));
    }

    #[test]
    fn test_global_box_display() {
        let global = GlobalBox {
            x1: 1010.0,
            y1: 420.0,
            x2: 1050.0,
            y2: 460.0,
        };
        assert_eq!(format!("{}", global), "(1010, 420, 1050, 460)");
    }

    #[test]
    fn test_coord_error_display() {
        let err = CoordError::InvalidColumn(-3);
        assert_eq!(
            format!("{}", err),
            "Invalid tile column: -3 (cannot be negative)"
        );
    }
}
