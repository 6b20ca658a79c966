//! Detection aggregation.
//!
//! Remaps tile-local detections into source-image coordinates using each
//! detection's carried tile identity. Rotation is deliberately ignored
//! here; it stays metadata on the identity.

use crate::coord::{self, CoordError, GlobalBox};
use crate::pool::LocalDetection;
use tracing::debug;

/// Remaps every detection into source-image pixel coordinates.
///
/// Input order is preserved. An empty input yields an empty `Ok` result.
/// A detection whose coordinates fall outside the valid range surfaces
/// the translation error for that detection; nothing is clamped.
pub fn remap_all(
    tile_width: f64,
    tile_height: f64,
    detections: &[LocalDetection],
) -> Result<Vec<GlobalBox>, CoordError> {
    let mut boxes = Vec::with_capacity(detections.len());

    for detection in detections {
        let global = coord::translate_box_to_global(
            tile_width,
            tile_height,
            detection.tile.column as i64,
            detection.tile.row as i64,
            &detection.local_box,
        )?;

        debug!(tile = %detection.tile, bounds = %global, "Remapped detection");
        boxes.push(global);
    }

    Ok(boxes)
}
