//! Detection overlay rendering.
//!
//! Draws remapped detection boxes onto the source image and saves the
//! annotated copy. The source file itself is never modified.

use crate::coord::GlobalBox;
use image::Rgba;
use imageproc::{drawing::draw_hollow_rect_mut, rect::Rect};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Outline color for detection boxes.
const BOX_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Outline thickness in pixels, drawn as nested rectangles.
const BOX_THICKNESS: i32 = 3;

/// Overlay rendering errors.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// Source image could not be opened or decoded
    #[error("Failed to open source image: {0}")]
    OpenFailed(#[from] image::ImageError),

    /// Annotated image could not be written
    #[error("Failed to save output image '{path}': {reason}")]
    SaveFailed { path: String, reason: String },
}

/// Draws every box onto a copy of the source image and saves it.
///
/// Boxes with a degenerate extent (under one pixel) are skipped with a
/// debug log. Boxes reaching past the image edge are clipped by the
/// drawing routine, not rejected.
pub fn draw_overlay(
    source: &Path,
    boxes: &[GlobalBox],
    output: &Path,
) -> Result<(), OverlayError> {
    let mut img = image::open(source)?.to_rgba8();

    info!(
        boxes = boxes.len(),
        source = %source.display(),
        "Drawing detection overlay"
    );

    for global_box in boxes {
        let width = global_box.width().round() as i32;
        let height = global_box.height().round() as i32;

        if width < 1 || height < 1 {
            debug!(bounds = %global_box, "Skipping degenerate box");
            continue;
        }

        let left = global_box.x1.round() as i32;
        let top = global_box.y1.round() as i32;

        // Nested rectangles give the outline its weight
        for inset in 0..BOX_THICKNESS {
            let inner_width = width - 2 * inset;
            let inner_height = height - 2 * inset;
            if inner_width < 1 || inner_height < 1 {
                break;
            }

            let rect =
                Rect::at(left + inset, top + inset).of_size(inner_width as u32, inner_height as u32);
            draw_hollow_rect_mut(&mut img, rect, BOX_COLOR);
        }
    }

    img.save(output).map_err(|e| OverlayError::SaveFailed {
        path: output.display().to_string(),
        reason: e.to_string(),
    })?;

    info!(output = %output.display(), "Overlay image written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use std::path::PathBuf;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn write_white_source(dir: &Path, width: u32, height: u32) -> PathBuf {
        let img = RgbaImage::from_pixel(width, height, WHITE);
        let path = dir.join("source.png");
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_draws_box_outline() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_white_source(dir.path(), 100, 80);
        let output = dir.path().join("out.png");

        let boxes = vec![GlobalBox {
            x1: 10.0,
            y1: 10.0,
            x2: 50.0,
            y2: 40.0,
        }];

        draw_overlay(&source, &boxes, &output).unwrap();

        let img = image::open(&output).unwrap().to_rgba8();
        // Outer and second outline rings are painted, the interior is not
        assert_eq!(*img.get_pixel(10, 10), BOX_COLOR);
        assert_eq!(*img.get_pixel(11, 11), BOX_COLOR);
        assert_eq!(*img.get_pixel(30, 25), WHITE);
        // The source file is untouched
        let original = image::open(&source).unwrap().to_rgba8();
        assert_eq!(*original.get_pixel(10, 10), WHITE);
    }

    #[test]
    fn test_skips_degenerate_boxes() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_white_source(dir.path(), 50, 50);
        let output = dir.path().join("out.png");

        let boxes = vec![GlobalBox {
            x1: 20.0,
            y1: 20.0,
            x2: 20.2,
            y2: 20.2,
        }];

        draw_overlay(&source, &boxes, &output).unwrap();

        let img = image::open(&output).unwrap().to_rgba8();
        assert_eq!(*img.get_pixel(20, 20), WHITE);
    }

    #[test]
    fn test_clips_boxes_past_the_edge() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_white_source(dir.path(), 50, 50);
        let output = dir.path().join("out.png");

        let boxes = vec![GlobalBox {
            x1: 40.0,
            y1: 40.0,
            x2: 90.0,
            y2: 90.0,
        }];

        draw_overlay(&source, &boxes, &output).unwrap();
        assert!(output.exists());
    }

    #[test]
    fn test_no_boxes_still_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_white_source(dir.path(), 30, 30);
        let output = dir.path().join("out.png");

        draw_overlay(&source, &[], &output).unwrap();
        assert!(output.exists());
    }

    #[test]
    fn test_missing_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = draw_overlay(
            &dir.path().join("nope.png"),
            &[],
            &dir.path().join("out.png"),
        );
        assert!(matches!(result, Err(OverlayError::OpenFailed(_))));
    }
}
