//! Scoring service types and traits

use serde::Deserialize;
use std::fmt;
use std::future::Future;

/// Errors that can occur calling a scoring service.
#[derive(Debug, Clone, PartialEq)]
pub enum ScorerError {
    /// HTTP request failed
    HttpError(String),
    /// Response body could not be parsed
    InvalidResponse(String),
}

impl fmt::Display for ScorerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScorerError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            ScorerError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for ScorerError {}

/// One detection returned by the scoring service for a single tile.
///
/// Coordinates are fractions of the tile dimensions; the caller
/// denormalizes them against the actual tile size in pixels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// Detection confidence as a fraction in [0, 1]
    pub probability: f64,
    /// Label the model assigned to the detection
    pub tag_name: String,
    /// Detection location as fractions of the tile dimensions
    pub bounding_box: NormalizedBox,
}

/// A bounding box in normalized tile coordinates.
///
/// `left`/`top` locate the box's top-left corner and `width`/`height` its
/// extent, all as fractions of the tile dimensions in [0, 1].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Trait for remote object-detection services.
///
/// Implementors send one tile image to a prediction endpoint and return
/// the model's raw predictions. Uses non-blocking I/O via async/await so
/// many tiles can be in flight at once.
pub trait ScoringService: Send + Sync {
    /// Scores a single tile image.
    ///
    /// # Arguments
    ///
    /// * `image` - Raw encoded image bytes (PNG)
    ///
    /// # Returns
    ///
    /// The unfiltered predictions for this tile or an error.
    fn detect(&self, image: &[u8])
        -> impl Future<Output = Result<Vec<Prediction>, ScorerError>> + Send;

    /// Returns the service's name for logging and identification.
    fn name(&self) -> &str;
}
