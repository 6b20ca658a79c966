//! Remote object-detection service abstraction
//!
//! This module provides the trait and implementation for scoring tile
//! images against a remote prediction endpoint. The service returns
//! detections in normalized tile coordinates; denormalization and
//! threshold filtering happen in the scoring pool, so implementations
//! stay a thin wire-format boundary.

mod custom_vision;
mod http;
mod types;

pub use custom_vision::CustomVisionScorer;
pub use http::{AsyncHttpClient, AsyncReqwestClient};
pub use types::{NormalizedBox, Prediction, ScorerError, ScoringService};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
