//! Azure Custom Vision prediction service

use super::http::AsyncHttpClient;
use super::types::{Prediction, ScorerError, ScoringService};
use serde::Deserialize;
use tracing::debug;

/// Response envelope from the Custom Vision detect endpoint.
///
/// Unknown fields (request id, iteration metadata) are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetectionResponse {
    predictions: Vec<Prediction>,
}

/// Custom Vision object-detection scorer.
///
/// Posts raw tile bytes to a published Custom Vision iteration's detect
/// endpoint and parses the prediction envelope it returns.
pub struct CustomVisionScorer<C: AsyncHttpClient> {
    http_client: C,
    endpoint: String,
    project_id: String,
    iteration_name: String,
    prediction_key: String,
}

impl<C: AsyncHttpClient> CustomVisionScorer<C> {
    /// Creates a new CustomVisionScorer with the given HTTP client.
    ///
    /// # Arguments
    ///
    /// * `http_client` - Client used for prediction requests
    /// * `endpoint` - Service base URL, e.g. `https://region.api.cognitive.microsoft.com`
    /// * `project_id` - Custom Vision project identifier
    /// * `iteration_name` - Published iteration to score against
    /// * `prediction_key` - Prediction API key sent with every request
    pub fn new(
        http_client: C,
        endpoint: impl Into<String>,
        project_id: impl Into<String>,
        iteration_name: impl Into<String>,
        prediction_key: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into(),
            project_id: project_id.into(),
            iteration_name: iteration_name.into(),
            prediction_key: prediction_key.into(),
        }
    }

    /// Constructs the detect URL for this project and iteration.
    fn build_url(&self) -> String {
        format!(
            "{}/customvision/v3.0/Prediction/{}/detect/iterations/{}/image",
            self.endpoint.trim_end_matches('/'),
            self.project_id,
            self.iteration_name
        )
    }
}

impl<C: AsyncHttpClient> ScoringService for CustomVisionScorer<C> {
    async fn detect(&self, image: &[u8]) -> Result<Vec<Prediction>, ScorerError> {
        let url = self.build_url();
        let headers = [
            ("Prediction-Key", self.prediction_key.as_str()),
            ("Content-Type", "application/octet-stream"),
        ];

        let body = self
            .http_client
            .post_octet_stream(&url, &headers, image.to_vec())
            .await?;

        let response: DetectionResponse = serde_json::from_slice(&body)
            .map_err(|e| ScorerError::InvalidResponse(format!("Bad prediction JSON: {}", e)))?;

        debug!(
            predictions = response.predictions.len(),
            "Prediction response parsed"
        );

        Ok(response.predictions)
    }

    fn name(&self) -> &str {
        "Custom Vision"
    }
}
