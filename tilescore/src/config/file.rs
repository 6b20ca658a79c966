//! Settings file handling for settings.ini.
//!
//! Loads the scoring service credentials and utility defaults. Every key
//! is required; a missing section or key is a configuration error that
//! aborts the run before any tiles are cut.

use ini::Ini;
use ini::Properties;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Section holding the prediction service connection settings.
const CUSTOM_VISION_SECTION: &str = "CustomVisionService";

/// Section holding run defaults.
const UTILITY_SECTION: &str = "UtilityDefaults";

/// Settings file errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failed to read settings file
    #[error("Failed to read settings file: {0}")]
    ReadError(#[from] ini::Error),

    /// Required section not present
    #[error("Required configuration file section ('{0}') not found")]
    MissingSection(&'static str),

    /// Required key not present
    #[error("Required configuration key '{key}' not found in section ('{section}')")]
    MissingKey {
        section: &'static str,
        key: &'static str,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

/// Settings for one scoring run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Prediction service base URL
    pub service_endpoint: String,
    /// Prediction API key sent with every scoring request
    pub prediction_key: String,
    /// Prediction resource identifier
    pub prediction_resource_id: String,
    /// Published model iteration to score against
    pub publish_iteration_name: String,
    /// Prediction project identifier
    pub project_id: String,
    /// Score threshold in percent
    pub bounding_box_score_threshold: f64,
    /// Directory for intermediate tile files
    pub temp_file_path: String,
}

impl Settings {
    /// Loads settings from an ini file at `path`.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        info!(file = %path.display(), "Reading configuration settings");
        let ini = Ini::load_from_file(path)?;

        let custom_vision = ini
            .section(Some(CUSTOM_VISION_SECTION))
            .ok_or(SettingsError::MissingSection(CUSTOM_VISION_SECTION))?;
        let utility = ini
            .section(Some(UTILITY_SECTION))
            .ok_or(SettingsError::MissingSection(UTILITY_SECTION))?;

        let threshold_raw = require(utility, UTILITY_SECTION, "BoundingBoxScoreThreshold")?;
        let bounding_box_score_threshold =
            threshold_raw
                .parse()
                .map_err(|_| SettingsError::InvalidValue {
                    section: UTILITY_SECTION.to_string(),
                    key: "BoundingBoxScoreThreshold".to_string(),
                    value: threshold_raw.to_string(),
                    reason: "must be a number (percent)".to_string(),
                })?;

        Ok(Self {
            service_endpoint: require(custom_vision, CUSTOM_VISION_SECTION, "ServiceEndpoint")?
                .to_string(),
            prediction_key: require(custom_vision, CUSTOM_VISION_SECTION, "PredictionKey")?
                .to_string(),
            prediction_resource_id: require(
                custom_vision,
                CUSTOM_VISION_SECTION,
                "PredictionResourceId",
            )?
            .to_string(),
            publish_iteration_name: require(
                custom_vision,
                CUSTOM_VISION_SECTION,
                "PublishIterationName",
            )?
            .to_string(),
            project_id: require(custom_vision, CUSTOM_VISION_SECTION, "ProjectId")?.to_string(),
            bounding_box_score_threshold,
            temp_file_path: require(utility, UTILITY_SECTION, "TempFilePath")?.to_string(),
        })
    }

    /// Logs the non-secret settings.
    ///
    /// The prediction service settings are redacted so secrets never end
    /// up in log streams.
    pub fn log_summary(&self) {
        info!("Configured with the following settings:");
        info!(
            threshold = self.bounding_box_score_threshold,
            "BoundingBoxScoreThreshold"
        );
        info!(path = %self.temp_file_path, "TempFilePath");
    }
}

fn require<'a>(
    section: &'a Properties,
    section_name: &'static str,
    key: &'static str,
) -> Result<&'a str, SettingsError> {
    section.get(key).ok_or(SettingsError::MissingKey {
        section: section_name,
        key,
    })
}
