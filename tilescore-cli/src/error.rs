//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;
use tilescore::config::SettingsError;
use tilescore::coord::CoordError;
use tilescore::overlay::OverlayError;
use tilescore::scorer::ScorerError;
use tilescore::tiler::TilerError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(std::io::Error),
    /// Settings file could not be loaded
    Settings(SettingsError),
    /// Source image could not be tiled
    Tiling(TilerError),
    /// Scoring client could not be created
    ScorerSetup(ScorerError),
    /// Detections could not be remapped to source coordinates
    Remap(CoordError),
    /// Overlay image could not be written
    Overlay(OverlayError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        if let CliError::Settings(_) = self {
            eprintln!();
            eprintln!("The settings file needs a [CustomVisionService] section with the");
            eprintln!("prediction endpoint and key, and a [UtilityDefaults] section with");
            eprintln!("BoundingBoxScoreThreshold and TempFilePath.");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Settings(e) => write!(f, "Configuration error: {}", e),
            CliError::Tiling(e) => write!(f, "Failed to tile source image: {}", e),
            CliError::ScorerSetup(e) => write!(f, "Failed to create scoring client: {}", e),
            CliError::Remap(e) => write!(f, "Failed to remap detections: {}", e),
            CliError::Overlay(e) => write!(f, "Failed to write overlay image: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::LoggingInit(e) => Some(e),
            CliError::Settings(e) => Some(e),
            CliError::Tiling(e) => Some(e),
            CliError::ScorerSetup(e) => Some(e),
            CliError::Remap(e) => Some(e),
            CliError::Overlay(e) => Some(e),
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(e: SettingsError) -> Self {
        CliError::Settings(e)
    }
}

impl From<TilerError> for CliError {
    fn from(e: TilerError) -> Self {
        CliError::Tiling(e)
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::Remap(e)
    }
}

impl From<OverlayError> for CliError {
    fn from(e: OverlayError) -> Self {
        CliError::Overlay(e)
    }
}
