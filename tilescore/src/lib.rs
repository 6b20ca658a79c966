//! TileScore - tiled object detection over large images
//!
//! This library breaks a large source image into fixed-size tiles, scores
//! each tile against a remote object-detection service under bounded
//! concurrency, and remaps the surviving detections back into source-image
//! coordinates.
//!
//! # High-Level Flow
//!
//! ```ignore
//! use tilescore::config::Settings;
//! use tilescore::pool::{PoolConfig, ScoringPool};
//! use tilescore::scorer::{AsyncReqwestClient, CustomVisionScorer};
//! use tilescore::tiler::ImageTiler;
//!
//! let settings = Settings::load_from(Path::new("settings.ini"))?;
//!
//! // Cut the source image into 500x500 tiles
//! let tiler = ImageTiler::new(&settings.temp_file_path, 500, 500);
//! let tiles = tiler.create_tiles(Path::new("site.png"), false)?;
//!
//! // Score them, five at a time
//! let scorer = CustomVisionScorer::new(
//!     AsyncReqwestClient::new()?,
//!     &settings.service_endpoint,
//!     &settings.project_id,
//!     &settings.publish_iteration_name,
//!     &settings.prediction_key,
//! );
//! let pool = ScoringPool::new(scorer, 500.0, 500.0, PoolConfig::default());
//! let report = pool.score_all(tiles).await;
//!
//! // Back to source-image coordinates
//! let boxes = tilescore::aggregate::remap_all(500.0, 500.0, &report.detections)?;
//! ```

pub mod aggregate;
pub mod config;
pub mod coord;
pub mod logging;
pub mod overlay;
pub mod pool;
pub mod scorer;
pub mod tile;
pub mod tiler;

/// Version of the TileScore library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
