//! TileScore CLI - Command-line interface
//!
//! Runs one full detection pass over a source image: tile, score against
//! the configured prediction service, remap detections to source
//! coordinates and write the annotated overlay.

use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use tilescore::aggregate;
use tilescore::config::Settings;
use tilescore::logging::init_logging;
use tilescore::overlay::draw_overlay;
use tilescore::pool::{PoolConfig, ScoringPool};
use tilescore::scorer::{AsyncReqwestClient, CustomVisionScorer};
use tilescore::tiler::ImageTiler;

mod error;

use error::CliError;

#[derive(Parser)]
#[command(name = "tilescore")]
#[command(version = tilescore::VERSION)]
#[command(about = "Detect objects in a large image by scoring fixed-size tiles", long_about = None)]
struct Args {
    /// Source image to scan
    #[arg(long)]
    image: PathBuf,

    /// Where to write the annotated copy of the source image
    #[arg(long)]
    output: PathBuf,

    /// Settings file with the prediction service credentials
    #[arg(long, default_value = "settings.ini")]
    config: PathBuf,

    /// Tile width in pixels (must evenly divide the source width)
    #[arg(long, default_value = "500")]
    tile_width: u32,

    /// Tile height in pixels (must evenly divide the source height)
    #[arg(long, default_value = "500")]
    tile_height: u32,

    /// Directory for intermediate tile files (default: TempFilePath from config)
    #[arg(long)]
    tile_dir: Option<PathBuf>,

    /// Number of concurrent scoring workers
    #[arg(long, default_value = "5")]
    workers: usize,

    /// Pool-wide scoring deadline in seconds
    #[arg(long, default_value = "300")]
    timeout_secs: u64,

    /// Score threshold in percent (default: BoundingBoxScoreThreshold from config)
    #[arg(long)]
    threshold: Option<f64>,

    /// Also write each tile rotated by 90, 180 and 270 degrees
    #[arg(long)]
    permutations: bool,

    /// Keep the intermediate tiles instead of deleting them afterwards
    #[arg(long)]
    keep_tiles: bool,

    /// Directory for the session log file (stdout only when omitted)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Enable debug-level logging
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        e.exit();
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    let _logging_guard = init_logging(args.verbose, args.log_dir.as_deref())
        .map_err(CliError::LoggingInit)?;

    let settings = Settings::load_from(&args.config)?;
    settings.log_summary();

    let threshold = args
        .threshold
        .unwrap_or(settings.bounding_box_score_threshold);
    let tile_dir = args
        .tile_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&settings.temp_file_path));

    // Cut the source into tiles
    let tiler = ImageTiler::new(&tile_dir, args.tile_width, args.tile_height);
    let tiles = tiler.create_tiles(&args.image, args.permutations)?;
    info!(tiles = tiles.len(), dir = %tile_dir.display(), "Tiling complete");

    // Score them under bounded concurrency
    let scorer = CustomVisionScorer::new(
        AsyncReqwestClient::new().map_err(CliError::ScorerSetup)?,
        &settings.service_endpoint,
        &settings.project_id,
        &settings.publish_iteration_name,
        &settings.prediction_key,
    );
    let config = PoolConfig::default()
        .with_workers(args.workers)
        .with_timeout_secs(args.timeout_secs)
        .with_score_threshold(threshold);
    let pool = ScoringPool::new(
        scorer,
        args.tile_width as f64,
        args.tile_height as f64,
        config,
    );

    let report = pool.score_all(tiles).await;

    if report.timed_out {
        warn!(
            detections = report.detections.len(),
            "Scoring deadline exceeded; drawing the detections obtained so far"
        );
    }
    if !report.failures.is_empty() {
        warn!(
            failed = report.failures.len(),
            "Some tiles could not be scored; their detections are missing from the output"
        );
    }

    // Back to source-image coordinates, then draw
    let boxes = aggregate::remap_all(
        args.tile_width as f64,
        args.tile_height as f64,
        &report.detections,
    )?;
    draw_overlay(&args.image, &boxes, &args.output)?;

    if args.keep_tiles {
        info!(dir = %tile_dir.display(), "Keeping intermediate tiles");
    } else {
        let removed = tiler.cleanup()?;
        info!(removed = removed, "Intermediate tiles removed");
    }

    println!(
        "Found {} object(s) in {:.2}s; overlay written to {}",
        boxes.len(),
        report.elapsed.as_secs_f64(),
        args.output.display()
    );
    if report.is_partial() {
        println!(
            "Note: partial run ({} tile(s) failed{})",
            report.failures.len(),
            if report.timed_out { ", deadline exceeded" } else { "" }
        );
    }

    Ok(())
}
