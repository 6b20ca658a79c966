//! Scoring pool configuration and result types

use crate::coord::LocalBox;
use crate::tile::TileIdentity;
use std::time::Duration;

/// Configuration for the scoring pool.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of concurrent scoring workers (default: 5)
    pub workers: usize,
    /// Pool-wide deadline for scoring one batch of tiles (default: 300s)
    pub timeout: Duration,
    /// Score in percent a detection must exceed to be kept (default: 50.0)
    pub score_threshold: f64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: 5,
            timeout: Duration::from_secs(300),
            score_threshold: 50.0,
        }
    }
}

impl PoolConfig {
    /// Set the number of concurrent scoring workers.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the pool-wide deadline in seconds.
    pub fn with_timeout_secs(mut self, timeout: u64) -> Self {
        self.timeout = Duration::from_secs(timeout);
        self
    }

    /// Set the score threshold in percent.
    pub fn with_score_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = threshold;
        self
    }
}

/// One detection that survived threshold filtering, in tile-local pixels.
#[derive(Debug, Clone)]
pub struct LocalDetection {
    /// Tile the detection was found in
    pub tile: TileIdentity,
    /// Model confidence as a percentage
    pub probability_percent: f64,
    /// Detection bounds in tile-local pixels
    pub local_box: LocalBox,
}

/// A tile that could not be scored.
#[derive(Debug, Clone)]
pub struct TileFailure {
    /// Tile file name
    pub tile: String,
    /// What went wrong
    pub error: String,
}

/// Outcome of scoring one batch of tiles.
///
/// A report with failures or a tripped deadline is still a usable result;
/// it simply covers fewer tiles than were submitted.
#[derive(Debug, Clone)]
pub struct ScoreReport {
    /// Detections that cleared the score threshold, in no particular order
    pub detections: Vec<LocalDetection>,
    /// Tiles that could not be scored
    pub failures: Vec<TileFailure>,
    /// True when the pool deadline expired before every tile was scored
    pub timed_out: bool,
    /// Wall-clock time the batch took
    pub elapsed: Duration,
}

impl ScoreReport {
    /// True when some submitted tiles did not produce results.
    pub fn is_partial(&self) -> bool {
        self.timed_out || !self.failures.is_empty()
    }
}
