//! Bounded-concurrency scoring pool.
//!
//! Scores a batch of tiles against a [`ScoringService`] with a fixed number
//! of workers pulling from a shared queue. Per-tile failures are contained:
//! a tile that cannot be read or scored is logged and recorded, and the
//! rest of the batch carries on. A pool-wide deadline bounds the whole
//! batch; when it expires the pool stops handing out new work, lets
//! in-flight requests finish, and returns whatever was scored so far.
//!
//! Every call to [`ScoringPool::score_all`] owns its queue and its report,
//! so one batch can never leak tiles or scores into the next.

mod types;

pub use types::{LocalDetection, PoolConfig, ScoreReport, TileFailure};

use crate::coord::LocalBox;
use crate::scorer::{ScorerError, ScoringService};
use crate::tile::TileSource;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Event sent from a worker to the collector.
enum WorkerEvent {
    Detection(LocalDetection),
    Failure(TileFailure),
}

/// Why a single tile failed to score.
enum TileScoreError {
    Read(std::io::Error),
    Scoring(ScorerError),
}

impl fmt::Display for TileScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileScoreError::Read(e) => write!(f, "Failed to read tile: {}", e),
            TileScoreError::Scoring(e) => write!(f, "Scoring failed: {}", e),
        }
    }
}

/// Scoring pool with a fixed worker count and a batch deadline.
pub struct ScoringPool<S: ScoringService> {
    scorer: Arc<S>,
    tile_width: f64,
    tile_height: f64,
    config: PoolConfig,
}

impl<S: ScoringService + 'static> ScoringPool<S> {
    /// Creates a new scoring pool.
    ///
    /// # Arguments
    ///
    /// * `scorer` - Service used to score each tile
    /// * `tile_width` - Tile width in pixels, used to denormalize boxes
    /// * `tile_height` - Tile height in pixels, used to denormalize boxes
    /// * `config` - Worker count, deadline and score threshold
    pub fn new(scorer: S, tile_width: f64, tile_height: f64, config: PoolConfig) -> Self {
        Self {
            scorer: Arc::new(scorer),
            tile_width,
            tile_height,
            config,
        }
    }

    /// Scores every tile in the batch.
    ///
    /// Detections below the score threshold are dropped; surviving ones are
    /// denormalized into tile-local pixels. The returned report carries the
    /// detections, the tiles that failed, and whether the deadline tripped.
    /// Tiles are scored in no promised order.
    pub async fn score_all(&self, tiles: Vec<TileSource>) -> ScoreReport {
        let started = Instant::now();
        let total = tiles.len();

        if tiles.is_empty() {
            return ScoreReport {
                detections: Vec::new(),
                failures: Vec::new(),
                timed_out: false,
                elapsed: started.elapsed(),
            };
        }

        info!(
            tiles = total,
            workers = self.config.workers,
            timeout_secs = self.config.timeout.as_secs(),
            scorer = self.scorer.name(),
            "Scoring tiles"
        );

        // Queue sized to the batch so every tile is enqueued up front and
        // the sender can be dropped before workers start
        let (work_tx, work_rx) = mpsc::channel::<TileSource>(total);
        for tile in tiles {
            let _ = work_tx.send(tile).await;
        }
        drop(work_tx);
        let work_rx = Arc::new(Mutex::new(work_rx));

        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<WorkerEvent>();
        let cancel = CancellationToken::new();

        // Always run at least one worker
        let worker_count = self.config.workers.max(1);
        let mut workers = JoinSet::new();
        for worker_id in 0..worker_count {
            let scorer = Arc::clone(&self.scorer);
            let work_rx = Arc::clone(&work_rx);
            let event_tx = event_tx.clone();
            let cancel = cancel.clone();
            let tile_width = self.tile_width;
            let tile_height = self.tile_height;
            let threshold = self.config.score_threshold;

            workers.spawn(async move {
                worker_loop(
                    worker_id,
                    scorer,
                    work_rx,
                    event_tx,
                    cancel,
                    tile_width,
                    tile_height,
                    threshold,
                )
                .await;
            });
        }
        // The collector's recv() sees the channel close once the last
        // worker drops its sender clone
        drop(event_tx);

        let deadline = tokio::time::Instant::now() + self.config.timeout;
        let mut detections = Vec::new();
        let mut failures = Vec::new();
        let mut timed_out = false;

        loop {
            tokio::select! {
                biased;

                _ = tokio::time::sleep_until(deadline), if !timed_out => {
                    warn!(
                        timeout_secs = self.config.timeout.as_secs(),
                        detections = detections.len(),
                        failures = failures.len(),
                        "Scoring deadline exceeded, returning partial results"
                    );
                    timed_out = true;
                    cancel.cancel();
                }

                event = event_rx.recv() => {
                    match event {
                        Some(WorkerEvent::Detection(detection)) => detections.push(detection),
                        Some(WorkerEvent::Failure(failure)) => failures.push(failure),
                        None => break,
                    }
                }
            }
        }

        // Workers have all exited once the event channel closes
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Scoring worker panicked");
            }
        }

        let elapsed = started.elapsed();
        info!(
            detections = detections.len(),
            failures = failures.len(),
            timed_out = timed_out,
            elapsed_secs = elapsed.as_secs_f64(),
            "Scoring complete"
        );

        ScoreReport {
            detections,
            failures,
            timed_out,
            elapsed,
        }
    }
}

/// Worker loop: pull one tile at a time until the queue drains or the
/// pool is cancelled.
#[allow(clippy::too_many_arguments)]
async fn worker_loop<S: ScoringService>(
    worker_id: usize,
    scorer: Arc<S>,
    work_rx: Arc<Mutex<mpsc::Receiver<TileSource>>>,
    event_tx: mpsc::UnboundedSender<WorkerEvent>,
    cancel: CancellationToken,
    tile_width: f64,
    tile_height: f64,
    threshold: f64,
) {
    loop {
        if cancel.is_cancelled() {
            debug!(worker = worker_id, "Worker stopping, pool cancelled");
            break;
        }

        // Hold the queue lock only while pulling one tile
        let tile = {
            let mut rx = work_rx.lock().await;
            rx.recv().await
        };

        let Some(tile) = tile else {
            debug!(worker = worker_id, "Worker stopping, queue drained");
            break;
        };

        match score_tile(&*scorer, &tile, tile_width, tile_height, threshold).await {
            Ok(detections) => {
                for detection in detections {
                    let _ = event_tx.send(WorkerEvent::Detection(detection));
                }
            }
            Err(e) => {
                warn!(tile = %tile.identity, error = %e, "Tile scoring failed, skipping tile");
                let _ = event_tx.send(WorkerEvent::Failure(TileFailure {
                    tile: tile.identity.file_name(),
                    error: e.to_string(),
                }));
            }
        }
    }
}

/// Scores one tile: read, detect, denormalize, filter.
async fn score_tile<S: ScoringService>(
    scorer: &S,
    tile: &TileSource,
    tile_width: f64,
    tile_height: f64,
    threshold: f64,
) -> Result<Vec<LocalDetection>, TileScoreError> {
    info!(tile = %tile.identity, "Scoring tile");

    let bytes = tokio::fs::read(&tile.path)
        .await
        .map_err(TileScoreError::Read)?;
    let predictions = scorer
        .detect(&bytes)
        .await
        .map_err(TileScoreError::Scoring)?;

    let mut detections = Vec::new();
    for prediction in predictions {
        let score = prediction.probability * 100.0;
        let x1 = prediction.bounding_box.left * tile_width;
        let y1 = prediction.bounding_box.top * tile_height;
        let x2 = x1 + prediction.bounding_box.width * tile_width;
        let y2 = y1 + prediction.bounding_box.height * tile_height;

        if score > threshold {
            info!(
                tile = %tile.identity,
                tag = %prediction.tag_name,
                score = score,
                "Found box at ({}, {}, {}, {})",
                x1,
                y1,
                x2,
                y2
            );
            detections.push(LocalDetection {
                tile: tile.identity,
                probability_percent: score,
                local_box: LocalBox::new(x1, y1, x2, y2),
            });
        } else {
            debug!(
                tile = %tile.identity,
                score = score,
                threshold = threshold,
                "Prediction below threshold, dropped"
            );
        }
    }

    Ok(detections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::{NormalizedBox, Prediction};
    use crate::tile::TileIdentity;
    use std::path::Path;
    use std::time::Duration;

    /// Mock scoring service with canned predictions.
    ///
    /// Fails any tile whose bytes equal `fail_on`, and can delay each call
    /// to exercise the deadline path.
    struct MockScoringService {
        predictions: Vec<Prediction>,
        fail_on: Option<Vec<u8>>,
        delay: Option<Duration>,
    }

    impl MockScoringService {
        fn returning(predictions: Vec<Prediction>) -> Self {
            Self {
                predictions,
                fail_on: None,
                delay: None,
            }
        }
    }

    impl ScoringService for MockScoringService {
        async fn detect(&self, image: &[u8]) -> Result<Vec<Prediction>, ScorerError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if let Some(bad) = &self.fail_on {
                if image == &bad[..] {
                    return Err(ScorerError::HttpError("mock failure".to_string()));
                }
            }
            Ok(self.predictions.clone())
        }

        fn name(&self) -> &str {
            "Mock"
        }
    }

    fn prediction(probability: f64) -> Prediction {
        Prediction {
            probability,
            tag_name: "pool".to_string(),
            bounding_box: NormalizedBox {
                left: 0.1,
                top: 0.2,
                width: 0.4,
                height: 0.2,
            },
        }
    }

    fn write_tile(dir: &Path, name: &str, content: &[u8]) -> TileSource {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        TileSource {
            identity: TileIdentity::from_file_name(name).unwrap(),
            path,
        }
    }

    #[tokio::test]
    async fn test_scores_every_tile() {
        let dir = tempfile::tempdir().unwrap();
        let tiles = vec![
            write_tile(dir.path(), "tile_1_0_0_0.png", b"one"),
            write_tile(dir.path(), "tile_2_0_1_0.png", b"two"),
            write_tile(dir.path(), "tile_3_1_0_0.png", b"three"),
        ];

        let pool = ScoringPool::new(
            MockScoringService::returning(vec![prediction(0.9)]),
            500.0,
            400.0,
            PoolConfig::default().with_workers(2),
        );

        let report = pool.score_all(tiles.clone()).await;

        assert_eq!(report.detections.len(), 3);
        assert!(report.failures.is_empty());
        assert!(!report.timed_out);
        assert!(!report.is_partial());

        // Every detection names a submitted tile and is denormalized into
        // tile pixels
        for detection in &report.detections {
            assert!(tiles.iter().any(|t| t.identity == detection.tile));
            assert!((detection.probability_percent - 90.0).abs() < 1e-9);
            assert!((detection.local_box.x1 - 50.0).abs() < 1e-9);
            assert!((detection.local_box.y1 - 80.0).abs() < 1e-9);
            assert!((detection.local_box.x2 - 250.0).abs() < 1e-9);
            assert!((detection.local_box.y2 - 160.0).abs() < 1e-9);
        }
    }

    #[tokio::test]
    async fn test_threshold_keeps_strictly_greater() {
        let dir = tempfile::tempdir().unwrap();
        let tiles = vec![write_tile(dir.path(), "tile_1_0_0_0.png", b"one")];

        // 0.5 is exactly the threshold and must be dropped; 0.9 survives
        let pool = ScoringPool::new(
            MockScoringService::returning(vec![
                prediction(0.9),
                prediction(0.5),
                prediction(0.3),
            ]),
            500.0,
            500.0,
            PoolConfig::default().with_workers(1).with_score_threshold(50.0),
        );

        let report = pool.score_all(tiles).await;

        assert_eq!(report.detections.len(), 1);
        assert!((report.detections[0].probability_percent - 90.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_one_bad_tile_does_not_abort_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let tiles = vec![
            write_tile(dir.path(), "tile_1_0_0_0.png", b"good-1"),
            write_tile(dir.path(), "tile_2_0_1_0.png", b"poison"),
            write_tile(dir.path(), "tile_3_1_0_0.png", b"good-2"),
        ];

        let service = MockScoringService {
            predictions: vec![prediction(0.9)],
            fail_on: Some(b"poison".to_vec()),
            delay: None,
        };
        let pool = ScoringPool::new(service, 500.0, 500.0, PoolConfig::default().with_workers(2));

        let report = pool.score_all(tiles).await;

        assert_eq!(report.detections.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].tile, "tile_2_0_1_0.png");
        assert!(report.failures[0].error.contains("mock failure"));
        assert!(report.is_partial());
        assert!(!report.timed_out);
    }

    #[tokio::test]
    async fn test_unreadable_tile_is_recorded_failure() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_tile(dir.path(), "tile_1_0_0_0.png", b"good");
        let missing = TileSource {
            identity: TileIdentity::from_file_name("tile_2_0_1_0.png").unwrap(),
            path: dir.path().join("tile_2_0_1_0.png"),
        };

        let pool = ScoringPool::new(
            MockScoringService::returning(vec![prediction(0.9)]),
            500.0,
            500.0,
            PoolConfig::default().with_workers(2),
        );

        let report = pool.score_all(vec![good, missing]).await;

        assert_eq!(report.detections.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].tile, "tile_2_0_1_0.png");
        assert!(report.failures[0].error.contains("Failed to read tile"));
    }

    #[tokio::test]
    async fn test_deadline_returns_partial_results() {
        let dir = tempfile::tempdir().unwrap();
        let tiles = vec![
            write_tile(dir.path(), "tile_1_0_0_0.png", b"one"),
            write_tile(dir.path(), "tile_2_0_1_0.png", b"two"),
            write_tile(dir.path(), "tile_3_1_0_0.png", b"three"),
        ];

        // One worker, each call slower than the whole deadline: the first
        // tile finishes after the deadline trips, the rest are never pulled
        let service = MockScoringService {
            predictions: vec![prediction(0.9)],
            fail_on: None,
            delay: Some(Duration::from_millis(500)),
        };
        let config = PoolConfig {
            workers: 1,
            timeout: Duration::from_millis(100),
            score_threshold: 50.0,
        };
        let pool = ScoringPool::new(service, 500.0, 500.0, config);

        let report = pool.score_all(tiles).await;

        assert!(report.timed_out);
        assert!(report.is_partial());
        assert_eq!(report.detections.len(), 1);
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn test_empty_batch_returns_empty_report() {
        let pool = ScoringPool::new(
            MockScoringService::returning(vec![prediction(0.9)]),
            500.0,
            500.0,
            PoolConfig::default(),
        );

        let report = pool.score_all(Vec::new()).await;

        assert!(report.detections.is_empty());
        assert!(report.failures.is_empty());
        assert!(!report.timed_out);
        assert!(!report.is_partial());
    }

    #[tokio::test]
    async fn test_zero_worker_config_still_scores() {
        let dir = tempfile::tempdir().unwrap();
        let tiles = vec![write_tile(dir.path(), "tile_1_0_0_0.png", b"one")];

        let pool = ScoringPool::new(
            MockScoringService::returning(vec![prediction(0.9)]),
            500.0,
            500.0,
            PoolConfig::default().with_workers(0),
        );

        let report = pool.score_all(tiles).await;
        assert_eq!(report.detections.len(), 1);
    }
}
