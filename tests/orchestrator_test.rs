use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use spodl::converter::{
    ConversionError, ConvertDriver, ConvertSession, Step, orchestrator, session::classify_timeout,
};
use spodl::downloader::{DownloadError, TrackSink};
use spodl::types::{MatchedTrack, Outcome, TrackDescriptor};
use tokio::sync::Mutex;

// Helper function to create a matched track
fn create_matched_track(title: &str, video_id: &str) -> MatchedTrack {
    MatchedTrack {
        track: TrackDescriptor {
            title: title.to_string(),
            artists: vec!["Artist".to_string()],
        },
        video_id: video_id.to_string(),
        download_url: None,
    }
}

/// Scripted conversion driver: per video id, a number of recoverable
/// timeouts to emit before succeeding, or a hard failure. Tracks how many
/// sessions were opened and the peak number of concurrent conversions.
struct ScriptedDriver {
    timeouts: Arc<Mutex<HashMap<String, usize>>>,
    hard_fail: Arc<Vec<String>>,
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    opened: Arc<AtomicUsize>,
    converts: Arc<AtomicUsize>,
}

impl ScriptedDriver {
    fn new(timeouts: HashMap<String, usize>, hard_fail: Vec<String>) -> Self {
        ScriptedDriver {
            timeouts: Arc::new(Mutex::new(timeouts)),
            hard_fail: Arc::new(hard_fail),
            active: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
            opened: Arc::new(AtomicUsize::new(0)),
            converts: Arc::new(AtomicUsize::new(0)),
        }
    }
}

struct ScriptedSession {
    timeouts: Arc<Mutex<HashMap<String, usize>>>,
    hard_fail: Arc<Vec<String>>,
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    converts: Arc<AtomicUsize>,
}

#[async_trait]
impl ConvertDriver for ScriptedDriver {
    type Session = ScriptedSession;

    async fn open(&self) -> Result<ScriptedSession, ConversionError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(ScriptedSession {
            timeouts: Arc::clone(&self.timeouts),
            hard_fail: Arc::clone(&self.hard_fail),
            active: Arc::clone(&self.active),
            peak: Arc::clone(&self.peak),
            converts: Arc::clone(&self.converts),
        })
    }
}

#[async_trait]
impl ConvertSession for ScriptedSession {
    async fn convert(&mut self, track: &MatchedTrack) -> Result<String, ConversionError> {
        self.converts.fetch_add(1, Ordering::SeqCst);
        let running = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(running, Ordering::SeqCst);

        // Give sibling tasks a chance to overlap
        tokio::time::sleep(Duration::from_millis(20)).await;

        let result = if self.hard_fail.contains(&track.video_id) {
            Err(ConversionError::Failed(
                "converter reported failure".to_string(),
            ))
        } else {
            let mut timeouts = self.timeouts.lock().await;
            let remaining = timeouts.entry(track.video_id.clone()).or_insert(0);
            if *remaining > 0 {
                *remaining -= 1;
                Err(ConversionError::Timeout {
                    step: Step::AwaitingLink,
                })
            } else {
                Ok(format!("https://files.example/{}.mp3", track.video_id))
            }
        };

        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn close(self) {}
}

/// In-memory sink so the scheduler can be exercised without touching the
/// filesystem or the network.
struct MemorySink;

#[async_trait]
impl TrackSink for MemorySink {
    async fn save(
        &self,
        track: &MatchedTrack,
        _download_url: &str,
    ) -> Result<PathBuf, DownloadError> {
        Ok(PathBuf::from(format!("{}.mp3", track.track.title)))
    }
}

#[tokio::test]
async fn test_batch_sequencing_bounds_concurrency() {
    let tracks: Vec<MatchedTrack> = (0..7)
        .map(|i| create_matched_track(&format!("Song {}", i), &format!("vid{}", i)))
        .collect();

    let driver = Arc::new(ScriptedDriver::new(HashMap::new(), Vec::new()));
    let peak = Arc::clone(&driver.peak);
    let opened = Arc::clone(&driver.opened);

    let results = orchestrator::run(driver, Arc::new(MemorySink), tracks, 3).await;

    // One result per input track, in input order regardless of completion order
    assert_eq!(results.len(), 7);
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.track.title, format!("Song {}", i));
        assert!(matches!(result.outcome, Outcome::Saved(_)));
    }

    // Never more than three conversions in flight, one session per track
    assert!(peak.load(Ordering::SeqCst) <= 3);
    assert_eq!(opened.load(Ordering::SeqCst), 7);
}

#[tokio::test]
async fn test_retries_recoverable_timeouts_until_success() {
    let mut timeouts = HashMap::new();
    timeouts.insert("vid0".to_string(), 2);

    let driver = Arc::new(ScriptedDriver::new(timeouts, Vec::new()));
    let converts = Arc::clone(&driver.converts);
    let opened = Arc::clone(&driver.opened);

    let tracks = vec![create_matched_track("Song 0", "vid0")];
    let results = orchestrator::run(driver, Arc::new(MemorySink), tracks, 3).await;

    // Two recoverable timeouts, third attempt succeeds
    assert!(matches!(results[0].outcome, Outcome::Saved(_)));
    assert_eq!(converts.load(Ordering::SeqCst), 3);

    // The session is reused across retries
    assert_eq!(opened.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_fails_after_max_attempts() {
    let mut timeouts = HashMap::new();
    timeouts.insert("vid0".to_string(), 10);

    let driver = Arc::new(ScriptedDriver::new(timeouts, Vec::new()));
    let converts = Arc::clone(&driver.converts);

    let tracks = vec![create_matched_track("Song 0", "vid0")];
    let results = orchestrator::run(driver, Arc::new(MemorySink), tracks, 3).await;

    match &results[0].outcome {
        Outcome::Failed(reason) => assert!(reason.contains("max attempts exceeded")),
        other => panic!("expected failure, got {:?}", other),
    }

    // The attempt budget is respected
    assert_eq!(converts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_failure_does_not_abort_batch() {
    let driver = Arc::new(ScriptedDriver::new(
        HashMap::new(),
        vec!["vid0".to_string()],
    ));
    let converts = Arc::clone(&driver.converts);

    let tracks = vec![
        create_matched_track("Song 0", "vid0"),
        create_matched_track("Song 1", "vid1"),
    ];
    let results = orchestrator::run(driver, Arc::new(MemorySink), tracks, 2).await;

    // The hard failure is recorded without retries, the sibling still saves
    assert!(matches!(results[0].outcome, Outcome::Failed(_)));
    assert!(matches!(results[1].outcome, Outcome::Saved(_)));
    assert_eq!(converts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_zero_concurrency_is_clamped() {
    let driver = Arc::new(ScriptedDriver::new(HashMap::new(), Vec::new()));

    let tracks = vec![create_matched_track("Song 0", "vid0")];
    let results = orchestrator::run(driver, Arc::new(MemorySink), tracks, 0).await;

    assert!(matches!(results[0].outcome, Outcome::Saved(_)));
}

#[test]
fn test_classify_timeout_respects_result_panel() {
    // No result panel: the page may still get there, retry is worthwhile
    assert!(matches!(
        classify_timeout(Step::AwaitingLink, false),
        ConversionError::Timeout { .. }
    ));

    // Result panel present: the page finished and the conversion failed
    assert!(matches!(
        classify_timeout(Step::AwaitingLink, true),
        ConversionError::Failed(_)
    ));
}
