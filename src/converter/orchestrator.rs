use std::sync::Arc;

use crate::{
    converter::{ConversionError, ConvertDriver, ConvertSession},
    downloader::TrackSink,
    types::{AcquisitionResult, MatchedTrack, Outcome},
    warning,
};

pub const DEFAULT_CONCURRENCY: usize = 3;
pub const MAX_ATTEMPTS: usize = 3;

/// Runs the download stage over all matched tracks.
///
/// Partitions the input into fixed-size batches of `concurrency`. All
/// tracks of a batch run concurrently, each with its own conversion
/// session; the next batch is scheduled only once every task of the
/// current batch has settled, success or failure. This is a deliberate
/// bound on simultaneous automation sessions, not a throughput
/// optimization.
///
/// Per track, up to [`MAX_ATTEMPTS`] conversion attempts are made against
/// one session, retrying only on recoverable timeouts. A successful
/// conversion is handed straight to the sink inside the same task, so
/// partial output exists even when a later track fails and a slow download
/// never blocks sibling tracks.
///
/// # Returns
///
/// One [`AcquisitionResult`] per input track, in input order regardless of
/// completion order. A single track's failure never aborts its batch or
/// the run.
pub async fn run<D, S>(
    driver: Arc<D>,
    sink: Arc<S>,
    tracks: Vec<MatchedTrack>,
    concurrency: usize,
) -> Vec<AcquisitionResult>
where
    D: ConvertDriver + 'static,
    D::Session: 'static,
    S: TrackSink + 'static,
{
    let concurrency = concurrency.max(1);
    let total = tracks.len();
    let mut results: Vec<Option<AcquisitionResult>> = (0..total).map(|_| None).collect();

    let indexed: Vec<(usize, MatchedTrack)> = tracks.into_iter().enumerate().collect();

    for batch in indexed.chunks(concurrency) {
        let mut handles = Vec::new();

        for (position, track) in batch.to_vec() {
            let driver = Arc::clone(&driver);
            let sink = Arc::clone(&sink);
            let descriptor = track.track.clone();
            let handle = tokio::spawn(async move { process_track(driver, sink, track).await });
            handles.push((position, descriptor, handle));
        }

        // The batch settles completely before the next one is scheduled.
        for (position, descriptor, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    warning!("Task join error: {}", e);
                    AcquisitionResult {
                        track: descriptor,
                        outcome: Outcome::Failed(format!("task join error: {}", e)),
                    }
                }
            };
            results[position] = Some(result);
        }
    }

    results.into_iter().flatten().collect()
}

async fn process_track<D, S>(
    driver: Arc<D>,
    sink: Arc<S>,
    mut track: MatchedTrack,
) -> AcquisitionResult
where
    D: ConvertDriver,
    S: TrackSink,
{
    let descriptor = track.track.clone();

    let mut session = match driver.open().await {
        Ok(session) => session,
        Err(e) => {
            return AcquisitionResult {
                track: descriptor,
                outcome: Outcome::Failed(e.to_string()),
            };
        }
    };

    let converted = convert_with_retries(&mut session, &track).await;
    session.close().await;

    match converted {
        Ok(download_url) => {
            track.download_url = Some(download_url.clone());
            match sink.save(&track, &download_url).await {
                Ok(path) => AcquisitionResult {
                    track: descriptor,
                    outcome: Outcome::Saved(path),
                },
                Err(e) => AcquisitionResult {
                    track: descriptor,
                    outcome: Outcome::Failed(e.to_string()),
                },
            }
        }
        Err(e) => AcquisitionResult {
            track: descriptor,
            outcome: Outcome::Failed(e.to_string()),
        },
    }
}

/// Retries a conversion on recoverable timeouts, up to the attempt budget.
/// The session is reused; every attempt navigates from scratch.
async fn convert_with_retries<C>(
    session: &mut C,
    track: &MatchedTrack,
) -> Result<String, ConversionError>
where
    C: ConvertSession,
{
    let mut attempt = 0;

    loop {
        attempt += 1;
        match session.convert(track).await {
            Ok(download_url) => return Ok(download_url),
            Err(ConversionError::Timeout { step }) => {
                if attempt >= MAX_ATTEMPTS {
                    return Err(ConversionError::AttemptsExhausted);
                }
                warning!(
                    "{}: timed out while {}, retrying ({}/{})",
                    track.track.title,
                    step,
                    attempt,
                    MAX_ATTEMPTS
                );
            }
            Err(e) => return Err(e),
        }
    }
}
