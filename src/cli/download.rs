use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    config,
    converter::{orchestrator, session::WebConverter},
    downloader::AudioFileSink,
    error, info,
    management::{SnapshotManager, TokenManager},
    spotify, success,
    types::{AcquisitionResult, MatchedTrack, Outcome, SummaryTableRow},
    warning,
    youtube::{self, MatchError},
};

pub async fn download(playlist_url: String, concurrency: usize, snapshot: bool) {
    if let Err(e) = config::validate() {
        error!("{}", e);
    }

    let output_dir = config::output_dir();
    let tokens = TokenManager::new();

    let pb = ProgressBar::new_spinner();
    pb.set_message("Resolving playlist...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let resolved = match spotify::playlist::get_playlist_tracks(&tokens, &playlist_url).await {
        Ok(resolved) => {
            pb.finish_and_clear();
            resolved
        }
        Err(e) => {
            pb.finish_and_clear();
            error!("Failed to resolve playlist: {}", e);
        }
    };

    if resolved.tracks.is_empty() {
        warning!("Playlist contains no usable tracks.");
        return;
    }
    info!(
        "Resolved {} tracks ({} malformed items skipped)",
        resolved.tracks.len(),
        resolved.skipped
    );

    if snapshot {
        match SnapshotManager::new(resolved.tracks.clone())
            .persist(&output_dir)
            .await
        {
            Ok(path) => info!("Track snapshot written to {}", path.display()),
            Err(e) => warning!("Cannot write track snapshot: {:?}", e),
        }
    }

    let total = resolved.tracks.len();
    let mut results: Vec<Option<AcquisitionResult>> = (0..total).map(|_| None).collect();
    let mut pending: Vec<(usize, MatchedTrack)> = Vec::new();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} [{pos}/{len}] {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    for (position, track) in resolved.tracks.iter().enumerate() {
        pb.set_message(format!("Matching {}", track.title));
        match youtube::find_match(track).await {
            Ok(matched) => pending.push((position, matched)),
            Err(MatchError::NoMatch) => {
                results[position] = Some(AcquisitionResult {
                    track: track.clone(),
                    outcome: Outcome::NoMatch("no videos found".to_string()),
                });
            }
            Err(e) => {
                results[position] = Some(AcquisitionResult {
                    track: track.clone(),
                    outcome: Outcome::Failed(e.to_string()),
                });
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();
    info!("Matched {} of {} tracks", pending.len(), total);

    if !pending.is_empty() {
        info!(
            "Converting {} tracks in batches of {}",
            pending.len(),
            concurrency.max(1)
        );

        let driver = Arc::new(WebConverter::from_env());
        let sink = Arc::new(AudioFileSink::new(output_dir.clone()));

        let (positions, matched): (Vec<usize>, Vec<MatchedTrack>) = pending.into_iter().unzip();
        let acquired = orchestrator::run(driver, sink, matched, concurrency).await;

        for (position, result) in positions.into_iter().zip(acquired) {
            results[position] = Some(result);
        }
    }

    let results: Vec<AcquisitionResult> = results.into_iter().flatten().collect();
    report(&results, resolved.skipped);
}

fn report(results: &[AcquisitionResult], skipped: usize) {
    let mut saved = 0;
    let mut unmatched = 0;
    let mut failed = 0;

    let rows: Vec<SummaryTableRow> = results
        .iter()
        .map(|result| {
            match &result.outcome {
                Outcome::Saved(_) => saved += 1,
                Outcome::NoMatch(_) => unmatched += 1,
                Outcome::Failed(_) => failed += 1,
            }
            SummaryTableRow {
                title: result.track.title.clone(),
                artists: result.track.artists.join(", "),
                outcome: result.outcome.describe(),
            }
        })
        .collect();

    println!("{}", Table::new(rows));

    if skipped > 0 {
        warning!("{} playlist items were skipped as malformed", skipped);
    }

    if unmatched == 0 && failed == 0 {
        success!("{} tracks saved, 0 failures", saved);
    } else {
        warning!(
            "{} saved, {} without a match, {} failed",
            saved,
            unmatched,
            failed
        );
    }
}
