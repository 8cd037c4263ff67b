use tabled::Table;

use crate::{
    config, error, info,
    management::{SnapshotManager, TokenManager},
    spotify,
    types::TrackTableRow,
    warning,
};

pub async fn tracks(playlist_url: String, snapshot: bool) {
    if let Err(e) = config::validate() {
        error!("{}", e);
    }

    let tokens = TokenManager::new();

    let resolved = match spotify::playlist::get_playlist_tracks(&tokens, &playlist_url).await {
        Ok(resolved) => resolved,
        Err(e) => error!("Failed to resolve playlist: {}", e),
    };

    if resolved.tracks.is_empty() {
        warning!("Playlist contains no usable tracks.");
        return;
    }

    let rows: Vec<TrackTableRow> = resolved
        .tracks
        .iter()
        .enumerate()
        .map(|(position, track)| TrackTableRow {
            position: position + 1,
            title: track.title.clone(),
            artists: track.artists.join(", "),
        })
        .collect();

    println!("{}", Table::new(rows));
    info!(
        "{} tracks ({} malformed items skipped)",
        resolved.tracks.len(),
        resolved.skipped
    );

    if snapshot {
        match SnapshotManager::new(resolved.tracks.clone())
            .persist(&config::output_dir())
            .await
        {
            Ok(path) => info!("Track snapshot written to {}", path.display()),
            Err(e) => warning!("Cannot write track snapshot: {:?}", e),
        }
    }
}
