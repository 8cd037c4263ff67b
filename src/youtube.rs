//! YouTube Data API search client.
//!
//! Matches a track descriptor to a single video by querying the search
//! endpoint with the track title and artist names, restricted to the music
//! category. The service's own relevance ranking is trusted; no re-ranking
//! happens here.

use std::{fmt, time::Duration};

use reqwest::Client;

use crate::{
    config,
    types::{MatchedTrack, SearchErrorResponse, SearchResponse, TrackDescriptor},
    utils,
};

// Category 10 is "Music" in the YouTube Data API.
const MUSIC_CATEGORY_ID: &str = "10";

#[derive(Debug)]
pub enum MatchError {
    NoMatch,
    Service(String),
    Http(reqwest::Error),
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::NoMatch => write!(f, "no videos found"),
            MatchError::Service(message) => write!(f, "search service error: {}", message),
            MatchError::Http(e) => write!(f, "search request failed: {}", e),
        }
    }
}

impl std::error::Error for MatchError {}

impl From<reqwest::Error> for MatchError {
    fn from(err: reqwest::Error) -> Self {
        MatchError::Http(err)
    }
}

/// Builds the watch URL for a matched video id.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Finds the best video match for a track.
///
/// The query joins the track title and all artist names with spaces and
/// requests exactly one result from the music category, with a 5 second
/// timeout. The first (and only) result is taken as the match.
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(MatchedTrack)` - The track paired with the matched video id;
///   `download_url` stays empty until a conversion session fills it in
/// - `Err(MatchError::NoMatch)` - The search returned zero items
/// - `Err(MatchError::Service)` - The service reported an error; its own
///   message is surfaced
/// - `Err(MatchError::Http)` - Network or timeout failure
///
/// All failures are scoped to this track; the caller records them and moves
/// on to the next track.
pub async fn find_match(track: &TrackDescriptor) -> Result<MatchedTrack, MatchError> {
    let query = utils::search_query(track);

    let client = Client::new();
    let response = client
        .get(&config::youtube_api_url())
        .query(&[
            ("part", "snippet"),
            ("q", query.as_str()),
            ("type", "video"),
            ("maxResults", "1"),
            ("videoCategoryId", MUSIC_CATEGORY_ID),
            ("key", &config::youtube_api_key()),
        ])
        .timeout(Duration::from_secs(5))
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let message = response
            .json::<SearchErrorResponse>()
            .await
            .ok()
            .and_then(|body| body.error)
            .map(|e| e.message)
            .unwrap_or_else(|| format!("status {}", status));
        return Err(MatchError::Service(message));
    }

    let results = response.json::<SearchResponse>().await?;

    let video_id = results
        .items
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|item| item.id.video_id)
        .ok_or(MatchError::NoMatch)?;

    Ok(MatchedTrack {
        track: track.clone(),
        video_id,
        download_url: None,
    })
}
