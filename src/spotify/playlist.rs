use std::{fmt, time::Duration};

use reqwest::{Client, header::AUTHORIZATION};
use serde_json::Value;
use url::Url;

use crate::{
    config,
    management::TokenManager,
    spotify::auth::AuthError,
    types::{ResolvedPlaylist, TrackDescriptor},
};

#[derive(Debug)]
pub enum ResolveError {
    InvalidReference(String),
    MalformedResponse,
    Auth(AuthError),
    Http(reqwest::Error),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::InvalidReference(url) => {
                write!(f, "not a valid playlist URL: {}", url)
            }
            ResolveError::MalformedResponse => {
                write!(f, "playlist page response is missing an items array")
            }
            ResolveError::Auth(e) => write!(f, "{}", e),
            ResolveError::Http(e) => write!(f, "playlist request failed: {}", e),
        }
    }
}

impl std::error::Error for ResolveError {}

impl From<AuthError> for ResolveError {
    fn from(err: AuthError) -> Self {
        ResolveError::Auth(err)
    }
}

impl From<reqwest::Error> for ResolveError {
    fn from(err: reqwest::Error) -> Self {
        ResolveError::Http(err)
    }
}

/// Extracts the playlist identifier from a playlist URL.
///
/// Parses the input as a URL, splits the path into segments and takes the
/// segment immediately following `"playlist"`. Query parameters (`?si=...`)
/// and anything after the identifier are ignored.
///
/// # Errors
///
/// Returns `ResolveError::InvalidReference` when the input is not a
/// well-formed URL, the `"playlist"` marker is absent, or no non-empty
/// segment follows it.
pub fn extract_playlist_id(playlist_url: &str) -> Result<String, ResolveError> {
    let parsed = Url::parse(playlist_url)
        .map_err(|_| ResolveError::InvalidReference(playlist_url.to_string()))?;

    let segments: Vec<&str> = match parsed.path_segments() {
        Some(segments) => segments.collect(),
        None => return Err(ResolveError::InvalidReference(playlist_url.to_string())),
    };

    let marker = segments.iter().position(|segment| *segment == "playlist");

    match marker.and_then(|index| segments.get(index + 1)) {
        Some(id) if !id.is_empty() => Ok((*id).to_string()),
        _ => Err(ResolveError::InvalidReference(playlist_url.to_string())),
    }
}

/// Collects track descriptors from one page worth of playlist items.
///
/// Items lacking a usable track name or artist array are skipped and
/// counted; partial data loss is acceptable where a total-request failure
/// is not. Order and duplicates are preserved.
pub fn collect_page_items(items: &[Value]) -> (Vec<TrackDescriptor>, usize) {
    let mut tracks = Vec::new();
    let mut skipped = 0;

    for item in items {
        let track = item.get("track");
        let title = track
            .and_then(|t| t.get("name"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        let artists = track.and_then(|t| t.get("artists")).and_then(Value::as_array);

        let (title, artists) = match (title, artists) {
            (title, Some(artists)) if !title.is_empty() => (title, artists),
            _ => {
                skipped += 1;
                continue;
            }
        };

        let names: Vec<String> = artists
            .iter()
            .filter_map(|artist| artist.get("name").and_then(Value::as_str))
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        if names.is_empty() {
            skipped += 1;
            continue;
        }

        tracks.push(TrackDescriptor {
            title: title.to_string(),
            artists: names,
        });
    }

    (tracks, skipped)
}

/// Resolves a playlist URL into its ordered track list.
///
/// Walks the playlist's tracks endpoint with cursor pagination, following
/// the `next` field of every page until it is null or absent. A `next` that
/// is null on the first page is a valid single-page playlist.
///
/// # Arguments
///
/// * `tokens` - Shared credential cache; a valid token is acquired per page
///   so that pagination survives token expiry mid-walk
/// * `playlist_url` - Playlist reference as copied from the Spotify client
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(ResolvedPlaylist)` - Tracks in catalog order (duplicates
///   preserved) plus the count of skipped malformed items
/// - `Err(ResolveError)` - Bad reference, auth failure, HTTP failure, or a
///   page whose `items` field is absent or not an array
///
/// # Pagination Contract
///
/// Every page must carry an array-valued `items` field; a page that does
/// not is a contract violation and aborts the whole resolve call. Malformed
/// individual items are skipped and counted instead.
pub async fn get_playlist_tracks(
    tokens: &TokenManager,
    playlist_url: &str,
) -> Result<ResolvedPlaylist, ResolveError> {
    let playlist_id = extract_playlist_id(playlist_url)?;

    let mut next_url = Some(format!(
        "{uri}/playlists/{id}/tracks",
        uri = &config::spotify_api_url(),
        id = playlist_id
    ));

    let mut tracks: Vec<TrackDescriptor> = Vec::new();
    let mut skipped = 0;

    while let Some(page_url) = next_url {
        let credential = tokens.acquire().await?;

        let client = Client::new();
        let response = client
            .get(&page_url)
            .header(AUTHORIZATION, credential.authorization())
            .timeout(Duration::from_secs(5))
            .send()
            .await?
            .error_for_status()?;

        let page: Value = response.json().await?;

        let items = page
            .get("items")
            .and_then(Value::as_array)
            .ok_or(ResolveError::MalformedResponse)?;

        let (page_tracks, page_skipped) = collect_page_items(items);
        tracks.extend(page_tracks);
        skipped += page_skipped;

        next_url = page.get("next").and_then(Value::as_str).map(String::from);
    }

    Ok(ResolvedPlaylist { tracks, skipped })
}
