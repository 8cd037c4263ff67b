//! Configuration management for the playlist downloader.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. Credentials are required and
//! validated up front; every service endpoint, selector and wait bound has a
//! default that matches the public services the tool was written against.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use dotenv;
use std::{env, path::PathBuf, time::Duration};

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `spodl/.env`. A missing file is not an error;
/// in that case configuration comes from the process environment alone.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/spodl/.env`
/// - macOS: `~/Library/Application Support/spodl/.env`
/// - Windows: `%LOCALAPPDATA%/spodl/.env`
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spodl/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    // A missing .env file is fine; the process environment still applies.
    let _ = dotenv::from_path(path);
    Ok(())
}

/// Checks that all required credentials are present.
///
/// Returns the list of missing variable names so the caller can report them
/// in one message. Must be called before any network activity; running
/// without credentials is a fatal configuration error.
pub fn validate() -> Result<(), String> {
    let required = [
        "SPOTIFY_CLIENT_ID",
        "SPOTIFY_CLIENT_SECRET",
        "YOUTUBE_API_KEY",
    ];

    let missing: Vec<&str> = required
        .iter()
        .filter(|var| env::var(var).map(|v| v.is_empty()).unwrap_or(true))
        .copied()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "Missing required environment variable(s): {}",
            missing.join(", ")
        ))
    }
}

/// Returns the Spotify API client ID used for the client-credentials exchange.
///
/// Empty when the `SPOTIFY_CLIENT_ID` environment variable is not set;
/// [`validate`] rejects that state before any request is made.
pub fn spotify_client_id() -> String {
    env::var("SPOTIFY_CLIENT_ID").unwrap_or_default()
}

/// Returns the Spotify API client secret used for the client-credentials
/// exchange.
///
/// # Security Note
///
/// The client secret should be kept confidential and never exposed in logs
/// or version control.
pub fn spotify_client_secret() -> String {
    env::var("SPOTIFY_CLIENT_SECRET").unwrap_or_default()
}

/// Returns the YouTube Data API key used for track matching.
pub fn youtube_api_key() -> String {
    env::var("YOUTUBE_API_KEY").unwrap_or_default()
}

/// Returns the Spotify Web API base URL.
pub fn spotify_api_url() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| "https://api.spotify.com/v1".to_string())
}

/// Returns the Spotify token exchange URL.
pub fn spotify_token_url() -> String {
    env::var("SPOTIFY_TOKEN_URL")
        .unwrap_or_else(|_| "https://accounts.spotify.com/api/token".to_string())
}

/// Returns the YouTube Data API search endpoint.
pub fn youtube_api_url() -> String {
    env::var("YOUTUBE_API_URL")
        .unwrap_or_else(|_| "https://www.googleapis.com/youtube/v3/search".to_string())
}

/// Returns the conversion site URL.
///
/// The site is loaded with the percent-encoded video URL appended as a
/// `url` query parameter.
pub fn converter_url() -> String {
    env::var("CONVERTER_URL").unwrap_or_else(|_| "https://cnvmp3.com".to_string())
}

/// Returns the WebDriver endpoint used to open conversion sessions.
///
/// Any WebDriver-compatible server works (chromedriver, geckodriver,
/// Selenium standalone). One session is opened per in-flight track, so the
/// server must allow at least `--concurrency` parallel sessions.
pub fn webdriver_url() -> String {
    env::var("WEBDRIVER_URL").unwrap_or_else(|_| "http://localhost:4444".to_string())
}

/// Returns the directory downloaded audio files are written to.
pub fn output_dir() -> PathBuf {
    PathBuf::from(env::var("OUTPUT_DIR").unwrap_or_else(|_| "./Downloaded Songs".to_string()))
}

/// Returns the CSS selector of the conversion site's format select control.
pub fn converter_format_selector() -> String {
    env::var("CONVERTER_FORMAT_SELECTOR").unwrap_or_else(|_| "#format-select".to_string())
}

/// Returns the option value selected on the format control.
///
/// Defaults to the highest-quality audio option the site offers.
pub fn converter_format_value() -> String {
    env::var("CONVERTER_FORMAT_VALUE").unwrap_or_else(|_| "320".to_string())
}

/// Returns the CSS selector of the conversion site's convert trigger.
pub fn converter_convert_selector() -> String {
    env::var("CONVERTER_CONVERT_SELECTOR").unwrap_or_else(|_| "#convert-btn".to_string())
}

/// Returns the CSS selector of the download-ready control carrying the link.
pub fn converter_link_selector() -> String {
    env::var("CONVERTER_LINK_SELECTOR").unwrap_or_else(|_| "#download-link".to_string())
}

/// Returns the CSS selector of the result panel probed after a timeout.
///
/// The panel's presence after a wait expires is treated as a genuine
/// conversion failure rather than a slow render. This is a heuristic; the
/// selector is configurable so it can track the site's markup.
pub fn converter_panel_selector() -> String {
    env::var("CONVERTER_PANEL_SELECTOR").unwrap_or_else(|_| "#result-panel".to_string())
}

/// Returns the wait bound for page loads and the format control.
pub fn converter_page_timeout() -> Duration {
    let secs = env::var("CONVERTER_PAGE_TIMEOUT_SECS")
        .unwrap_or_default()
        .parse::<u64>()
        .unwrap_or(60);
    Duration::from_secs(secs)
}

/// Returns the wait bound for the download-ready control.
///
/// Server-side transcoding dominates the pipeline's latency, hence the long
/// default of ten minutes.
pub fn converter_link_timeout() -> Duration {
    let secs = env::var("CONVERTER_LINK_TIMEOUT_SECS")
        .unwrap_or_default()
        .parse::<u64>()
        .unwrap_or(600);
    Duration::from_secs(secs)
}
