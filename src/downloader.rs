//! Streams converted audio resources to disk.

use std::{
    fmt,
    path::{Path, PathBuf},
    time::Duration,
};

use async_trait::async_trait;
use reqwest::Client;
use tokio::{
    fs,
    io::{AsyncWriteExt, BufWriter},
};

use crate::{
    types::{MatchedTrack, TrackDescriptor},
    utils,
};

#[derive(Debug)]
pub enum DownloadError {
    Io(std::io::Error),
    Http(reqwest::Error),
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadError::Io(e) => write!(f, "cannot write audio file: {}", e),
            DownloadError::Http(e) => write!(f, "download failed: {}", e),
        }
    }
}

impl std::error::Error for DownloadError {}

impl From<std::io::Error> for DownloadError {
    fn from(err: std::io::Error) -> Self {
        DownloadError::Io(err)
    }
}

impl From<reqwest::Error> for DownloadError {
    fn from(err: reqwest::Error) -> Self {
        DownloadError::Http(err)
    }
}

/// Materializes a converted track. Separated from the orchestrator so the
/// scheduling logic can be exercised without touching the filesystem.
#[async_trait]
pub trait TrackSink: Send + Sync {
    async fn save(
        &self,
        track: &MatchedTrack,
        download_url: &str,
    ) -> Result<PathBuf, DownloadError>;
}

/// Writes audio files into the configured output directory.
pub struct AudioFileSink {
    output_dir: PathBuf,
}

impl AudioFileSink {
    pub fn new(output_dir: PathBuf) -> Self {
        AudioFileSink { output_dir }
    }
}

#[async_trait]
impl TrackSink for AudioFileSink {
    async fn save(
        &self,
        track: &MatchedTrack,
        download_url: &str,
    ) -> Result<PathBuf, DownloadError> {
        save_track(&self.output_dir, &track.track, download_url).await
    }
}

/// Streams the resource at `download_url` to
/// `<output_dir>/<title> - <artists>.mp3`, creating the directory if absent.
/// Title and artists are sanitized for the filesystem. A non-success fetch
/// status fails this track only and never disturbs sibling downloads.
pub async fn save_track(
    output_dir: &Path,
    track: &TrackDescriptor,
    download_url: &str,
) -> Result<PathBuf, DownloadError> {
    fs::create_dir_all(output_dir).await?;

    let path = output_dir.join(utils::output_file_name(track));

    let mut response = Client::new()
        .get(download_url)
        .timeout(Duration::from_secs(300))
        .send()
        .await?
        .error_for_status()?;

    let file = fs::File::create(&path).await?;
    let mut writer = BufWriter::new(file);

    while let Some(chunk) = response.chunk().await? {
        writer.write_all(&chunk).await?;
    }
    writer.flush().await?;

    Ok(path)
}
