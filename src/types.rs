use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

#[derive(Debug, Clone)]
pub struct Credential {
    pub access_token: String,
    pub token_type: String,
    pub expires_at_ms: u64,
}

impl Credential {
    pub fn from_token(token: Token, now_ms: u64) -> Self {
        Credential {
            access_token: token.access_token,
            token_type: token.token_type,
            expires_at_ms: now_ms + token.expires_in * 1000,
        }
    }

    pub fn is_valid(&self, now_ms: u64) -> bool {
        now_ms < self.expires_at_ms
    }

    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackDescriptor {
    pub title: String,
    pub artists: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedPlaylist {
    pub tracks: Vec<TrackDescriptor>,
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct MatchedTrack {
    pub track: TrackDescriptor,
    pub video_id: String,
    pub download_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AcquisitionResult {
    pub track: TrackDescriptor,
    pub outcome: Outcome,
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Saved(PathBuf),
    NoMatch(String),
    Failed(String),
}

impl Outcome {
    pub fn describe(&self) -> String {
        match self {
            Outcome::Saved(path) => format!("saved to {}", path.display()),
            Outcome::NoMatch(reason) => format!("no match ({})", reason),
            Outcome::Failed(reason) => format!("failed ({})", reason),
        }
    }
}

#[derive(Tabled)]
pub struct TrackTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub title: String,
    pub artists: String,
}

#[derive(Tabled)]
pub struct SummaryTableRow {
    pub title: String,
    pub artists: String,
    pub outcome: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub items: Option<Vec<SearchItem>>,
}

#[derive(Debug, Deserialize)]
pub struct SearchItem {
    pub id: SearchItemId,
}

#[derive(Debug, Deserialize)]
pub struct SearchItemId {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchErrorResponse {
    pub error: Option<SearchErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct SearchErrorBody {
    pub message: String,
}
