//! # Conversion Module
//!
//! This module drives the third-party conversion site that turns a matched
//! video into a downloadable audio resource, and schedules that work over
//! all matched tracks. It is the stateful heart of the pipeline: everything
//! before it is plain request/response, while a conversion is a multi-step
//! interaction with a page whose timing is unpredictable.
//!
//! ## Architecture
//!
//! ```text
//! CLI (download command)
//!          ↓
//! Orchestrator (batches, retries, result ordering)
//!          ↓
//! ConvertDriver / ConvertSession (trait seam)
//!          ↓
//! WebConverter (fantoccini WebDriver session)
//!          ↓
//! Conversion Site
//! ```
//!
//! ## Session State Machine
//!
//! Each conversion attempt walks one page through a fixed sequence:
//!
//! ```text
//! Navigating → FormatSelecting → Converting → AwaitingLink → LinkReady
//!                                                         ↘ Failed
//! ```
//!
//! - **Navigating**: load the site with the percent-encoded video URL as a
//!   query parameter, bounded by the page timeout (60 s default)
//! - **FormatSelecting**: wait for the format select control and pick the
//!   highest-quality audio option
//! - **Converting**: a single activation of the convert control, no wait
//! - **AwaitingLink**: wait for the download-ready control, bounded by the
//!   link timeout (600 s default, server-side transcoding is slow)
//! - **LinkReady**: read the control's link attribute and close the page
//!
//! A wait that expires is probed against the site's result panel: a visible
//! panel means the page finished and the conversion genuinely failed, an
//! absent panel means the page may still get there and the attempt is worth
//! retrying. The probe is a heuristic and its selector is configurable.
//!
//! ## Scheduling
//!
//! The orchestrator processes matched tracks in fixed-size batches. All
//! tracks of a batch run concurrently, each owning its own WebDriver
//! session; the next batch starts only once every task of the current batch
//! has settled. This bounds simultaneous automation sessions, which bounds
//! memory and load on the target site. Within a track, up to three attempts
//! are made, retrying only on recoverable timeouts; one track's failure
//! never aborts its batch or the run.
//!
//! ## Testing
//!
//! The [`ConvertDriver`]/[`ConvertSession`] traits decouple the scheduler
//! from the browser so batch sequencing and retry behavior are tested with
//! scripted in-memory sessions (see `tests/orchestrator_test.rs`).

pub mod orchestrator;
pub mod session;

use std::fmt;

use async_trait::async_trait;

use crate::types::MatchedTrack;

/// Pipeline step a conversion attempt was in when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Navigating,
    FormatSelecting,
    Converting,
    AwaitingLink,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Navigating => write!(f, "navigating to the converter"),
            Step::FormatSelecting => write!(f, "waiting for the format control"),
            Step::Converting => write!(f, "triggering the conversion"),
            Step::AwaitingLink => write!(f, "waiting for the download link"),
        }
    }
}

#[derive(Debug)]
pub enum ConversionError {
    /// A wait bound expired while the page still looked like it might get
    /// there. Worth another attempt.
    Timeout { step: Step },
    /// The page finished without producing a usable link. Not retried.
    Failed(String),
    /// WebDriver-level trouble (lost session, bad selector, protocol error).
    Driver(String),
    /// The per-track attempt budget ran out on recoverable timeouts.
    AttemptsExhausted,
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::Timeout { step } => write!(f, "timed out while {}", step),
            ConversionError::Failed(reason) => write!(f, "{}", reason),
            ConversionError::Driver(reason) => write!(f, "automation error: {}", reason),
            ConversionError::AttemptsExhausted => {
                write!(
                    f,
                    "max attempts exceeded after {} recoverable timeouts",
                    orchestrator::MAX_ATTEMPTS
                )
            }
        }
    }
}

impl std::error::Error for ConversionError {}

/// Opens conversion sessions. One driver is shared by all workers; every
/// session it opens is owned by exactly one in-flight track.
#[async_trait]
pub trait ConvertDriver: Send + Sync {
    type Session: ConvertSession + Send;

    async fn open(&self) -> Result<Self::Session, ConversionError>;
}

/// One automation-controlled page. Reused across retries for the same track,
/// never shared between concurrently running tracks.
#[async_trait]
pub trait ConvertSession: Send {
    /// Runs one conversion attempt from scratch and returns the resolved
    /// download URL.
    async fn convert(&mut self, track: &MatchedTrack) -> Result<String, ConversionError>;

    /// Releases the underlying page. Called on success and failure alike.
    async fn close(self);
}
