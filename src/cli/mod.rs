//! # CLI Module
//!
//! This module provides the command-line interface layer for spodl. It
//! implements the user-facing commands and coordinates between playlist
//! resolution, track matching, the conversion orchestrator and the final
//! report.
//!
//! ## Commands
//!
//! - [`download`] - Resolves a playlist, matches every track against
//!   YouTube, converts the matches through the conversion site and streams
//!   the audio files to disk
//! - [`tracks`] - Resolves a playlist and lists its tracks without
//!   downloading anything, useful to sanity-check a reference first
//!
//! ## Data Flow (download)
//!
//! ```text
//! Playlist URL
//!     ↓ spotify::playlist (token cache, cursor pagination)
//! Ordered track list (+ skipped-item count)
//!     ↓ youtube::find_match (one call per track, 5 s bound)
//! Matched tracks          unmatched tracks recorded immediately
//!     ↓ converter::orchestrator (batches of N, retries, own sessions)
//! Acquisition results, reassembled in playlist order
//!     ↓
//! Per-track summary table + counters
//! ```
//!
//! ## Error Handling Philosophy
//!
//! Fatal trouble (missing credentials, bad playlist reference, a malformed
//! catalog page) aborts the run immediately since nothing downstream could
//! produce meaningful output. Everything else is scoped to a single track
//! and recorded in its outcome; the run always finishes and reports the
//! complete per-track list rather than stopping at the first failure.

mod download;
mod tracks;

pub use download::download;
pub use tracks::tracks;
