//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify Web API used by spodl:
//! application-level authentication and playlist resolution. It handles all
//! HTTP communication with Spotify, including the token exchange, pagination
//! and response validation.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (client credentials)
//!     └── Playlist Resolution (cursor pagination)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! ### Authentication Module
//!
//! [`auth`] - Implements the OAuth 2.0 client-credentials grant:
//! - **Token Exchange**: POSTs `grant_type=client_credentials` with a Basic
//!   authorization header built from the base64-encoded `id:secret` pair
//! - **Bounded Requests**: every exchange carries a 5 second timeout
//! - **No User Context**: the grant covers public playlist data only, so no
//!   browser round-trip or callback server is needed
//!
//! The credential cache sits above this module in
//! [`crate::management::TokenManager`]; `auth` only performs the network
//! exchange and never stores anything.
//!
//! ### Playlist Module
//!
//! [`playlist`] - Resolves a playlist URL into an ordered track list:
//! - **Identifier Extraction**: a well-formed URL parse plus an explicit
//!   path-segment search, returning a typed failure on bad references
//! - **Cursor Pagination**: follows the `next` field until it is null,
//!   accepting single-page playlists where `next` is null immediately
//! - **Response Validation**: a page without an array-valued `items` field
//!   aborts the resolve call; individual malformed items are skipped and
//!   counted instead
//!
//! ## Error Handling
//!
//! Authentication failures ([`auth::AuthError`]) and resolve failures
//! ([`playlist::ResolveError`]) are fatal to the run: nothing downstream can
//! produce meaningful results without the track list. Per-track trouble is
//! handled later in the pipeline and never surfaces from this module.
//!
//! ## API Coverage
//!
//! - `POST /api/token` - client-credentials token exchange
//! - `GET /playlists/{id}/tracks` - paginated playlist contents

pub mod auth;
pub mod playlist;
