//! Spotify Playlist Downloader Library
//!
//! This library implements the track-acquisition pipeline behind the spodl
//! CLI: it authenticates against the Spotify Web API with client credentials,
//! resolves a playlist URL into an ordered track list, matches each track to
//! a YouTube search result, and drives a web-based conversion site through a
//! WebDriver session to download one audio file per track.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `converter` - Browser-driven conversion sessions and batch scheduling
//! - `downloader` - Streaming audio downloads to disk
//! - `management` - Token caching and diagnostic snapshots
//! - `spotify` - Spotify Web API client (auth, playlist resolution)
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//! - `youtube` - YouTube Data API search client
//!
//! # Example
//!
//! ```
//! use spodl::{cli, config};
//!
//! #[tokio::main]
//! async fn main() {
//!     config::load_env().await;
//!     // Use CLI functions...
//! }
//! ```

pub mod cli;
pub mod config;
pub mod converter;
pub mod downloader;
pub mod management;
pub mod spotify;
pub mod types;
pub mod utils;
pub mod youtube;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern throughout the application
/// using a boxed dynamic error trait object. This allows for flexible
/// error handling while maintaining Send + Sync bounds for async contexts.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Resolving playlist...");
/// info!("Found {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Saved {} tracks", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// # Behavior
///
/// This macro will cause the program to exit immediately after printing
/// the error message. It should only be used for fatal errors where
/// recovery is not possible.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues or important information that users should
/// notice, without terminating the program.
///
/// # Example
///
/// ```
/// warning!("No match found for {}", title);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
