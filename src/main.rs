use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spodl::{cli, config, converter::orchestrator, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Download all tracks of a playlist as audio files
    Download(DownloadOptions),

    /// Resolve a playlist and list its tracks
    Tracks(TracksOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct DownloadOptions {
    /// Playlist URL as copied from the Spotify client
    playlist_url: String,

    /// Number of concurrent conversion sessions per batch
    #[clap(long, default_value_t = orchestrator::DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Write a JSON snapshot of the resolved tracks next to the downloads
    #[clap(long)]
    snapshot: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct TracksOptions {
    /// Playlist URL as copied from the Spotify client
    playlist_url: String,

    /// Write a JSON snapshot of the resolved tracks next to the downloads
    #[clap(long)]
    snapshot: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Download(opt) => {
            cli::download(opt.playlist_url, opt.concurrency, opt.snapshot).await
        }
        Command::Tracks(opt) => cli::tracks(opt.playlist_url, opt.snapshot).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
