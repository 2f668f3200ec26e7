//! # ugapi CLI
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ugapi serve` | Start the HTTP server |
//! | `ugapi search "<query>"` | Search tabs by title and print JSON |
//! | `ugapi tab <url>` | Fetch one tab and print JSON |
//!
//! ## Examples
//!
//! ```bash
//! ugapi serve --config ./config/ugapi.toml
//! ugapi search "wonderwall" --artist Oasis --type Chords
//! RUST_LOG=ugapi=debug ugapi tab https://tabs.ultimate-guitar.com/tab/oasis/wonderwall-chords-27596
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ugapi::{config, search, server, tab};

/// ugapi — search and fetch guitar tabs as JSON.
#[derive(Parser)]
#[command(
    name = "ugapi",
    about = "ugapi — search and fetch Ultimate Guitar tabs as normalized JSON",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Optional; every setting has a default.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    ///
    /// Serves `POST /search`, `POST /tab` and `GET /health` on `[server].bind`.
    Serve,

    /// Search tabs by title.
    Search {
        /// Title text sent upstream.
        query: String,

        /// Keep only results by this exact artist name.
        #[arg(long)]
        artist: Option<String>,

        /// Keep only results of this exact type (e.g. `Chords`, `Tab`).
        #[arg(long = "type")]
        kind: Option<String>,
    },

    /// Fetch a single tab by URL.
    Tab {
        /// Absolute tab page URL.
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ugapi=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::Config::default(),
    };

    match cli.command {
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Search {
            query,
            artist,
            kind,
        } => {
            search::run_search(&cfg, query, artist, kind).await?;
        }
        Commands::Tab { url } => {
            tab::run_tab(&cfg, url).await?;
        }
    }

    Ok(())
}
