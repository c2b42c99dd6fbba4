//! Local music library server.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tunedex::api::{AppState, create_router};
use tunedex::config::{DEFAULT_LIBRARY_DIR, DEFAULT_PORT, LibraryConfig};

/// Browse, annotate, retag and stream a local audio library.
#[derive(Parser)]
#[command(name = "tunedex")]
#[command(about = "A local music library manager with an HTTP API")]
struct Cli {
    /// Root directory of the audio library
    #[arg(short, long, env = "TUNEDEX_LIBRARY", default_value = DEFAULT_LIBRARY_DIR)]
    library: PathBuf,

    /// Directory for annotations.json and playlists.json
    #[arg(short, long, env = "TUNEDEX_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// ffmpeg binary used to retag non-MP3 files
    #[arg(long, env = "TUNEDEX_FFMPEG", default_value = "ffmpeg")]
    ffmpeg: PathBuf,

    /// Server port
    #[arg(short, long, env = "TUNEDEX_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server (default)
    Serve,

    /// List the library with metadata and annotations as JSON
    Scan {
        /// Directory relative to the library root
        #[arg(long)]
        dir: Option<String>,
    },

    /// Remove duplicate playlists and create missing album playlists
    Reconcile,

    /// Edit one field of a file's annotation
    Annotate {
        /// File path relative to the library root
        #[arg(long)]
        path: String,

        /// Field assignment as key=value; list fields take comma-separated items
        #[arg(long)]
        set: String,
    },

    /// Print all playlists
    Playlists,
}

impl Cli {
    fn config(&self) -> LibraryConfig {
        let config = LibraryConfig::new(&self.library).with_ffmpeg(&self.ffmpeg);
        match &self.data_dir {
            Some(data_dir) => config.with_data_dir(data_dir),
            None => config,
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Failed to serialize output: {}", e);
            std::process::exit(1);
        }
    }
}

fn annotate(state: &AppState, rel_path: &str, assignment: &str) -> Result<(), String> {
    let (key, value) = assignment
        .split_once('=')
        .ok_or_else(|| format!("Expected key=value, got '{}'", assignment))?;

    let mut document = state
        .library
        .annotation(rel_path)
        .map_err(|e| e.to_string())?
        .unwrap_or_default();
    document.apply_edit(key.trim(), value);
    state
        .library
        .set_annotation(rel_path, document)
        .map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tunedex=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = cli.config();
    let state = AppState::from_config(&config);

    match cli.command {
        Some(Commands::Scan { dir }) => match state.library.list_files(dir.as_deref()) {
            Ok(files) => print_json(&files),
            Err(e) => {
                eprintln!("Scan failed: {}", e);
                std::process::exit(1);
            }
        },
        Some(Commands::Reconcile) => {
            let result = state
                .library
                .list_files(None)
                .map_err(|e| e.to_string())
                .and_then(|files| {
                    state
                        .playlists
                        .reconcile_album_playlists(&files)
                        .map_err(|e| e.to_string())
                });
            match result {
                Ok(result) => {
                    println!("Reconciliation complete:");
                    println!("  Duplicates removed: {}", result.removed.len());
                    println!("  Playlists created:  {}", result.created.len());
                    for playlist in &result.created {
                        println!("    [{}] {}", playlist.id, playlist.name);
                    }
                }
                Err(e) => {
                    eprintln!("Reconciliation failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Annotate { path, set }) => {
            if let Err(e) = annotate(&state, &path, &set) {
                eprintln!("Failed to update annotation: {}", e);
                std::process::exit(1);
            }
            println!("Updated annotation for '{}'", path);
        }
        Some(Commands::Playlists) => match state.playlists.list() {
            Ok(playlists) if playlists.is_empty() => println!("No playlists."),
            Ok(playlists) => {
                for playlist in playlists {
                    println!(
                        "  [{}] {} ({} tracks)",
                        playlist.id,
                        playlist.name,
                        playlist.tracks.len()
                    );
                }
            }
            Err(e) => {
                eprintln!("Failed to load playlists: {}", e);
                std::process::exit(1);
            }
        },
        Some(Commands::Serve) | None => run_server(state, &config, cli.port).await,
    }
}

async fn run_server(state: AppState, config: &LibraryConfig, port: u16) {
    if !config.library_root.is_dir() {
        tracing::warn!(
            "Library root {} does not exist, listings will be empty",
            config.library_root.display()
        );
    }
    tracing::info!("Serving library {}", config.library_root.display());
    tracing::info!("Data directory {}", config.data_dir.display());

    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            tracing::error!("Is another process already using port {}?", port);
            std::process::exit(1);
        }
    };
    tracing::info!(
        "tunedex listening on {}",
        listener
            .local_addr()
            .expect("listener should have local addr")
    );

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
