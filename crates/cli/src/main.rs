use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tuneful_core::{config::config_from_env_values, CoreConfig, DatabaseLocation, MediaLibrary};

#[derive(Parser)]
#[command(name = "tuneful")]
#[command(about = "Tuneful song library CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Create the database schema and upload directory
    Init,
    /// List all songs
    ListSongs,
    /// List all uploaded files
    ListFiles,
    /// Upload a local file into the library
    AddFile {
        /// Path of the file to upload
        path: PathBuf,
        /// Store under this name instead of the file's own name
        #[arg(long)]
        name: Option<String>,
    },
    /// Add a song playing an existing file
    AddSong {
        /// File id
        file_id: i64,
    },
    /// Point a song at a different file
    UpdateSong {
        /// Song id
        id: i64,
        /// File id
        file_id: i64,
    },
    /// Delete a song (its file is kept)
    DeleteSong {
        /// Song id
        id: i64,
    },
}

impl Commands {
    fn writes(&self) -> bool {
        matches!(
            self,
            Commands::AddFile { .. }
                | Commands::AddSong { .. }
                | Commands::UpdateSong { .. }
                | Commands::DeleteSong { .. }
        )
    }
}

/// Whether library changes made under `cfg` disappear with the process.
fn is_ephemeral(cfg: &CoreConfig) -> bool {
    matches!(cfg.database(), DatabaseLocation::InMemory)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tuneful=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'tuneful --help' for commands");
        return Ok(());
    };

    let cfg = config_from_env_values(
        std::env::var("TUNEFUL_CONFIG").ok(),
        std::env::var("TUNEFUL_DATABASE_PATH").ok(),
        std::env::var("TUNEFUL_UPLOAD_DIR").ok(),
        std::env::var("TUNEFUL_MAX_UPLOAD_BYTES").ok(),
    )?;
    if is_ephemeral(&cfg) && command.writes() {
        eprintln!(
            "Warning: no TUNEFUL_DATABASE_PATH set for the testing configuration; \
             changes are kept in memory and lost when this command exits"
        );
    }
    let library = MediaLibrary::open(&cfg)?;

    match command {
        Commands::Init => {
            println!(
                "Library ready (uploads in {})",
                library.uploads().upload_dir().display()
            );
        }
        Commands::ListSongs => {
            let songs = library.list_songs()?;
            if songs.is_empty() {
                println!("No songs found.");
            } else {
                for song in songs {
                    println!(
                        "ID: {}, File: {} ({}), Path: {}",
                        song.id,
                        song.file.name,
                        song.file.id,
                        song.file.path()
                    );
                }
            }
        }
        Commands::ListFiles => {
            let files = library.list_files()?;
            if files.is_empty() {
                println!("No files found.");
            } else {
                for file in files {
                    println!("ID: {}, Name: {}, Path: {}", file.id, file.name, file.path());
                }
            }
        }
        Commands::AddFile { path, name } => {
            let bytes = std::fs::read(&path)?;
            let name = match name {
                Some(name) => name,
                None => path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(str::to_owned)
                    .ok_or("path has no usable file name")?,
            };
            match library.upload_file(&name, &bytes) {
                Ok(file) => println!("Added file {} with ID: {}", file.name, file.id),
                Err(e) => eprintln!("Error adding file: {}", e),
            }
        }
        Commands::AddSong { file_id } => match library.create_song(file_id) {
            Ok(song) => println!("Added song with ID: {} ({})", song.id, song.file.name),
            Err(e) => eprintln!("Error adding song: {}", e),
        },
        Commands::UpdateSong { id, file_id } => match library.update_song(id, file_id) {
            Ok(song) => println!("Song {} now plays {}", song.id, song.file.name),
            Err(e) => eprintln!("Error updating song: {}", e),
        },
        Commands::DeleteSong { id } => match library.delete_song(id) {
            Ok(()) => println!("Deleted song with ID: {}", id),
            Err(e) => eprintln!("Error deleting song: {}", e),
        },
    }

    Ok(())
}
