use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use snote_api::{
    gallery::{self, AspectFilter, Photo, SearchPage},
    parse_target, share_url, DocumentStore, EditorState, FileStore, IdScheme, KvStore,
    MemoryStore, Notice, SharenoteError, StoreConfig,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod editor;
mod table;

const DEFAULT_BASE_URL: &str = "http://localhost:3000/";

/// Document store over whichever backend the flags selected
pub type Store = DocumentStore<Box<dyn KvStore>>;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Human-readable output (default)
    Text,
    /// Pretty JSON
    Json,
}

#[derive(Parser)]
#[command(name = "snote")]
#[command(about = "Share notes by link, backed by a local store", long_about = None)]
struct Cli {
    /// Store file (defaults to the user data directory)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Use a throwaway in-memory store
    #[arg(long, global = true, conflicts_with = "store")]
    memory: bool,

    /// Base URL that share links are built on
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Derive identifiers from the document contents instead of at random
    #[arg(long, global = true)]
    encoded_ids: bool,

    /// Append the creation time to random identifiers
    #[arg(long, global = true, conflicts_with = "encoded_ids")]
    timestamp_suffix: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Share a document and print its link
    Share {
        /// Document title
        #[arg(short, long)]
        title: String,
        /// Document body (HTML)
        #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
        content: Option<String>,
        /// Read the body from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Open a link (or #id, or bare id) the way the editor would
    Open {
        /// Link, fragment or identifier; omit to restore the draft
        location: Option<String>,
        /// Output format (text, json)
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },
    /// Show a shared document without counting a view
    Peek {
        /// Link, fragment or identifier
        location: String,
    },
    /// List shared documents, newest first
    List {
        /// Output format (text, json)
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },
    /// Draft slot operations
    Draft {
        #[command(subcommand)]
        command: DraftCommands,
    },
    /// Interactive editor with debounced autosave
    Edit,
    /// Photo gallery helpers
    Gallery {
        #[command(subcommand)]
        command: GalleryCommands,
    },
}

#[derive(Subcommand)]
enum DraftCommands {
    /// Overwrite the draft
    Save {
        /// Draft title
        #[arg(short, long, default_value = "")]
        title: String,
        /// Draft body (HTML)
        #[arg(short, long, default_value = "")]
        content: String,
    },
    /// Print the draft
    Show,
    /// Discard the draft
    Clear,
}

#[derive(Subcommand)]
enum GalleryCommands {
    /// Keep the horizontal photos of a saved API response
    Filter {
        /// JSON file: a photo list, or a search response with --search
        path: PathBuf,
        /// Input is a search response ({"total", "results"})
        #[arg(long)]
        search: bool,
        /// Page number the response was fetched for
        #[arg(long, default_value = "1")]
        page: u32,
        /// Smallest accepted width/height ratio
        #[arg(long, default_value_t = 1.3)]
        min_ratio: f64,
        /// Largest accepted width/height ratio
        #[arg(long, default_value_t = 2.5)]
        max_ratio: f64,
    },
}

fn main() -> Result<()> {
    // Default to warn so command output stays clean; override with RUST_LOG
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Share { ref title, ref content, ref file } => {
            let store = open_store(&cli)?;
            let content = match (content, file) {
                (Some(content), _) => content.clone(),
                (None, Some(path)) => std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, None) => String::new(),
            };

            let id = store.share(title, &content).context("Failed to share document")?;
            println!("{}", share_url(&cli.base_url, &id));
        }

        Commands::Open { ref location, output } => {
            let store = open_store(&cli)?;
            let opened = store.open(location.as_deref()).context("Failed to open document")?;

            if let Some(notice) = &opened.notice {
                eprintln!("{} {}", "Notice:".yellow().bold(), notice);
            }
            print_state(&opened.state, output)?;
        }

        Commands::Peek { ref location } => {
            let store = open_store(&cli)?;
            if let Some(notice) = peek_location(&store, location)? {
                eprintln!("{} {}", "Notice:".yellow().bold(), notice);
            }
        }

        Commands::List { output } => {
            let store = open_store(&cli)?;
            let documents = store.list().context("Failed to list documents")?;

            match output {
                OutputFormat::Text => {
                    println!("{}", table::format_documents_table(&documents));
                    println!();
                    println!("Count: {}", documents.len());
                }
                OutputFormat::Json => {
                    let json: Vec<_> = documents
                        .iter()
                        .map(|(id, record)| {
                            serde_json::json!({
                                "id": id,
                                "url": share_url(&cli.base_url, id),
                                "record": record,
                            })
                        })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&json)?);
                }
            }
        }

        Commands::Draft { ref command } => {
            let store = open_store(&cli)?;
            handle_draft_command(&store, command)?;
        }

        Commands::Edit => {
            let store = open_store(&cli)?;
            let mut session = editor::EditorSession::new(store, cli.base_url.clone())?;
            session.run()?;
        }

        Commands::Gallery { ref command } => {
            handle_gallery_command(command)?;
        }
    }

    Ok(())
}

/// Build the configuration implied by the global flags
fn store_config(cli: &Cli) -> StoreConfig {
    let scheme = if cli.encoded_ids {
        IdScheme::Encoded { length: 16 }
    } else {
        IdScheme::Random {
            length: 12,
            timestamp_suffix: cli.timestamp_suffix,
        }
    };
    StoreConfig::new().with_id_scheme(scheme)
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("sharenote").join("store.json"))
        .unwrap_or_else(|| PathBuf::from("sharenote-store.json"))
}

fn open_store(cli: &Cli) -> Result<Store> {
    let config = store_config(cli);

    let backend: Box<dyn KvStore> = if cli.memory {
        Box::new(MemoryStore::with_quota(config.max_total_bytes))
    } else {
        let path = cli.store.clone().unwrap_or_else(default_store_path);
        let store = FileStore::open_with_quota(&path, config.max_total_bytes)
            .with_context(|| format!("Failed to open store at {}", path.display()))?;
        Box::new(store)
    };

    DocumentStore::new(backend, config).context("Invalid store configuration")
}

fn print_state(state: &EditorState, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => {
            let json = match state {
                EditorState::Shared { id, record } => {
                    serde_json::json!({"state": "shared", "id": id, "record": record})
                }
                EditorState::Draft(draft) => serde_json::json!({"state": "draft", "draft": draft}),
                EditorState::Empty => serde_json::json!({"state": "empty"}),
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => match state {
            EditorState::Shared { id, record } => {
                println!("{} {}", "Shared document".green().bold(), id);
                println!("Title:  {}", record.title);
                println!("Shared: {}", table::format_timestamp(record.timestamp));
                println!("Views:  {}", record.views);
                println!();
                println!("{}", record.content);
            }
            EditorState::Draft(draft) => {
                println!("{}", "Draft".cyan().bold());
                println!("Title: {}", draft.title);
                println!("Saved: {}", table::format_timestamp(draft.timestamp));
                println!();
                println!("{}", draft.content);
            }
            EditorState::Empty => {
                println!("{}", "(empty editor)".dimmed());
            }
        },
    }
    Ok(())
}

/// Print the document `location` addresses without counting a view
///
/// Link and data problems come back as a notice; only storage failures are errors.
fn peek_location(store: &Store, location: &str) -> Result<Option<Notice>> {
    let id = match parse_target(location) {
        Ok(Some(id)) => id,
        Ok(None) => {
            return Ok(Some(Notice::InvalidLink(format!("no identifier in {:?}", location))));
        }
        Err(SharenoteError::InvalidIdentifier(reason)) => {
            return Ok(Some(Notice::InvalidLink(reason)));
        }
        Err(e) => return Err(e.into()),
    };

    match store.peek(&id) {
        Ok(Some(record)) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(None)
        }
        Ok(None) => Ok(Some(Notice::NotFound(id))),
        Err(SharenoteError::Malformed { key, .. }) => Ok(Some(Notice::Malformed(key))),
        Err(e) => Err(e).context("Failed to read document"),
    }
}

fn handle_draft_command(store: &Store, command: &DraftCommands) -> Result<()> {
    match command {
        DraftCommands::Save { title, content } => {
            store.save_draft(title, content).context("Failed to save draft")?;
            println!("{}", "✓ Draft saved".green());
        }
        DraftCommands::Show => match store.load_draft() {
            Ok(Some(draft)) => println!("{}", serde_json::to_string_pretty(&draft)?),
            Ok(None) => println!("No draft saved"),
            Err(e) if e.is_user_facing() => eprintln!("{} {}", "Notice:".yellow().bold(), e),
            Err(e) => return Err(e).context("Failed to read draft"),
        },
        DraftCommands::Clear => {
            if store.clear_draft().context("Failed to clear draft")? {
                println!("{}", "✓ Draft cleared".green());
            } else {
                println!("No draft saved");
            }
        }
    }
    Ok(())
}

fn handle_gallery_command(command: &GalleryCommands) -> Result<()> {
    match command {
        GalleryCommands::Filter {
            path,
            search,
            page,
            min_ratio,
            max_ratio,
        } => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let filter = AspectFilter::new(*min_ratio, *max_ratio);

            let (photos, has_more): (Vec<Photo>, bool) = if *search {
                let response: SearchPage =
                    serde_json::from_str(&text).context("Invalid search response")?;
                let more = gallery::has_more_search(*page, gallery::PER_PAGE, response.total);
                (response.results, more)
            } else {
                let photos: Vec<Photo> =
                    serde_json::from_str(&text).context("Invalid photo list")?;
                let more = gallery::has_more_popular(photos.len(), gallery::PER_PAGE);
                (photos, more)
            };

            let kept = filter.filter_page(photos);
            println!("{}", table::format_photos_table(&kept));
            println!();
            println!("Horizontal: {}", kept.len());
            if has_more {
                println!("(More results available - fetch page {})", page + 1);
            }
        }
    }
    Ok(())
}
