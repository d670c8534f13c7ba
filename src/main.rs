//! # askbase CLI
//!
//! The `askbase` binary administers the knowledge corpus and runs queries
//! against it.
//!
//! ## Usage
//!
//! ```bash
//! askbase --config ./config/askbase.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `askbase init` | Create the SQLite database and run schema migrations |
//! | `askbase upload <file>` | Replace the corpus with a `.txt`/`.md`/`.docx` file |
//! | `askbase list` | List stored documents with a content preview |
//! | `askbase get <id>` | Print one document in full |
//! | `askbase update <id> <file>` | Replace one document's content in place |
//! | `askbase delete <id>` / `--all` | Remove a document or the whole corpus |
//! | `askbase ask "<query>"` | Run a query through the retrieval pipeline |

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use askbase::answer::{AnswerGenerator, Backend};
use askbase::config;
use askbase::db;
use askbase::ingest;
use askbase::migrate;
use askbase::pipeline::{ModelSet, QueryPipeline};
use askbase::rank::Strategy;
use askbase::store::sqlite::SqliteStore;
use askbase::store::KnowledgeStore;

/// askbase: retrieval-augmented question answering over a single
/// knowledge corpus.
#[derive(Parser)]
#[command(
    name = "askbase",
    about = "Retrieval-augmented question answering over a single knowledge corpus",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/askbase.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the documents table. Running
    /// it multiple times is safe.
    Init,

    /// Upload a knowledge-base file, replacing the entire corpus.
    ///
    /// Accepts plain text (`.txt`, `.md`, `.text`) and DOCX. The previous
    /// corpus is removed in the same transaction that inserts the new one.
    Upload {
        /// Path to the file to upload.
        file: PathBuf,
    },

    /// List stored documents with a content preview.
    List,

    /// Print one document in full.
    Get {
        /// Document id.
        id: String,
    },

    /// Replace one document's content in place, keeping its id.
    Update {
        /// Document id.
        id: String,
        /// Path to the replacement file.
        file: PathBuf,
    },

    /// Delete a document by id, or the whole corpus with --all.
    Delete {
        /// Document id.
        id: Option<String>,

        /// Delete every document.
        #[arg(long)]
        all: bool,
    },

    /// Run a query through the retrieval-and-answering pipeline.
    Ask {
        /// The query text.
        query: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    let pool = db::connect(&cfg).await?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&pool).await?;
            println!("Database initialized successfully.");
        }
        Commands::Upload { file } => {
            migrate::run_migrations(&pool).await?;
            let store = Arc::new(SqliteStore::new(pool.clone()));
            ingest::run_upload(store, &file).await?;
        }
        Commands::List => {
            let store = Arc::new(SqliteStore::new(pool.clone()));
            ingest::run_list(store).await?;
        }
        Commands::Get { id } => {
            let store = Arc::new(SqliteStore::new(pool.clone()));
            ingest::run_get(store, &id).await?;
        }
        Commands::Update { id, file } => {
            let store = Arc::new(SqliteStore::new(pool.clone()));
            ingest::run_update(store, &id, &file).await?;
        }
        Commands::Delete { id, all } => {
            let store = Arc::new(SqliteStore::new(pool.clone()));
            ingest::run_delete(store, id.as_deref(), all).await?;
        }
        Commands::Ask { query } => {
            let store: Arc<dyn KnowledgeStore> = Arc::new(SqliteStore::new(pool.clone()));
            let strategy: Strategy = cfg.retrieval.strategy.parse()?;
            let backend: Backend = cfg.answer.backend.parse()?;

            let models = ModelSet::initialize(&cfg);
            let answerer =
                AnswerGenerator::new(backend, models.qa, models.completion, &cfg.answer);
            let pipeline = QueryPipeline::new(store, strategy, models.embedder, answerer, &cfg);

            let outcome = pipeline.handle_query(&query).await;
            println!("{}", outcome.message);
        }
    }

    pool.close().await;
    Ok(())
}
