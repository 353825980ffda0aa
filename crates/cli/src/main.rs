use anyhow::Result;
use clap::{Parser, Subcommand};
use search_cache_core::{resolve_database_url, DEFAULT_CONFIG_PATH};
use search_cache_storage::PgStore;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "search-cache")]
#[command(about = "Store and inspect cached search results in PostgreSQL", long_about = None)]
struct Cli {
    /// TOML file with a [database] table. Ignored when DATABASE_URL is set.
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the schema if it does not exist
    Migrate,
    /// Insert a user record
    AddUser {
        #[arg(long)]
        user_id: Option<String>,
    },
    /// Insert a search record
    AddSearch {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        term: String,
        #[arg(long)]
        result: String,
    },
    /// List every search record
    Searches,
    /// List every user record
    Users,
    /// Show the newest stored result for a term inside the cache window
    Lookup {
        term: String,
        #[arg(long)]
        window_secs: Option<i64>,
    },
    /// Insert a sample user and search, then list both tables
    Demo,
}

async fn connect(config: &Path) -> Result<PgStore> {
    let url = resolve_database_url(config)?;
    Ok(PgStore::connect(&url).await?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = connect(&cli.config).await?;

    let outcome = match cli.command {
        Commands::Migrate => {
            tracing::info!("schema is up to date");
            Ok(())
        },
        Commands::AddUser { user_id } => commands::records::add_user(&store, user_id).await,
        Commands::AddSearch { user_id, term, result } => {
            commands::records::add_search(&store, &user_id, &term, &result).await
        },
        Commands::Searches => commands::records::list_searches(&store).await,
        Commands::Users => commands::records::list_users(&store).await,
        Commands::Lookup { term, window_secs } => {
            commands::lookup::run(&store, &term, window_secs).await
        },
        Commands::Demo => commands::demo::run(store.clone()).await,
    };

    store.close().await;
    outcome
}
