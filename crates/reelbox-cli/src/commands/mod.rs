pub mod collection;
pub mod config;
pub mod movie;
pub mod search;

use clap::Subcommand;
use reelbox_auth::KeyringStore;
use reelbox_core::config::ReelboxConfig;
use reelbox_core::error::ReelboxError;
use reelbox_core::models::movie::Movie;
use reelbox_library::Repository;
use reelbox_omdb::MetadataClient;
use reelbox_store::{CollectionStore, SqliteKvStore};

use crate::notify::ConsoleSink;

#[derive(Subcommand)]
pub enum Command {
    /// Initialize and manage Reelbox configuration
    Config {
        #[command(subcommand)]
        action: config::ConfigAction,
    },
    /// Search titles by name
    Search(search::SearchArgs),
    /// Show details of a title
    Movie(movie::MovieArgs),
    /// Manage collections
    Collection {
        #[command(subcommand)]
        action: collection::CollectionAction,
    },
}

/// A failure that has already been shown to the user.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct Reported(pub String);

impl From<ReelboxError> for Reported {
    fn from(e: ReelboxError) -> Self {
        Reported(e.to_string())
    }
}

pub async fn run(cmd: Command, api_key: Option<String>) -> anyhow::Result<()> {
    match cmd {
        Command::Config { action } => config::run(action),
        Command::Search(args) => search::run(args, api_key.as_deref()).await,
        Command::Movie(args) => movie::run(args, api_key.as_deref()).await,
        Command::Collection { action } => collection::run(action, api_key.as_deref()).await,
    }
}

/// Open the collection repository backed by the local database.
pub fn open_repository(config: &ReelboxConfig) -> anyhow::Result<Repository> {
    let db_path = ReelboxConfig::db_path()?;
    let kv = SqliteKvStore::open(&db_path)?;
    let store = CollectionStore::with_key(Box::new(kv), &config.storage_key);
    Ok(Repository::open(store).with_sink(Box::new(ConsoleSink)))
}

/// Build the metadata client, resolving the API key from the flag or keychain.
pub fn metadata_client(
    config: &ReelboxConfig,
    api_key: Option<&str>,
) -> anyhow::Result<Box<dyn MetadataClient>> {
    let key = reelbox_auth::resolve_api_key(&KeyringStore::new(), api_key)?;
    Ok(reelbox_omdb::create_client(config, &key)?)
}

/// The record for `imdb_id`: the copy already kept in a collection, otherwise
/// a fresh fetch from the metadata source.
pub async fn resolve_movie(
    repo: &Repository,
    config: &ReelboxConfig,
    api_key: Option<&str>,
    imdb_id: &str,
) -> anyhow::Result<Movie> {
    if let Some(movie) = repo
        .find_collection_containing(imdb_id)
        .and_then(|c| c.get(imdb_id))
    {
        return Ok(movie.clone());
    }

    let client = metadata_client(config, api_key)?;
    client
        .fetch_by_id(imdb_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Title '{}' not found", imdb_id))
}
