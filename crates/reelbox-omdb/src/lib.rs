pub mod mock;
pub mod omdb;

use async_trait::async_trait;
use reelbox_core::config::ReelboxConfig;
use reelbox_core::error::ReelboxError;
use reelbox_core::models::movie::{MediaType, Movie};

/// Optional narrowing of a title search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub media_type: Option<MediaType>,
    pub year: Option<u16>,
    /// 1-based result page; the source returns ten results per page.
    pub page: Option<u32>,
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub movies: Vec<Movie>,
    /// Total number of matches across all pages.
    pub total_results: u32,
}

impl SearchPage {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

/// Trait for a source of movie metadata.
#[async_trait]
pub trait MetadataClient: Send + Sync {
    /// Search titles matching `query`.
    async fn search_by_title(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<SearchPage, ReelboxError>;

    /// Fetch the full record for an imdb id. `None` when the id is unknown.
    async fn fetch_by_id(&self, id: &str) -> Result<Option<Movie>, ReelboxError>;
}

/// Create the OMDb client described by `config`.
pub fn create_client(
    config: &ReelboxConfig,
    api_key: &str,
) -> Result<Box<dyn MetadataClient>, ReelboxError> {
    Ok(Box::new(omdb::OmdbClient::new(
        config.omdb_url.clone(),
        api_key.to_string(),
        config.plot,
    )?))
}
