pub mod debounce;

use reelbox_core::error::ReelboxError;
use reelbox_omdb::{MetadataClient, SearchFilters, SearchPage};

pub use debounce::Debouncer;

/// A title search as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub filters: SearchFilters,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            filters: SearchFilters::default(),
        }
    }

    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Whether the query is long enough to send. Surrounding whitespace does
    /// not count toward `min_len`, and length is measured in characters.
    pub fn is_searchable(&self, min_len: usize) -> bool {
        self.text.trim().chars().count() >= min_len
    }
}

/// Run `query` against `client`. Queries shorter than `min_len` characters
/// return an empty page without contacting the client.
pub async fn run_search(
    client: &dyn MetadataClient,
    query: &SearchQuery,
    min_len: usize,
) -> Result<SearchPage, ReelboxError> {
    if !query.is_searchable(min_len) {
        tracing::debug!(query = %query.text, min_len, "query too short, skipping search");
        return Ok(SearchPage::empty());
    }

    let page = client
        .search_by_title(query.text.trim(), &query.filters)
        .await?;
    tracing::debug!(
        query = %query.text,
        returned = page.movies.len(),
        total = page.total_results,
        "search complete"
    );
    Ok(page)
}
