//! In-memory metadata client for testing.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use reelbox_core::error::ReelboxError;
use reelbox_core::models::movie::Movie;

use crate::{MetadataClient, SearchFilters, SearchPage};

/// Serves a fixed catalog. Title search is a case-insensitive substring match.
#[derive(Debug, Default)]
pub struct MockClient {
    catalog: Vec<Movie>,
    searches: AtomicUsize,
}

impl MockClient {
    pub fn new(catalog: Vec<Movie>) -> Self {
        Self {
            catalog,
            searches: AtomicUsize::new(0),
        }
    }

    /// Number of `search_by_title` calls served so far.
    pub fn search_count(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataClient for MockClient {
    async fn search_by_title(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<SearchPage, ReelboxError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        let needle = query.to_lowercase();
        let movies: Vec<Movie> = self
            .catalog
            .iter()
            .filter(|m| m.display_title().to_lowercase().contains(&needle))
            .filter(|m| filters.media_type.is_none() || m.kind() == filters.media_type)
            .filter(|m| match filters.year {
                Some(y) => m.year.as_deref().is_some_and(|year| year.starts_with(&y.to_string())),
                None => true,
            })
            .cloned()
            .collect();
        Ok(SearchPage {
            total_results: movies.len() as u32,
            movies,
        })
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<Movie>, ReelboxError> {
        Ok(self.catalog.iter().find(|m| m.imdb_id == id).cloned())
    }
}
