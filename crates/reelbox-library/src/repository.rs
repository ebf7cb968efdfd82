use reelbox_core::error::ReelboxError;
use reelbox_core::models::collection::{name_key, Collection, CollectionId};
use reelbox_core::models::movie::Movie;
use reelbox_core::notify::{NotificationSink, TracingSink};
use reelbox_store::CollectionStore;

use crate::query;

/// What `add_to_collection` did with the movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The movie was not in any collection before.
    Added,
    /// The movie was taken out of another collection first.
    Moved { from: CollectionId, from_name: String },
    /// The movie was already in the target collection. Copies held by other
    /// collections are still removed.
    AlreadyPresent,
}

/// Owner of the collection list.
///
/// Every mutation is applied to a staged copy, written to the store, and only
/// then swapped in. A failed validation or a failed write leaves both the
/// in-memory list and the stored blob as they were.
///
/// Invariants after each successful call:
/// - names are non-empty and unique under [`name_key`];
/// - a movie id appears in at most one collection (except through
///   `create_collection` with initial movies, see its docs);
/// - a movie id appears at most once per collection;
/// - the stored blob is the serialization of the in-memory list.
pub struct Repository {
    collections: Vec<Collection>,
    store: CollectionStore,
    sink: Box<dyn NotificationSink>,
}

impl Repository {
    /// Load the collection list from `store`. Unreadable data yields an empty list.
    pub fn open(store: CollectionStore) -> Self {
        let collections = store.load();
        tracing::info!(count = collections.len(), key = store.key(), "opened collection repository");
        Self {
            collections,
            store,
            sink: Box::new(TracingSink),
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn NotificationSink>) -> Self {
        self.sink = sink;
        self
    }

    // ── Mutations ──

    /// Create a collection named `name` holding `initial_movies`.
    ///
    /// The name is trimmed before it is stored and compared. Initial movies
    /// are NOT removed from other collections; use
    /// [`Repository::move_to_new_collection`] to relocate a movie.
    pub fn create_collection(
        &mut self,
        name: &str,
        initial_movies: Vec<Movie>,
    ) -> Result<Collection, ReelboxError> {
        if let Err(e) = self.check_name(name) {
            return Err(self.fail(e));
        }

        let mut movies: Vec<Movie> = Vec::with_capacity(initial_movies.len());
        for movie in initial_movies {
            if !movies.iter().any(|m| m.imdb_id == movie.imdb_id) {
                movies.push(movie);
            }
        }

        let collection = Collection::new(name, movies);
        let mut staged = self.collections.clone();
        staged.push(collection.clone());
        self.commit(staged)?;

        tracing::info!(id = %collection.id, name = %collection.name, "created collection");
        self.sink
            .notify_success(&format!("Created new collection \"{}\"", collection.name));
        Ok(collection)
    }

    /// Put `movie` into the collection `collection_id`, taking it out of any
    /// other collection in the same write.
    pub fn add_to_collection(
        &mut self,
        collection_id: &CollectionId,
        movie: Movie,
    ) -> Result<AddOutcome, ReelboxError> {
        let target_name = match self.find_collection(collection_id) {
            Some(c) => c.name.clone(),
            None => {
                return Err(self.fail(ReelboxError::CollectionNotFound {
                    id: collection_id.to_string(),
                }))
            }
        };

        let mut staged = self.collections.clone();
        let mut moved_from = None;
        for collection in staged.iter_mut().filter(|c| &c.id != collection_id) {
            let before = collection.movies.len();
            collection.movies.retain(|m| m.imdb_id != movie.imdb_id);
            if collection.movies.len() != before && moved_from.is_none() {
                moved_from = Some((collection.id.clone(), collection.name.clone()));
            }
        }

        let title = movie.display_title().to_string();
        let movie_id = movie.imdb_id.clone();
        let mut already_present = false;
        if let Some(target) = staged.iter_mut().find(|c| &c.id == collection_id) {
            if target.contains(&movie.imdb_id) {
                already_present = true;
            } else {
                target.movies.push(movie);
            }
        }

        self.commit(staged)?;

        if let Some((_, from_name)) = &moved_from {
            self.sink
                .notify_success(&format!("Moved \"{title}\" from \"{from_name}\""));
        }
        if already_present {
            tracing::debug!(collection = %collection_id, movie = %movie_id, "movie already in collection");
            return Ok(AddOutcome::AlreadyPresent);
        }

        tracing::info!(collection = %collection_id, movie = %movie_id, "added movie");
        self.sink
            .notify_success(&format!("Added \"{title}\" to \"{target_name}\""));
        let outcome = match moved_from {
            Some((from, from_name)) => AddOutcome::Moved { from, from_name },
            None => AddOutcome::Added,
        };
        Ok(outcome)
    }

    /// Remove `movie_id` from `collection_id`. Returns the removed record, or
    /// `None` when the movie was not in that collection.
    pub fn remove_from_collection(
        &mut self,
        collection_id: &CollectionId,
        movie_id: &str,
    ) -> Result<Option<Movie>, ReelboxError> {
        let Some(index) = self.collections.iter().position(|c| &c.id == collection_id) else {
            return Err(self.fail(ReelboxError::CollectionNotFound {
                id: collection_id.to_string(),
            }));
        };

        let mut staged = self.collections.clone();
        let collection = &mut staged[index];
        let Some(pos) = collection.movies.iter().position(|m| m.imdb_id == movie_id) else {
            self.commit(staged)?;
            return Ok(None);
        };
        let removed = collection.movies.remove(pos);
        let name = collection.name.clone();
        self.commit(staged)?;

        tracing::info!(collection = %collection_id, movie = movie_id, "removed movie");
        self.sink.notify_success(&format!(
            "Removed \"{}\" from \"{name}\"",
            removed.display_title()
        ));
        Ok(Some(removed))
    }

    /// Delete a collection. Its movies become collection-less. Deleting an
    /// unknown id succeeds and returns `None`.
    pub fn delete_collection(
        &mut self,
        collection_id: &CollectionId,
    ) -> Result<Option<Collection>, ReelboxError> {
        let Some(index) = self.collections.iter().position(|c| &c.id == collection_id) else {
            self.commit(self.collections.clone())?;
            return Ok(None);
        };

        let mut staged = self.collections.clone();
        let removed = staged.remove(index);
        self.commit(staged)?;

        tracing::info!(id = %removed.id, name = %removed.name, "deleted collection");
        self.sink
            .notify_success(&format!("Deleted collection \"{}\"", removed.name));
        Ok(Some(removed))
    }

    /// Create a collection named `name` holding only `movie`, removing the
    /// movie from wherever it was, as one write.
    pub fn move_to_new_collection(
        &mut self,
        movie: Movie,
        name: &str,
    ) -> Result<Collection, ReelboxError> {
        if let Err(e) = self.check_name(name) {
            return Err(self.fail(e));
        }

        let mut staged = self.collections.clone();
        let mut moved_from = None;
        for collection in staged.iter_mut() {
            let before = collection.movies.len();
            collection.movies.retain(|m| m.imdb_id != movie.imdb_id);
            if collection.movies.len() != before && moved_from.is_none() {
                moved_from = Some(collection.name.clone());
            }
        }

        let title = movie.display_title().to_string();
        let collection = Collection::new(name, vec![movie]);
        staged.push(collection.clone());
        self.commit(staged)?;

        tracing::info!(id = %collection.id, name = %collection.name, "moved movie to new collection");
        if let Some(from_name) = moved_from {
            self.sink
                .notify_success(&format!("Moved \"{title}\" from \"{from_name}\""));
        }
        self.sink
            .notify_success(&format!("Added \"{title}\" to \"{}\"", collection.name));
        Ok(collection)
    }

    // ── Queries ──

    pub fn list_collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn find_collection_containing(&self, movie_id: &str) -> Option<&Collection> {
        query::find_collection_containing(&self.collections, movie_id)
    }

    pub fn is_in_any_collection(&self, movie_id: &str) -> bool {
        query::is_in_any_collection(&self.collections, movie_id)
    }

    pub fn find_collection(&self, id: &CollectionId) -> Option<&Collection> {
        query::find_collection(&self.collections, id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Collection> {
        query::find_by_name(&self.collections, name)
    }

    pub fn total_movies(&self) -> usize {
        query::total_movies(&self.collections)
    }

    // ── Lifecycle ──

    /// True when the stored blob is exactly the serialized in-memory list. A
    /// store with nothing under the key matches an empty list.
    pub fn is_in_sync(&self) -> Result<bool, ReelboxError> {
        let expected = CollectionStore::serialize(&self.collections)?;
        Ok(match self.store.raw()? {
            Some(raw) => raw == expected,
            None => self.collections.is_empty(),
        })
    }

    /// Write the current list to the store.
    pub fn flush(&self) -> Result<(), ReelboxError> {
        self.store.save(&self.collections)
    }

    /// Release the repository, writing the list only if the store is stale.
    pub fn close(self) -> Result<(), ReelboxError> {
        if !self.is_in_sync()? {
            self.flush()?;
        }
        tracing::debug!(count = self.collections.len(), "closed collection repository");
        Ok(())
    }

    // ── Helpers ──

    fn check_name(&self, name: &str) -> Result<(), ReelboxError> {
        let key = name_key(name);
        if key.is_empty() {
            return Err(ReelboxError::EmptyName);
        }
        if self.collections.iter().any(|c| name_key(&c.name) == key) {
            return Err(ReelboxError::DuplicateName {
                name: name.trim().to_string(),
            });
        }
        Ok(())
    }

    /// Persist `staged` and, once the write succeeded, adopt it. The write is
    /// skipped only when nothing changed and the store already matches.
    fn commit(&mut self, staged: Vec<Collection>) -> Result<(), ReelboxError> {
        if staged == self.collections && self.is_in_sync().unwrap_or(false) {
            return Ok(());
        }
        if let Err(e) = self.store.save(&staged) {
            tracing::error!(error = %e, "failed to persist collections");
            return Err(self.fail(e));
        }
        self.collections = staged;
        Ok(())
    }

    fn fail(&self, err: ReelboxError) -> ReelboxError {
        self.sink.notify_failure(&err.to_string());
        err
    }
}
