use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::movie::Movie;

/// Unique identifier for a collection.
///
/// New ids are UUIDv7 strings. Older stores wrote millisecond timestamps as
/// JSON numbers; those are read back as their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CollectionId(pub String);

impl CollectionId {
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CollectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CollectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CollectionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl<'de> Deserialize<'de> for CollectionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Int(i64),
            Float(f64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => CollectionId(s),
            RawId::Int(n) => CollectionId(n.to_string()),
            RawId::Float(n) => CollectionId(n.to_string()),
        })
    }
}

/// A user-defined, named grouping of movies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    #[serde(default)]
    pub movies: Vec<Movie>,
    #[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Collection {
    /// Build a collection with a fresh id. `name` is stored trimmed.
    pub fn new(name: &str, movies: Vec<Movie>) -> Self {
        Self {
            id: CollectionId::new(),
            name: name.trim().to_string(),
            movies,
            created_at: Some(Utc::now()),
        }
    }

    pub fn contains(&self, movie_id: &str) -> bool {
        self.movies.iter().any(|m| m.imdb_id == movie_id)
    }

    pub fn get(&self, movie_id: &str) -> Option<&Movie> {
        self.movies.iter().find(|m| m.imdb_id == movie_id)
    }

    /// True when `other` names this collection under the trim + lower-case policy.
    pub fn has_name(&self, other: &str) -> bool {
        name_key(&self.name) == name_key(other)
    }

    /// Message used when sharing a collection.
    pub fn share_text(&self) -> String {
        format!(
            "Check out my movie collection \"{}\" with {} movies!",
            self.name,
            self.movies.len()
        )
    }
}

/// Comparison key for collection names: surrounding whitespace is ignored and
/// case is folded. Inner whitespace is significant.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}
