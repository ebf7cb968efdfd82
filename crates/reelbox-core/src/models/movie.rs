use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// OMDb placeholder for fields it has no value for.
pub const NOT_AVAILABLE: &str = "N/A";

/// The kind of title a metadata record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Movie,
    Series,
    Episode,
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Movie => write!(f, "movie"),
            MediaType::Series => write!(f, "series"),
            MediaType::Episode => write!(f, "episode"),
        }
    }
}

impl std::str::FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movie" | "movies" => Ok(MediaType::Movie),
            "series" => Ok(MediaType::Series),
            "episode" | "episodes" => Ok(MediaType::Episode),
            _ => Err(format!("unknown media type: {s}")),
        }
    }
}

/// A single third-party rating attached to a detail record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Value")]
    pub value: String,
}

/// A movie record as supplied by the metadata source.
///
/// Only `imdbID` is required. The named fields are the ones the front end
/// displays; everything else the source sends lands in a passthrough map and
/// is written back out untouched. The passthrough map never holds a name that
/// belongs to a named field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,

    #[serde(rename = "Title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "Year", default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,

    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    #[serde(rename = "Poster", default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,

    #[serde(rename = "Plot", default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,

    #[serde(rename = "Genre", default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,

    #[serde(rename = "Director", default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,

    #[serde(rename = "Actors", default, skip_serializing_if = "Option::is_none")]
    pub actors: Option<String>,

    #[serde(rename = "Runtime", default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,

    #[serde(rename = "imdbRating", default, skip_serializing_if = "Option::is_none")]
    pub imdb_rating: Option<String>,

    #[serde(rename = "Ratings", default, skip_serializing_if = "Option::is_none")]
    pub ratings: Option<Vec<Rating>>,

    #[serde(flatten)]
    extra: BTreeMap<String, serde_json::Value>,
}

impl Movie {
    pub fn new(imdb_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            imdb_id: imdb_id.into(),
            title: Some(title.into()),
            year: None,
            media_type: None,
            poster: None,
            plot: None,
            genre: None,
            director: None,
            actors: None,
            runtime: None,
            imdb_rating: None,
            ratings: None,
            extra: BTreeMap::new(),
        }
    }

    /// Title for display, falling back to the imdb id.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.imdb_id)
    }

    /// Poster URL, or `None` when the source has no poster.
    pub fn poster_url(&self) -> Option<&str> {
        present(self.poster.as_deref())
    }

    pub fn kind(&self) -> Option<MediaType> {
        self.media_type.as_deref().and_then(|t| t.parse().ok())
    }

    /// Look up a passthrough field by its source name.
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.extra.get(name)
    }

    /// Set a field by its source name. Names of named fields (`Title`,
    /// `imdbID`, ...) update that field; any other name is kept as
    /// passthrough. On error the record is left as it was.
    pub fn insert_field(
        &mut self,
        name: impl Into<String>,
        value: serde_json::Value,
    ) -> Result<(), serde_json::Error> {
        let mut record = serde_json::to_value(&*self)?;
        if let Some(map) = record.as_object_mut() {
            map.insert(name.into(), value);
        }
        *self = serde_json::from_value(record)?;
        Ok(())
    }
}

/// Filters out empty strings and the `N/A` sentinel.
pub fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != NOT_AVAILABLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_passthrough_fields() {
        let json = r#"{
            "Title": "Inception",
            "Year": "2010",
            "imdbID": "tt1375666",
            "Type": "movie",
            "Poster": "N/A",
            "Metascore": "74",
            "Ratings": [{"Source": "Internet Movie Database", "Value": "8.8/10"}],
            "BoxOffice": "$292,587,330"
        }"#;
        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.imdb_id, "tt1375666");
        assert_eq!(movie.display_title(), "Inception");
        assert_eq!(movie.kind(), Some(MediaType::Movie));
        assert_eq!(movie.poster_url(), None);
        assert_eq!(movie.ratings.as_ref().map(Vec::len), Some(1));
        assert_eq!(
            movie.field("Metascore"),
            Some(&serde_json::Value::String("74".into()))
        );

        let back: Movie = serde_json::from_str(&serde_json::to_string(&movie).unwrap()).unwrap();
        assert_eq!(back, movie);
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let result: Result<Movie, _> = serde_json::from_str(r#"{"Title": "No id"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_type_does_not_fail_parse() {
        let movie: Movie = serde_json::from_str(r#"{"imdbID": "tt1", "Type": "game"}"#).unwrap();
        assert_eq!(movie.kind(), None);
        assert_eq!(movie.display_title(), "tt1");
    }

    #[test]
    fn test_insert_field_routes_named_fields() {
        let mut movie = Movie::new("tt1", "X");
        movie.insert_field("Title", serde_json::json!("Y")).unwrap();
        movie.insert_field("Director", serde_json::json!("Ridley Scott")).unwrap();
        movie.insert_field("Awards", serde_json::json!("4 wins")).unwrap();

        assert_eq!(movie.display_title(), "Y");
        assert_eq!(movie.director.as_deref(), Some("Ridley Scott"));
        assert_eq!(movie.field("Title"), None);
        assert_eq!(movie.field("Awards"), Some(&serde_json::json!("4 wins")));

        let text = serde_json::to_string(&movie).unwrap();
        assert_eq!(text.matches("\"Title\"").count(), 1);
        let back: Movie = serde_json::from_str(&text).unwrap();
        assert_eq!(back, movie);
    }

    #[test]
    fn test_insert_field_rejects_bad_named_value() {
        let mut movie = Movie::new("tt1", "X");
        assert!(movie.insert_field("imdbID", serde_json::json!(42)).is_err());
        assert_eq!(movie, Movie::new("tt1", "X"));
    }

    #[test]
    fn test_media_type_parse() {
        assert_eq!("Series".parse::<MediaType>().unwrap(), MediaType::Series);
        assert!("podcast".parse::<MediaType>().is_err());
    }
}
