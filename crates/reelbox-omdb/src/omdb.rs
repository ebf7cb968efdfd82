use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Deserialize;

use reelbox_core::config::PlotLength;
use reelbox_core::error::ReelboxError;
use reelbox_core::models::movie::Movie;

use crate::{MetadataClient, SearchFilters, SearchPage};

const SERVICE: &str = "omdb";

/// Client for the OMDb HTTP API.
pub struct OmdbClient {
    client: reqwest::Client,
    base_url: url::Url,
    api_key: String,
    plot: PlotLength,
}

impl OmdbClient {
    pub fn new(base_url: url::Url, api_key: String, plot: PlotLength) -> Result<Self, ReelboxError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_static(concat!("reelbox/", env!("CARGO_PKG_VERSION"))),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .map_err(|e| ReelboxError::Other(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key,
            plot,
        })
    }

    async fn get(&self, params: &[(&str, String)]) -> Result<String, ReelboxError> {
        let mut query: Vec<(&str, String)> = vec![("apikey", self.api_key.clone())];
        query.extend(params.iter().cloned());

        tracing::debug!(url = %self.base_url, params = ?params, "omdb request");
        let resp = self
            .client
            .get(self.base_url.clone())
            .query(&query)
            .send()
            .await
            .map_err(|e| ReelboxError::Api {
                status: 0,
                message: e.to_string(),
            })?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| ReelboxError::Api {
            status,
            message: e.to_string(),
        })?;

        match status {
            200..=299 => Ok(body),
            401 => Err(ReelboxError::AuthFailed {
                service: SERVICE.to_string(),
                message: error_text(&body).unwrap_or_else(|| "invalid API key".to_string()),
            }),
            429 => Err(ReelboxError::RateLimited {
                service: SERVICE.to_string(),
                retry_after_secs: 60,
            }),
            _ => Err(ReelboxError::Api {
                status,
                message: error_text(&body).unwrap_or(body),
            }),
        }
    }
}

#[async_trait]
impl MetadataClient for OmdbClient {
    async fn search_by_title(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<SearchPage, ReelboxError> {
        let mut params = vec![("s", query.to_string())];
        if let Some(kind) = filters.media_type {
            params.push(("type", kind.to_string()));
        }
        if let Some(year) = filters.year {
            params.push(("y", year.to_string()));
        }
        if let Some(page) = filters.page {
            params.push(("page", page.to_string()));
        }
        let body = self.get(&params).await?;
        parse_search(&body)
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<Movie>, ReelboxError> {
        let body = self
            .get(&[("i", id.to_string()), ("plot", self.plot.to_string())])
            .await?;
        parse_detail(&body)
    }
}

#[derive(Deserialize)]
struct OmdbEnvelope {
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Deserialize)]
struct OmdbSearch {
    #[serde(rename = "Search", default)]
    search: Vec<Movie>,
    #[serde(rename = "totalResults")]
    total_results: Option<String>,
}

fn envelope(body: &str) -> Result<OmdbEnvelope, ReelboxError> {
    serde_json::from_str(body).map_err(|e| ReelboxError::Api {
        status: 0,
        message: format!("JSON parse error: {e}"),
    })
}

fn error_text(body: &str) -> Option<String> {
    serde_json::from_str::<OmdbEnvelope>(body).ok()?.error
}

/// The source reports misses as errors; these are not failures.
fn is_not_found(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("not found") || lower.contains("incorrect imdb id")
}

/// Map the API-key complaint the source sends with a 200 status.
fn api_error(message: String) -> ReelboxError {
    if message.to_lowercase().contains("api key") {
        ReelboxError::AuthFailed {
            service: SERVICE.to_string(),
            message,
        }
    } else {
        ReelboxError::Api { status: 200, message }
    }
}

/// Parse a search response body.
pub fn parse_search(body: &str) -> Result<SearchPage, ReelboxError> {
    let env = envelope(body)?;
    if env.response.as_deref() == Some("False") {
        let message = env.error.unwrap_or_else(|| "unknown error".to_string());
        if is_not_found(&message) {
            return Ok(SearchPage::empty());
        }
        return Err(api_error(message));
    }

    let search: OmdbSearch = serde_json::from_str(body).map_err(|e| ReelboxError::Api {
        status: 0,
        message: format!("JSON parse error: {e}"),
    })?;
    let total_results = search
        .total_results
        .and_then(|t| t.parse().ok())
        .unwrap_or(search.search.len() as u32);
    Ok(SearchPage {
        movies: search.search,
        total_results,
    })
}

/// Parse a detail response body. The `Response` marker is dropped; every other
/// field is kept on the returned record.
pub fn parse_detail(body: &str) -> Result<Option<Movie>, ReelboxError> {
    let env = envelope(body)?;
    if env.response.as_deref() == Some("False") {
        let message = env.error.unwrap_or_else(|| "unknown error".to_string());
        if is_not_found(&message) {
            return Ok(None);
        }
        return Err(api_error(message));
    }

    let mut value: serde_json::Value = serde_json::from_str(body)?;
    if let Some(map) = value.as_object_mut() {
        map.remove("Response");
    }
    Ok(Some(serde_json::from_value(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelbox_core::models::movie::MediaType;

    #[test]
    fn test_parse_search_results() {
        let body = r#"{
            "Search": [
                {"Title": "Alien", "Year": "1979", "imdbID": "tt0078748", "Type": "movie", "Poster": "https://m.media-amazon.com/a.jpg"},
                {"Title": "Aliens", "Year": "1986", "imdbID": "tt0090605", "Type": "movie", "Poster": "N/A"}
            ],
            "totalResults": "312",
            "Response": "True"
        }"#;
        let page = parse_search(body).unwrap();
        assert_eq!(page.total_results, 312);
        assert_eq!(page.movies.len(), 2);
        assert_eq!(page.movies[0].kind(), Some(MediaType::Movie));
        assert_eq!(page.movies[1].poster_url(), None);
    }

    #[test]
    fn test_parse_search_not_found_is_empty() {
        let page = parse_search(r#"{"Response":"False","Error":"Movie not found!"}"#).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total_results, 0);
    }

    #[test]
    fn test_parse_search_error_is_surfaced() {
        let err = parse_search(r#"{"Response":"False","Error":"Too many results."}"#).unwrap_err();
        match err {
            ReelboxError::Api { message, .. } => assert_eq!(message, "Too many results."),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_invalid_key() {
        let err = parse_search(r#"{"Response":"False","Error":"Invalid API key!"}"#).unwrap_err();
        assert!(matches!(err, ReelboxError::AuthFailed { .. }));
    }

    #[test]
    fn test_parse_detail() {
        let body = r#"{
            "Title": "Alien", "Year": "1979", "Rated": "R", "Runtime": "117 min",
            "Genre": "Horror, Sci-Fi", "Director": "Ridley Scott",
            "Plot": "The crew of a commercial spacecraft...",
            "Ratings": [{"Source": "Rotten Tomatoes", "Value": "93%"}],
            "imdbRating": "8.5", "imdbID": "tt0078748", "Type": "movie",
            "Response": "True"
        }"#;
        let movie = parse_detail(body).unwrap().unwrap();
        assert_eq!(movie.imdb_id, "tt0078748");
        assert_eq!(movie.director.as_deref(), Some("Ridley Scott"));
        assert_eq!(movie.field("Rated"), Some(&serde_json::json!("R")));
        assert!(movie.field("Response").is_none());
    }

    #[test]
    fn test_parse_detail_unknown_id() {
        let body = r#"{"Response":"False","Error":"Incorrect IMDb ID."}"#;
        assert!(parse_detail(body).unwrap().is_none());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_search("<html>").is_err());
    }
}
