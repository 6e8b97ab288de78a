//! Client for the external recommendation service.
//!
//! Wire contract:
//! - `POST {base}/recommend` with a JSON array of 3 titles → `{"recommendations": [...]}`
//! - `GET {base}/surprise` → `{"surprises": [...]}`
//! - failures carry an optional `{"detail": "..."}`
use reqwest::Client;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::movie::{Movie, TitleTriple};
use crate::state::RequestKind;

/// The two calls the UI can make. Implemented over HTTP in production and
/// by in-memory fakes in tests.
#[async_trait::async_trait]
pub trait RecommendationApi: Send + Sync {
    async fn recommend(&self, titles: &TitleTriple) -> ApiResult<Vec<Movie>>;

    async fn surprise(&self) -> ApiResult<Vec<Movie>>;
}

#[derive(Clone)]
pub struct HttpRecommendationClient {
    client: Client,
    base_url: String,
}

impl HttpRecommendationClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn read(kind: RequestKind, response: reqwest::Response) -> ApiResult<Vec<Movie>> {
        let status = response.status();
        let body = response.bytes().await?;
        tracing::debug!(status = status.as_u16(), bytes = body.len(), ?kind, "Received API response");
        interpret_response(kind, status.as_u16(), &body)
    }
}

#[async_trait::async_trait]
impl RecommendationApi for HttpRecommendationClient {
    async fn recommend(&self, titles: &TitleTriple) -> ApiResult<Vec<Movie>> {
        let url = format!("{}/recommend", self.base_url);
        tracing::debug!(%url, "Requesting recommendations");

        let response = self.client.post(&url).json(titles).send().await?;
        Self::read(RequestKind::ByTitles, response).await
    }

    async fn surprise(&self) -> ApiResult<Vec<Movie>> {
        let url = format!("{}/surprise", self.base_url);
        tracing::debug!(%url, "Requesting surprise");

        let response = self.client.get(&url).send().await?;
        Self::read(RequestKind::Surprise, response).await
    }
}

/// Turn a raw status + body into the movie list or an `ApiError::Http`.
pub fn interpret_response(kind: RequestKind, status: u16, body: &[u8]) -> ApiResult<Vec<Movie>> {
    if !(200..300).contains(&status) {
        let message =
            error_detail(body).unwrap_or_else(|| format!("HTTP error! status: {}", status));
        return Err(ApiError::Http(message));
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::Http(format!("Invalid response body: {}", e)))?;

    // A missing or null list means "nothing to show", not a failure.
    match value.get(kind.list_field()) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(entries)) => Ok(decode_movies(kind, entries)),
        Some(other) => Err(ApiError::Http(format!(
            "Invalid {} list: expected an array, got {}",
            kind.list_field(),
            other
        ))),
    }
}

/// Decode each entry on its own; entries that are not objects are skipped.
fn decode_movies(kind: RequestKind, entries: &[Value]) -> Vec<Movie> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let movie = Movie::from_value(entry);
            if movie.is_none() {
                tracing::warn!(?kind, index, "Skipping malformed movie entry");
            }
            movie
        })
        .collect()
}

/// Human-readable `detail` from an error body, if there is one.
fn error_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        // e.g. validation errors, where detail is a list of objects
        other => Some(other.to_string()),
    }
}
