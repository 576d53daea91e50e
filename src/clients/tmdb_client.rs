//! HTTP client for The Movie Database (TMDB) v3 API.
//!
//! Only the three endpoints the catalog needs are wrapped. Requests are sent
//! once; there is no retry or backoff.
//!
//! The API key travels as the `api_key` query parameter, so request URLs are
//! never logged. Enabling `RUST_LOG=reqwest=debug` would print them.

use super::movie_api::{ApiError, MovieApi};
use crate::constants::{DEFAULT_BASE_URL, DEFAULT_LANGUAGE};
use crate::model::{Genre, MovieDetail, MovieId, MovieListResponse, QueryContext};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, instrument};

pub struct TmdbClient {
    http: Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TmdbClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("language", &self.language)
            .finish()
    }
}

/// Detail payload of `GET /movie/{id}`.
#[derive(Debug, Deserialize)]
struct TmdbMovieDetail {
    id: MovieId,
    title: String,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    genres: Vec<Genre>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    vote_average: f64,
}

impl From<TmdbMovieDetail> for MovieDetail {
    fn from(raw: TmdbMovieDetail) -> Self {
        MovieDetail {
            movie_id: raw.id,
            title: raw.title,
            overview: raw.overview.filter(|text| !text.trim().is_empty()),
            genres: raw.genres,
            poster_path: raw.poster_path,
            vote_average: raw.vote_average,
            my_star_score: None,
        }
    }
}

/// Error body TMDB sends with non-success statuses.
#[derive(Debug, Deserialize)]
struct TmdbStatus {
    #[serde(default)]
    status_message: String,
}

impl TmdbClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        debug!(path, "Sending request");
        let response = self
            .http
            .get(self.endpoint(path))
            .query(&[("api_key", self.api_key.as_str()), ("language", self.language.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<TmdbStatus>()
                .await
                .map(|body| body.status_message)
                .unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), path, message));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.without_url().to_string()))
    }
}

#[async_trait(?Send)]
impl MovieApi for TmdbClient {
    #[instrument(skip(self))]
    async fn list_movies(
        &self,
        query: &QueryContext,
        page: u32,
    ) -> Result<MovieListResponse, ApiError> {
        match query {
            QueryContext::Popular => {
                self.get_json("/movie/popular", &[("page", page.to_string())])
                    .await
            }
            QueryContext::Search(term) => {
                self.get_json(
                    "/search/movie",
                    &[("query", term.clone()), ("page", page.to_string())],
                )
                .await
            }
        }
    }

    #[instrument(skip(self))]
    async fn movie_detail(&self, id: MovieId) -> Result<MovieDetail, ApiError> {
        let raw: TmdbMovieDetail = self.get_json(&format!("/movie/{id}"), &[]).await?;
        Ok(raw.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = TmdbClient::new("key").with_base_url("http://localhost:8080/3/");
        assert_eq!(client.endpoint("/movie/popular"), "http://localhost:8080/3/movie/popular");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let client = TmdbClient::new("super-secret");
        assert!(!format!("{client:?}").contains("super-secret"));
    }

    #[test]
    fn test_detail_conversion() {
        let raw: TmdbMovieDetail = serde_json::from_str(
            r#"{
                "id": 42,
                "title": "Dune",
                "overview": "  ",
                "genres": [{"id": 878, "name": "Science Fiction"}],
                "poster_path": "/dune.jpg",
                "vote_average": 8.1,
                "runtime": 155
            }"#,
        )
        .unwrap();

        let detail = MovieDetail::from(raw);
        assert_eq!(detail.movie_id, 42);
        assert_eq!(detail.overview, None);
        assert_eq!(detail.genre_names(), "Science Fiction");
        assert_eq!(detail.my_star_score, None);
    }
}
