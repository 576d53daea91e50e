use crate::model::{MovieDetail, MovieId, MovieListResponse, QueryContext};
use async_trait::async_trait;

/// Failures of the remote movie catalog.
///
/// [`ApiError::Credential`] is kept apart from everything else: it cannot be
/// fixed by retrying, so the UI reports it through the blocking error modal
/// instead of a toast.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("The API key is missing or invalid (HTTP {status})")]
    Credential { status: u16 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request failed with HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_credential_error(&self) -> bool {
        matches!(self, ApiError::Credential { .. })
    }

    /// Maps a non-success HTTP status.
    pub fn from_status(status: u16, resource: &str, message: impl Into<String>) -> Self {
        match status {
            401 | 403 => ApiError::Credential { status },
            404 => ApiError::NotFound(resource.to_string()),
            _ => ApiError::Http {
                status,
                message: message.into(),
            },
        }
    }
}

/// The remote movie catalog as seen by the domain model.
///
/// Futures are `?Send`: everything runs on the UI thread.
#[async_trait(?Send)]
pub trait MovieApi {
    /// Fetches one page of `query`. Pages start at 1.
    async fn list_movies(&self, query: &QueryContext, page: u32)
        -> Result<MovieListResponse, ApiError>;

    async fn movie_detail(&self, id: MovieId) -> Result<MovieDetail, ApiError>;
}
