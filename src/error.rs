use crate::clients::ApiError;
use view_framework::FrameworkError;

/// Top-level error of the movie review application.
///
/// Lower layers keep their own error types ([`ApiError`] for the movie API,
/// [`FrameworkError`] for storage and the broker); `#[from]` lets `?` lift
/// them here.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("Movie API error: {0}")]
    Api(#[from] ApiError),

    #[error("Framework error: {0}")]
    Framework(#[from] FrameworkError),

    #[error("Invalid star score {0}: expected one of 0, 2, 4, 6, 8, 10")]
    InvalidStarScore(u8),

    #[error("Search term must not be empty")]
    EmptySearchTerm,

    #[error("The error on screen must be acknowledged first")]
    PageBlocked,

    #[error("Configuration error: {0}")]
    Config(String),
}
