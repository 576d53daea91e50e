//! # Movie API boundary
//!
//! The views never talk HTTP. They go through [`MovieApi`], which has two
//! implementations:
//!
//! - [`TmdbClient`]: the real TMDB v3 API over `reqwest`.
//! - [`MockMovieApi`]: a scripted stand-in for tests.

pub mod mock;
pub mod movie_api;
pub mod tmdb_client;

pub use mock::{MockCall, MockMovieApi};
pub use movie_api::{ApiError, MovieApi};
pub use tmdb_client::TmdbClient;
