//! # Movie Review
//!
//! A movie catalog page: list popular or searched movies page by page, open
//! a detail overlay, and keep a personal star rating per movie across
//! sessions. The page is rendered into the headless element tree of
//! [`view_framework`].
//!
//! ## Module Tour
//!
//! ### 1. Data ([`model`])
//! Plain types: [`MovieSummary`](model::MovieSummary),
//! [`MovieDetail`](model::MovieDetail), [`StarScore`](model::StarScore),
//! [`QueryContext`](model::QueryContext) and the pagination cursor.
//!
//! ### 2. The API boundary ([`clients`])
//! [`MovieApi`](clients::MovieApi) with the TMDB implementation and a
//! scripted mock for tests.
//!
//! ### 3. Domain state ([`domain`])
//! [`MovieModel`](domain::MovieModel) drives pagination and caches the last
//! resolved detail; [`RatingStore`](domain::RatingStore) persists ratings.
//!
//! ### 4. Views ([`views`]) and events ([`events`])
//! Components for the listing, the detail overlay and the error surface.
//! Views that must not know each other communicate over the broker.
//!
//! ### 5. Assembly ([`lifecycle`])
//! [`MovieReviewApp`](lifecycle::MovieReviewApp) mounts and wires everything.
//!
//! ## Runtime
//!
//! Single-threaded: run inside a `tokio::task::LocalSet` on a current-thread
//! runtime.
//!
//! ```bash
//! TMDB_API_KEY=... RUST_LOG=info cargo run -- --search dune --pages 2 --select 438631 --rate 8
//! ```

pub mod clients;
pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod model;
pub mod views;

pub use error::ReviewError;
