//! # Tracing Setup
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter whose
//! filter comes from `RUST_LOG`.
//!
//! ```bash
//! # Lifecycle and fetch outcomes
//! RUST_LOG=info cargo run -- --search "dune"
//!
//! # Broker traffic, payloads and mounts
//! RUST_LOG=debug cargo run
//!
//! # Only the domain model
//! RUST_LOG=movie_review::domain=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a popular listing followed by a detail selection reads
//! roughly like:
//!
//! ```text
//! INFO fetch_movies: Fetched movies query=popular page=1 count=20 total_pages=500
//! INFO Rendered movie list count=20
//! INFO get_movie_detail: Fetched detail movie_id=42
//! INFO Rated movie movie_id=42 score=8
//! ```
//!
//! Failures that the UI recovers from (toasts, inline errors) are logged at
//! `warn`; nothing is logged at `error` unless the binary gives up.

/// Installs the global subscriber. Call once, at program start.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // module paths add noise; spans carry the context
        .compact()
        .init();
}
