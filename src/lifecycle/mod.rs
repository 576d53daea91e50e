//! Application assembly: mounting the page and tearing it down again.

pub mod app;

pub use app::MovieReviewApp;
