//! Fixed values shared by the views, the domain model and the TMDB client.

use std::time::Duration;

/// Items requested per page.
pub const PAGE_SIZE: usize = 20;

/// A load returning fewer items than this means the listing is exhausted.
pub const MAX_ITEMS_PER_LOAD: usize = 20;

/// Placeholder cards shown while a page is loading.
pub const SKELETON_COUNT: usize = 20;

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Storage key of the rated movie collection.
pub const RATINGS_KEY: &str = "movieList";

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

pub const NO_RESULT_IMAGE: &str = "assets/no_result.png";
pub const NO_IMAGE: &str = "assets/no_img.png";

/// Description per star score, indexed by `score / 2`.
pub const STAR_DESCRIPTIONS: [&str; 6] = [
    "Leave a rating",
    "Terrible",
    "Disappointing",
    "Average",
    "Great",
    "Masterpiece",
];

pub const EMPTY_SEARCH_MESSAGE: &str = "Please enter a search term.";
pub const NO_OVERVIEW: &str = "No overview available.";
