use super::movie::MovieSummary;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One page of a listing, as returned by TMDB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieListResponse {
    pub page: u32,
    pub results: Vec<MovieSummary>,
    pub total_pages: u32,
    pub total_results: u32,
}

impl MovieListResponse {
    pub fn empty() -> Self {
        Self {
            page: 1,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }
}

/// What is being listed: the popular chart or the results of a search.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum QueryContext {
    #[default]
    Popular,
    Search(String),
}

impl QueryContext {
    pub fn heading(&self) -> String {
        match self {
            QueryContext::Popular => "Popular movies right now".to_string(),
            QueryContext::Search(term) => format!("Results for \"{term}\""),
        }
    }
}

impl fmt::Display for QueryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryContext::Popular => write!(f, "popular"),
            QueryContext::Search(term) => write!(f, "search:{term}"),
        }
    }
}

/// Position of a paginated listing.
///
/// `current_page` starts at 1 and only ever grows for one query context;
/// switching context resets it.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationCursor {
    current_page: u32,
    page_size: usize,
    started: bool,
    query: QueryContext,
}

impl PaginationCursor {
    pub fn new(query: QueryContext) -> Self {
        Self {
            current_page: 1,
            page_size: 0,
            started: false,
            query,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn query(&self) -> &QueryContext {
        &self.query
    }

    /// Records the page size. The first call settles on page 1, every later
    /// call moves one page forward.
    pub fn set_page(&mut self, page_size: usize) {
        self.page_size = page_size;
        if self.started {
            self.current_page += 1;
        } else {
            self.started = true;
        }
    }

    /// Starts over at page 1 for `query`.
    pub fn reset(&mut self, query: QueryContext) {
        self.current_page = 1;
        self.started = true;
        self.query = query;
    }
}
