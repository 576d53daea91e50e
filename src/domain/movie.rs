//! # Movie Domain Model
//!
//! [`MovieModel`] owns the state behind a listing and a detail overlay:
//!
//! - a [`PaginationCursor`] for the current query context,
//! - `total_pages` of the last successful listing response,
//! - a single slot holding the most recently resolved [`MovieDetail`].
//!
//! Methods take `&self` (state lives in `Cell`/`RefCell`) so a model can be
//! shared through an `Rc` with the async task that drives it. No borrow is
//! held across an `.await`, and callbacks run after every borrow is released,
//! so a callback may query the model again.
//!
//! Calls to [`MovieModel::fetch_movies`] on one instance must not overlap;
//! the list view guarantees this by running its fetches in a
//! [`TaskSlot`](view_framework::TaskSlot) that ignores re-triggers while busy.

use crate::clients::{ApiError, MovieApi};
use crate::model::{MovieDetail, MovieId, MovieListResponse, PaginationCursor, QueryContext};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, info, instrument, warn};

pub struct MovieModel {
    api: Rc<dyn MovieApi>,
    cursor: RefCell<PaginationCursor>,
    total_pages: Cell<Option<u32>>,
    detail: RefCell<Option<MovieDetail>>,
}

impl std::fmt::Debug for MovieModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovieModel")
            .field("cursor", &self.cursor.borrow())
            .field("total_pages", &self.total_pages.get())
            .field("detail", &self.detail.borrow().as_ref().map(|d| d.movie_id))
            .finish()
    }
}

impl MovieModel {
    pub fn new(api: Rc<dyn MovieApi>) -> Self {
        Self::with_query(api, QueryContext::Popular)
    }

    /// Starts with the cursor already on `query`.
    pub fn with_query(api: Rc<dyn MovieApi>, query: QueryContext) -> Self {
        Self {
            api,
            cursor: RefCell::new(PaginationCursor::new(query)),
            total_pages: Cell::new(None),
            detail: RefCell::new(None),
        }
    }

    /// Records the page size. The first call settles on page 1, every later
    /// call moves one page forward.
    pub fn set_page(&self, page_size: usize) {
        let mut cursor = self.cursor.borrow_mut();
        cursor.set_page(page_size);
        debug!(page = cursor.current_page(), page_size, "Page set");
    }

    pub fn current_page(&self) -> u32 {
        self.cursor.borrow().current_page()
    }

    pub fn query(&self) -> QueryContext {
        self.cursor.borrow().query().clone()
    }

    /// Fetches the cursor's current page for `query`.
    ///
    /// A `query` different from the cursor's context starts over at page 1.
    /// On success `total_pages` is recorded before `on_success` runs; on
    /// failure the cursor is left as it was and `on_error` runs.
    #[instrument(skip(self, on_success, on_error))]
    pub async fn fetch_movies<S, E>(&self, query: &QueryContext, on_success: S, on_error: E)
    where
        S: FnOnce(MovieListResponse),
        E: FnOnce(ApiError),
    {
        let page = {
            let mut cursor = self.cursor.borrow_mut();
            if cursor.query() != query {
                debug!(from = %cursor.query(), to = %query, "Query changed, cursor reset");
                cursor.reset(query.clone());
            }
            cursor.current_page()
        };

        match self.api.list_movies(query, page).await {
            Ok(response) => {
                info!(
                    %query,
                    page,
                    count = response.results.len(),
                    total_pages = response.total_pages,
                    "Fetched movies"
                );
                self.total_pages.set(Some(response.total_pages));
                on_success(response);
            }
            Err(error) => {
                warn!(%query, page, %error, "Fetching movies failed");
                on_error(error);
            }
        }
    }

    /// Resolves a detail, reusing the slot when it already holds `movie_id`.
    ///
    /// A failed fetch leaves the slot untouched.
    #[instrument(skip(self))]
    pub async fn get_movie_detail(&self, movie_id: MovieId) -> Result<MovieDetail, ApiError> {
        if let Some(detail) = self.detail.borrow().as_ref() {
            if detail.movie_id == movie_id {
                debug!("Detail slot hit");
                return Ok(detail.clone());
            }
        }

        let detail = self.api.movie_detail(movie_id).await.inspect_err(|error| {
            warn!(%error, "Fetching detail failed");
        })?;
        info!(title = %detail.title, "Fetched detail");
        self.detail.replace(Some(detail.clone()));
        Ok(detail)
    }

    /// The last resolved detail, if any.
    pub fn movie_details(&self) -> Option<MovieDetail> {
        self.detail.borrow().clone()
    }

    /// True once the cursor reached the last page of the last successful
    /// response. False before any page was fetched.
    pub fn is_max_page(&self) -> bool {
        self.total_pages
            .get()
            .is_some_and(|total| self.current_page() >= total)
    }
}
