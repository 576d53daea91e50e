//! # Mock Movie API
//!
//! A scripted [`MovieApi`] for tests. Expectations are queued with a fluent
//! builder and consumed in order; every request is recorded.
//!
//! ```rust
//! use movie_review::clients::{ApiError, MockMovieApi};
//! use movie_review::model::{MovieListResponse, QueryContext};
//!
//! let mock = MockMovieApi::new();
//! mock.expect_list(QueryContext::Popular, 1)
//!     .return_ok(MovieListResponse::empty());
//! mock.expect_detail(42)
//!     .return_err(ApiError::Credential { status: 401 });
//! // hand `mock.clone()` to the code under test, then:
//! // mock.verify();
//! ```
//!
//! An unscripted or mismatching request does not panic inside the task that
//! made it (the panic would be swallowed by the runtime). It fails with
//! [`ApiError::Network`] and is reported by [`MockMovieApi::verify`].

use super::movie_api::{ApiError, MovieApi};
use crate::model::{MovieDetail, MovieId, MovieListResponse, QueryContext};
use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

enum Expectation {
    List {
        query: QueryContext,
        page: u32,
        response: Result<MovieListResponse, ApiError>,
    },
    Detail {
        id: MovieId,
        response: Result<MovieDetail, ApiError>,
    },
}

/// A request the mock received.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    List { query: QueryContext, page: u32 },
    Detail { id: MovieId },
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    calls: Vec<MockCall>,
    unexpected: Vec<MockCall>,
}

/// A scripted movie API. Clones share the same script and call log.
#[derive(Clone, Default)]
pub struct MockMovieApi {
    state: Rc<RefCell<MockState>>,
}

impl MockMovieApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects a `list_movies(query, page)` call.
    pub fn expect_list(&self, query: QueryContext, page: u32) -> ListExpectationBuilder {
        ListExpectationBuilder {
            query,
            page,
            state: self.state.clone(),
        }
    }

    /// Expects a `movie_detail(id)` call.
    pub fn expect_detail(&self, id: MovieId) -> DetailExpectationBuilder {
        DetailExpectationBuilder {
            id,
            state: self.state.clone(),
        }
    }

    /// Every request received so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.state.borrow().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.borrow().calls.len()
    }

    pub fn pending_expectations(&self) -> usize {
        self.state.borrow().expectations.len()
    }

    /// Panics if an expectation was not consumed or an unexpected request arrived.
    pub fn verify(&self) {
        let state = self.state.borrow();
        if !state.unexpected.is_empty() {
            panic!("Unexpected requests: {:?}", state.unexpected);
        }
        if !state.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                state.expectations.len()
            );
        }
    }

    fn next_list(&self, query: &QueryContext, page: u32) -> Result<MovieListResponse, ApiError> {
        let call = MockCall::List {
            query: query.clone(),
            page,
        };
        let mut state = self.state.borrow_mut();
        state.calls.push(call.clone());
        let expected = matches!(
            state.expectations.front(),
            Some(Expectation::List { query: q, page: p, .. }) if q == query && *p == page
        );
        if !expected {
            return Err(Self::reject(&mut state, call));
        }
        match state.expectations.pop_front() {
            Some(Expectation::List { response, .. }) => response,
            _ => Err(Self::reject(&mut state, call)),
        }
    }

    fn next_detail(&self, id: MovieId) -> Result<MovieDetail, ApiError> {
        let call = MockCall::Detail { id };
        let mut state = self.state.borrow_mut();
        state.calls.push(call.clone());
        let expected = matches!(
            state.expectations.front(),
            Some(Expectation::Detail { id: expected, .. }) if *expected == id
        );
        if !expected {
            return Err(Self::reject(&mut state, call));
        }
        match state.expectations.pop_front() {
            Some(Expectation::Detail { response, .. }) => response,
            _ => Err(Self::reject(&mut state, call)),
        }
    }

    fn reject(state: &mut MockState, call: MockCall) -> ApiError {
        let error = ApiError::Network(format!("unexpected request {call:?}"));
        state.unexpected.push(call);
        error
    }
}

#[async_trait(?Send)]
impl MovieApi for MockMovieApi {
    async fn list_movies(
        &self,
        query: &QueryContext,
        page: u32,
    ) -> Result<MovieListResponse, ApiError> {
        // Suspend once so callers observe the in-flight state, like a real request
        tokio::task::yield_now().await;
        self.next_list(query, page)
    }

    async fn movie_detail(&self, id: MovieId) -> Result<MovieDetail, ApiError> {
        tokio::task::yield_now().await;
        self.next_detail(id)
    }
}

/// Builder for `list_movies` expectations.
pub struct ListExpectationBuilder {
    query: QueryContext,
    page: u32,
    state: Rc<RefCell<MockState>>,
}

impl ListExpectationBuilder {
    pub fn return_ok(self, response: MovieListResponse) {
        self.push(Ok(response));
    }

    pub fn return_err(self, error: ApiError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<MovieListResponse, ApiError>) {
        self.state
            .borrow_mut()
            .expectations
            .push_back(Expectation::List {
                query: self.query,
                page: self.page,
                response,
            });
    }
}

/// Builder for `movie_detail` expectations.
pub struct DetailExpectationBuilder {
    id: MovieId,
    state: Rc<RefCell<MockState>>,
}

impl DetailExpectationBuilder {
    pub fn return_ok(self, detail: MovieDetail) {
        self.push(Ok(detail));
    }

    pub fn return_err(self, error: ApiError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<MovieDetail, ApiError>) {
        self.state
            .borrow_mut()
            .expectations
            .push_back(Expectation::Detail {
                id: self.id,
                response,
            });
    }
}
