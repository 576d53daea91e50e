//! # Movie Review Body
//!
//! The listing section: a heading, the growing list of fetched pages and the
//! "more" button.
//!
//! ## Load cycle
//!
//! 1. A skeleton list is appended right away.
//! 2. The domain model fetches the next page inside the body's [`TaskSlot`].
//! 3. On success the skeleton is removed and the page is appended below the
//!    earlier ones. An empty first page shows the no-result image instead.
//! 4. The more button is removed for good once a page comes back short or
//!    the last page was reached.
//!
//! A failed load removes the skeleton and keeps the cursor, so the next
//! click on "more" asks for the same page again. Credential failures go to
//! the error modal through the broker, everything else becomes a toast.
//!
//! "More" clicks while a page is still loading, or while the error modal
//! blocks the page, are ignored. Unmounting
//! cancels the load; a response that still arrives for a detached section
//! is dropped.

use super::error_surface::{PageGate, ToastHost};
use super::movie_list::{MovieCardSkeleton, MovieList, MovieListProps};
use crate::clients::{ApiError, MovieApi};
use crate::constants::{MAX_ITEMS_PER_LOAD, NO_RESULT_IMAGE, PAGE_SIZE, SKELETON_COUNT};
use crate::domain::MovieModel;
use crate::events::{MovieBroker, MovieEvent};
use crate::model::{MovieListResponse, QueryContext};
use std::cell::Cell;
use std::rc::Rc;
use tracing::{debug, info, warn};
use view_framework::{mount, Component, Element, EventKind, FrameworkError, TaskSlot};

pub struct MovieReviewBodyProps {
    pub query: QueryContext,
    pub api: Rc<dyn MovieApi>,
    pub broker: MovieBroker,
    pub toasts: ToastHost,
    pub gate: PageGate,
}

pub struct MovieReviewBody {
    props: Option<MovieReviewBodyProps>,
    root: Element,
    inner: Option<Rc<BodyState>>,
}

/// State shared between the component, its listeners and its load task.
struct BodyState {
    query: QueryContext,
    model: MovieModel,
    broker: MovieBroker,
    toasts: ToastHost,
    gate: PageGate,
    root: Element,
    container: Element,
    more_button: Element,
    task: Rc<TaskSlot>,
    /// The last load failed; the next one reuses its page.
    retry: Cell<bool>,
    exhausted: Cell<bool>,
    started: Cell<bool>,
    pages: Cell<usize>,
}

impl Component for MovieReviewBody {
    type Props = MovieReviewBodyProps;

    fn create(props: MovieReviewBodyProps) -> Self {
        Self {
            props: Some(props),
            root: Element::new("section")
                .with_id("movie-review-section")
                .with_class("item-view"),
            inner: None,
        }
    }

    fn root(&self) -> &Element {
        &self.root
    }

    fn initialize_state(&mut self) {
        let Some(props) = self.props.take() else {
            return;
        };
        let model = MovieModel::with_query(props.api, props.query.clone());
        self.inner = Some(Rc::new(BodyState {
            query: props.query,
            model,
            broker: props.broker,
            toasts: props.toasts,
            gate: props.gate,
            root: self.root.clone(),
            container: Element::new("div").with_id("movie-list-container"),
            more_button: Element::new("button")
                .with_id("more-button")
                .with_text("More"),
            task: Rc::new(TaskSlot::new()),
            retry: Cell::new(false),
            exhausted: Cell::new(false),
            started: Cell::new(false),
            pages: Cell::new(0),
        }));
    }

    fn render(&mut self) -> Result<(), FrameworkError> {
        let inner = self.state()?;
        self.root.append_child(&Element::new("h2").with_text(inner.query.heading()));
        self.root.append_child(&inner.container);
        if !inner.exhausted.get() {
            self.root.append_child(&inner.more_button);
        }

        if !inner.started.replace(true) {
            BodyState::load_more(&inner);
        }
        Ok(())
    }

    fn set_event(&mut self) {
        let Some(inner) = self.inner.as_ref() else {
            return;
        };
        let state = Rc::downgrade(inner);
        self.root.add_listener(EventKind::Click, move |event| {
            if !event.target.matches("#more-button") {
                return;
            }
            if let Some(state) = state.upgrade() {
                BodyState::load_more(&state);
            }
        });
    }

    fn teardown(&mut self) {
        if let Some(inner) = &self.inner {
            inner.task.cancel();
        }
    }
}

impl MovieReviewBody {
    fn state(&self) -> Result<Rc<BodyState>, FrameworkError> {
        self.inner
            .clone()
            .ok_or_else(|| FrameworkError::Render("movie review body has no state".into()))
    }

    /// Starts loading the next page. Returns `false` when the listing is
    /// exhausted, a load is already running or the page is blocked.
    pub fn load_more(&self) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|inner| BodyState::load_more(inner))
    }

    pub fn query(&self) -> Option<&QueryContext> {
        self.inner.as_ref().map(|inner| &inner.query)
    }

    /// The slot running this body's page loads.
    pub fn task(&self) -> Option<Rc<TaskSlot>> {
        self.inner.as_ref().map(|inner| inner.task.clone())
    }

    /// Number of pages rendered so far.
    pub fn page_count(&self) -> usize {
        self.inner.as_ref().map_or(0, |inner| inner.pages.get())
    }

    pub fn is_exhausted(&self) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|inner| inner.exhausted.get())
    }
}

impl BodyState {
    fn load_more(this: &Rc<Self>) -> bool {
        if this.gate.is_blocked() {
            debug!(query = %this.query, "Page blocked by error modal");
            return false;
        }
        if this.exhausted.get() {
            debug!(query = %this.query, "Listing exhausted");
            return false;
        }
        if this.task.is_running() {
            debug!(query = %this.query, "Load already in flight");
            return false;
        }

        if !this.retry.replace(false) {
            this.model.set_page(PAGE_SIZE);
        }
        let skeleton = MovieCardSkeleton::list(SKELETON_COUNT);
        this.container.append_child(&skeleton);

        let state = this.clone();
        this.task
            .spawn_if_idle(async move { state.fetch_page(skeleton).await })
    }

    async fn fetch_page(self: Rc<Self>, skeleton: Element) {
        self.model
            .fetch_movies(
                &self.query,
                |response| {
                    skeleton.remove();
                    if self.root.is_connected() {
                        self.render_page(response);
                    }
                },
                |error| {
                    skeleton.remove();
                    if self.root.is_connected() {
                        self.render_error(error);
                    }
                },
            )
            .await;
    }

    fn render_page(&self, response: MovieListResponse) {
        let count = response.results.len();
        if count == 0 {
            if self.container.query("img.no-result-image").is_none() {
                self.container.append_child(
                    &Element::new("img")
                        .with_class("no-result-image")
                        .with_attr("src", NO_RESULT_IMAGE)
                        .with_attr("alt", "No results"),
                );
            }
            self.exhaust();
            info!(query = %self.query, "No results");
            return;
        }

        let list = mount::<MovieList>(
            &self.container,
            MovieListProps {
                movies: response.results,
                broker: self.broker.clone(),
            },
        );
        if let Err(error) = list {
            warn!(%error, "Rendering movie list failed");
            self.toasts.show("Could not display the movies.");
            return;
        }
        self.pages.set(self.pages.get() + 1);
        info!(query = %self.query, page = self.model.current_page(), count, "Rendered movie list");

        if count < MAX_ITEMS_PER_LOAD || self.model.is_max_page() {
            self.exhaust();
        }
    }

    fn render_error(&self, error: ApiError) {
        self.retry.set(true);
        if error.is_credential_error() {
            let published = self.broker.publish(MovieEvent::CredentialError {
                message: error.to_string(),
            });
            if let Err(publish_error) = published {
                warn!(%publish_error, "Credential error was not fully delivered");
            }
        } else {
            self.toasts.show(format!("Failed to load movies: {error}"));
        }
    }

    fn exhaust(&self) {
        self.exhausted.set(true);
        self.more_button.remove();
        debug!(query = %self.query, "More button removed");
    }
}
