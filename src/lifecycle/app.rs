use crate::clients::MovieApi;
use crate::error::ReviewError;
use crate::events::{MovieBroker, MovieEvent};
use crate::model::{MovieId, QueryContext};
use crate::views::{
    ErrorModal, Modal, MovieDetailProps, MovieDetailView, MovieReviewBody, MovieReviewBodyProps,
    PageGate, SearchForm, SearchFormProps, ToastHost,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, error, info};
use view_framework::{mount, Element, FrameworkError, KeyValueStore, Mounted};

/// The whole movie review page, mounted on a document.
///
/// `MovieReviewApp` is responsible for:
/// - **Mounting**: header with the search form, the listing, the detail
///   modal and its view, the error modal and the toast host
/// - **Wiring**: every view gets the same API, store, broker and toast host
/// - **Navigation**: a search replaces the listing with a fresh one
/// - **Blocking**: while the error modal is open, searches, page loads and
///   selections are refused
/// - **Shutdown**: unmounting every view and dropping its subscriptions
///
/// # Example
///
/// ```rust,no_run
/// use movie_review::clients::TmdbClient;
/// use movie_review::events::global_broker;
/// use movie_review::lifecycle::MovieReviewApp;
/// use movie_review::model::QueryContext;
/// use std::rc::Rc;
/// use view_framework::{Element, MemoryStore};
///
/// # async fn run() -> Result<(), movie_review::ReviewError> {
/// let document = Element::document();
/// let app = MovieReviewApp::new(
///     &document,
///     Rc::new(TmdbClient::new("api-key")),
///     Rc::new(MemoryStore::new()),
///     global_broker(),
/// )?;
/// app.settled().await;
/// app.search(QueryContext::Search("dune".into()))?;
/// app.settled().await;
/// app.shutdown();
/// # Ok(())
/// # }
/// ```
pub struct MovieReviewApp {
    document: Element,
    broker: MovieBroker,
    header: Element,
    search_form: Mounted<SearchForm>,
    navigator: Rc<Navigator>,
    modal: Mounted<Modal>,
    detail: Mounted<MovieDetailView>,
    error_modal: Mounted<ErrorModal>,
    toasts: Mounted<ToastHost>,
}

/// Owns the listing slot of the page and swaps its content on navigation.
struct Navigator {
    main: Element,
    api: Rc<dyn MovieApi>,
    broker: MovieBroker,
    toasts: ToastHost,
    gate: PageGate,
    body: RefCell<Option<Mounted<MovieReviewBody>>>,
}

impl Navigator {
    fn navigate(&self, query: QueryContext) -> Result<(), FrameworkError> {
        info!(%query, "Navigating");
        self.toasts.clear();
        let previous = self.body.borrow_mut().take();
        if let Some(previous) = previous {
            previous.unmount();
        }

        let body = mount::<MovieReviewBody>(
            &self.main,
            MovieReviewBodyProps {
                query,
                api: self.api.clone(),
                broker: self.broker.clone(),
                toasts: self.toasts.clone(),
                gate: self.gate.clone(),
            },
        )?;
        self.body.replace(Some(body));
        Ok(())
    }

    fn search_handler(this: Weak<Self>) -> Rc<dyn Fn(QueryContext)> {
        Rc::new(move |query| {
            let Some(navigator) = this.upgrade() else {
                return;
            };
            if navigator.gate.is_blocked() {
                debug!(%query, "Page blocked by error modal");
                return;
            }
            if let Err(e) = navigator.navigate(query) {
                error!(error = %e, "Navigation failed");
                navigator.toasts.show("Could not open the search results.");
            }
        })
    }
}

impl MovieReviewApp {
    /// Mounts the page below `document` and starts loading popular movies.
    ///
    /// Must be called inside a `LocalSet`.
    pub fn new(
        document: &Element,
        api: Rc<dyn MovieApi>,
        store: Rc<dyn KeyValueStore>,
        broker: MovieBroker,
    ) -> Result<Self, ReviewError> {
        let toasts = mount::<ToastHost>(document, ())?;
        let toast_host = toasts.component().clone();

        let header = Element::new("header")
            .with_id("app-header")
            .with_child(Element::new("h1").with_text("Movie Review"));
        document.append_child(&header);

        let main = Element::new("main").with_id("app-main");
        document.append_child(&main);

        let modal = mount::<Modal>(document, ())?;
        let error_modal = mount::<ErrorModal>(document, broker.clone())?;
        let gate = error_modal.component().gate();
        let detail = mount::<MovieDetailView>(
            modal.component().body(),
            MovieDetailProps {
                api: api.clone(),
                store,
                broker: broker.clone(),
                modal: modal.component().clone(),
                toasts: toast_host.clone(),
                gate: gate.clone(),
            },
        )?;

        let navigator = Rc::new(Navigator {
            main,
            api,
            broker: broker.clone(),
            toasts: toast_host.clone(),
            gate,
            body: RefCell::new(None),
        });

        let search_form = mount::<SearchForm>(
            &header,
            SearchFormProps {
                toasts: toast_host,
                on_search: Navigator::search_handler(Rc::downgrade(&navigator)),
            },
        )?;

        navigator.navigate(QueryContext::Popular)?;
        info!("Movie review app mounted");

        Ok(Self {
            document: document.clone(),
            broker,
            header,
            search_form,
            navigator,
            modal,
            detail,
            error_modal,
            toasts,
        })
    }

    pub fn document(&self) -> &Element {
        &self.document
    }

    pub fn broker(&self) -> &MovieBroker {
        &self.broker
    }

    pub fn search_form(&self) -> &SearchForm {
        self.search_form.component()
    }

    pub fn modal(&self) -> &Modal {
        self.modal.component()
    }

    pub fn detail(&self) -> &MovieDetailView {
        self.detail.component()
    }

    pub fn error_modal(&self) -> &ErrorModal {
        self.error_modal.component()
    }

    pub fn toasts(&self) -> &ToastHost {
        self.toasts.component()
    }

    /// The query the listing currently shows.
    pub fn current_query(&self) -> Option<QueryContext> {
        self.navigator
            .body
            .borrow()
            .as_ref()
            .and_then(|body| body.component().query().cloned())
    }

    /// Replaces the listing with a fresh one for `query`, starting at page 1.
    pub fn search(&self, query: QueryContext) -> Result<(), ReviewError> {
        if let QueryContext::Search(term) = &query {
            if term.trim().is_empty() {
                return Err(ReviewError::EmptySearchTerm);
            }
        }
        if self.navigator.gate.is_blocked() {
            return Err(ReviewError::PageBlocked);
        }
        self.navigator.navigate(query)?;
        Ok(())
    }

    /// Loads the next page of the current listing, if there is one.
    pub fn load_more(&self) -> bool {
        self.navigator
            .body
            .borrow()
            .as_ref()
            .is_some_and(|body| body.component().load_more())
    }

    /// Selects a movie as a card click would.
    pub fn select_movie(&self, movie_id: MovieId) -> Result<usize, ReviewError> {
        if self.navigator.gate.is_blocked() {
            return Err(ReviewError::PageBlocked);
        }
        Ok(self.broker.publish(MovieEvent::DetailSelect { movie_id })?)
    }

    /// Waits until neither the listing nor the detail has work in flight.
    pub async fn settled(&self) {
        loop {
            let list_task = self
                .navigator
                .body
                .borrow()
                .as_ref()
                .and_then(|body| body.component().task());
            let detail_task = self.detail.component().task();

            if let Some(task) = &list_task {
                task.settled().await;
            }
            detail_task.settled().await;

            let busy = list_task.is_some_and(|task| task.is_running()) || detail_task.is_running();
            if !busy {
                return;
            }
        }
    }

    /// Unmounts every view in reverse mounting order.
    pub fn shutdown(self) {
        info!("Shutting down movie review app...");
        self.error_modal.unmount();
        self.detail.unmount();
        self.modal.unmount();
        self.search_form.unmount();
        let body = self.navigator.body.borrow_mut().take();
        if let Some(body) = body {
            body.unmount();
        }
        self.navigator.main.remove();
        self.header.remove();
        self.toasts.unmount();
        info!("Movie review app shut down");
    }
}
