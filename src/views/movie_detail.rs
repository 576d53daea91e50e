//! # Movie Detail View
//!
//! Listens for [`MovieEvent::DetailSelect`] and shows the selected movie in
//! the detail modal.
//!
//! Resolution order for a selection:
//!
//! 1. The durable rating collection. A rated movie renders from there, with
//!    its stored score, and no request is made. A storage read failure is
//!    logged and treated as a miss.
//! 2. The domain model (its own detail slot first, then the movie API).
//! 3. If both fail, an inline error replaces the detail. Credential failures
//!    are also published so the page-level error modal opens.
//!
//! The modal opens after every attempt, successful or not.
//!
//! Selections are ignored while the error modal blocks the page.
//!
//! Selecting the movie that is already displayed does not re-render. After
//! an inline error nothing counts as displayed, so selecting the same movie
//! again tries again.
//!
//! Clicking a star updates the score in place and writes the whole record
//! to the rating collection.

use super::error_surface::{ErrorContainer, PageGate, ToastHost};
use super::modal::Modal;
use crate::clients::{ApiError, MovieApi};
use crate::constants::{IMAGE_BASE_URL, NO_IMAGE, NO_OVERVIEW};
use crate::domain::{MovieModel, RatingStore};
use crate::events::{MovieBroker, MovieEvent, DETAIL_SELECT};
use crate::model::{MovieDetail, MovieId, StarScore};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, info, warn};
use view_framework::{
    mount, Component, Element, EventKind, FrameworkError, KeyValueStore, SubscriptionId, TaskSlot,
};

pub struct MovieDetailProps {
    pub api: Rc<dyn MovieApi>,
    pub store: Rc<dyn KeyValueStore>,
    pub broker: MovieBroker,
    pub modal: Modal,
    pub toasts: ToastHost,
    pub gate: PageGate,
}

pub struct MovieDetailView {
    root: Element,
    broker: MovieBroker,
    state: Rc<DetailState>,
    subscription: Option<SubscriptionId>,
}

struct DetailState {
    root: Element,
    model: MovieModel,
    ratings: RatingStore,
    broker: MovieBroker,
    modal: Modal,
    toasts: ToastHost,
    gate: PageGate,
    task: Rc<TaskSlot>,
    displayed: Cell<Option<MovieId>>,
    detail: RefCell<Option<MovieDetail>>,
}

impl Component for MovieDetailView {
    type Props = MovieDetailProps;

    fn create(props: MovieDetailProps) -> Self {
        let root = Element::new("div").with_class("movie-detail-container");
        let state = Rc::new(DetailState {
            root: root.clone(),
            model: MovieModel::new(props.api),
            ratings: RatingStore::new(props.store),
            broker: props.broker.clone(),
            modal: props.modal,
            toasts: props.toasts,
            gate: props.gate,
            task: Rc::new(TaskSlot::new()),
            displayed: Cell::new(None),
            detail: RefCell::new(None),
        });
        Self {
            root,
            broker: props.broker,
            state,
            subscription: None,
        }
    }

    fn root(&self) -> &Element {
        &self.root
    }

    fn render(&mut self) -> Result<(), FrameworkError> {
        if let Some(detail) = self.state.detail.borrow().as_ref() {
            self.state.render_template(detail);
        }
        Ok(())
    }

    fn set_event(&mut self) {
        let state = Rc::downgrade(&self.state);
        self.root.add_listener(EventKind::Click, move |event| {
            let Some(label) = event.target.closest("label.star") else {
                return;
            };
            let Some(score) = label
                .attr("data-value")
                .and_then(|value| value.parse::<u8>().ok())
                .and_then(|value| StarScore::try_from(value).ok())
            else {
                return;
            };
            if let Some(state) = state.upgrade() {
                state.rate(score);
            }
        });

        self.root.add_listener(EventKind::Load, |event| {
            if event.target.matches("img.skeleton") {
                event.target.remove_class("skeleton");
            }
        });

        if self.subscription.is_none() {
            let state = Rc::downgrade(&self.state);
            self.subscription = Some(self.broker.subscribe(DETAIL_SELECT, move |envelope| {
                let MovieEvent::DetailSelect { movie_id } = envelope.detail else {
                    return Ok(());
                };
                let Some(state) = state.upgrade() else {
                    return Ok(());
                };
                if state.gate.is_blocked() {
                    debug!(movie_id, "Page blocked by error modal");
                    return Ok(());
                }
                let task = state.task.clone();
                task.spawn(state.show(movie_id));
                Ok(())
            }));
        }
    }

    fn teardown(&mut self) {
        self.state.task.cancel();
        if let Some(id) = self.subscription.take() {
            self.broker.unsubscribe(id);
        }
    }
}

impl MovieDetailView {
    /// The slot running the current selection.
    pub fn task(&self) -> Rc<TaskSlot> {
        self.state.task.clone()
    }

    pub fn displayed(&self) -> Option<MovieId> {
        self.state.displayed.get()
    }

    /// The detail on screen, including the current score.
    pub fn detail(&self) -> Option<MovieDetail> {
        self.state.detail.borrow().clone()
    }
}

impl DetailState {
    async fn show(self: Rc<Self>, movie_id: MovieId) {
        debug!(movie_id, "Showing detail");
        match self.cached(movie_id) {
            Some(detail) => self.render(detail),
            None => match self.model.get_movie_detail(movie_id).await {
                Ok(detail) => self.render(detail),
                Err(error) => self.render_error(&error),
            },
        }
        self.modal.open();
    }

    fn cached(&self, movie_id: MovieId) -> Option<MovieDetail> {
        match self.ratings.find(movie_id) {
            Ok(found) => found,
            Err(error) => {
                warn!(movie_id, %error, "Reading ratings failed, fetching instead");
                None
            }
        }
    }

    fn render(&self, detail: MovieDetail) {
        if self.displayed.get() == Some(detail.movie_id) {
            debug!(movie_id = detail.movie_id, "Already displayed");
            return;
        }
        self.displayed.set(Some(detail.movie_id));
        self.render_template(&detail);
        info!(movie_id = detail.movie_id, title = %detail.title, "Rendered detail");
        self.detail.replace(Some(detail));
    }

    fn render_template(&self, detail: &MovieDetail) {
        self.root.clear_children();
        let score = detail.star_score();

        let header = Element::new("div")
            .with_class("header-container")
            .with_child(
                Element::new("p")
                    .with_class("movie-title")
                    .with_text(detail.title.clone()),
            )
            .with_child(Element::new("button").with_class("close-button"));

        let poster = Element::new("img")
            .with_class("skeleton")
            .with_attr(
                "src",
                detail
                    .poster_path
                    .as_ref()
                    .map(|path| format!("{IMAGE_BASE_URL}{path}"))
                    .unwrap_or_else(|| NO_IMAGE.to_string()),
            )
            .with_attr("alt", detail.title.clone());

        let stars = Element::new("div").with_class("star-box");
        for value in StarScore::RATINGS {
            let label = Element::new("label")
                .with_class("star")
                .with_attr("data-value", value.to_string());
            if value == score.value() {
                label.add_class("star-active");
            }
            stars.append_child(&label);
        }

        let info = Element::new("div")
            .with_class("content-info-container")
            .with_child(
                Element::new("div")
                    .with_class("genre-vote-rate-container")
                    .with_child(
                        Element::new("p")
                            .with_class("genres")
                            .with_text(detail.genre_names()),
                    )
                    .with_child(
                        Element::new("p")
                            .with_class("vote-average")
                            .with_text(format!("{:.1}", detail.vote_average)),
                    ),
            )
            .with_child(
                Element::new("p").with_class("overview").with_text(
                    detail
                        .overview
                        .clone()
                        .unwrap_or_else(|| NO_OVERVIEW.to_string()),
                ),
            )
            .with_child(
                Element::new("div")
                    .with_class("vote-container")
                    .with_child(
                        Element::new("span")
                            .with_class("star-title")
                            .with_text("My rating"),
                    )
                    .with_child(stars)
                    .with_child(
                        Element::new("span")
                            .with_class("star-description")
                            .with_child(
                                Element::new("span")
                                    .with_class("star-score")
                                    .with_text(score_text(score)),
                            )
                            .with_child(
                                Element::new("span")
                                    .with_class("description")
                                    .with_text(score.description()),
                            ),
                    ),
            );

        self.root.append_child(&header);
        self.root.append_child(
            &Element::new("div")
                .with_class("content-container")
                .with_child(poster)
                .with_child(info),
        );
    }

    fn render_error(&self, error: &ApiError) {
        warn!(%error, "Detail could not be loaded");
        self.displayed.set(None);
        self.detail.replace(None);
        self.root.clear_children();
        self.root.append_child(
            &Element::new("div")
                .with_class("header-container")
                .with_child(Element::new("button").with_class("close-button")),
        );
        if let Err(render_error) =
            mount::<ErrorContainer>(&self.root, format!("Could not load this movie: {error}"))
        {
            warn!(%render_error, "Rendering error container failed");
        }

        if error.is_credential_error() {
            let published = self.broker.publish(MovieEvent::CredentialError {
                message: error.to_string(),
            });
            if let Err(publish_error) = published {
                warn!(%publish_error, "Credential error was not fully delivered");
            }
        }
    }

    fn rate(&self, score: StarScore) {
        let Some(detail) = self.detail.borrow_mut().as_mut().map(|detail| {
            detail.set_star_score(score);
            detail.clone()
        }) else {
            return;
        };

        for label in self.root.query_all("label.star") {
            if label.attr("data-value") == Some(score.value().to_string()) {
                label.add_class("star-active");
            } else {
                label.remove_class("star-active");
            }
        }
        if let Some(text) = self.root.query(".star-score") {
            text.set_text(score_text(score));
        }
        if let Some(text) = self.root.query(".star-description .description") {
            text.set_text(score.description());
        }

        if let Err(error) = self.ratings.upsert(&detail) {
            warn!(movie_id = detail.movie_id, %error, "Saving rating failed");
            self.toasts.show("Your rating could not be saved.");
        }
    }
}

fn score_text(score: StarScore) -> String {
    if score.is_rated() {
        format!("{score} points")
    } else {
        String::new()
    }
}
