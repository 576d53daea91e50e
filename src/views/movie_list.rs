//! Cards of one fetched page, and the skeleton shown while it loads.

use crate::constants::{IMAGE_BASE_URL, NO_IMAGE};
use crate::events::{MovieBroker, MovieEvent};
use crate::model::{MovieId, MovieSummary};
use tracing::{debug, warn};
use view_framework::{Component, Element, EventKind, FrameworkError};

pub struct MovieListProps {
    pub movies: Vec<MovieSummary>,
    pub broker: MovieBroker,
}

/// A `ul.item-list` of movie cards.
///
/// A click anywhere on a card publishes [`MovieEvent::DetailSelect`]; the
/// list does not know who listens.
pub struct MovieList {
    props: MovieListProps,
    root: Element,
}

impl Component for MovieList {
    type Props = MovieListProps;

    fn create(props: MovieListProps) -> Self {
        Self {
            props,
            root: Element::new("ul").with_class("item-list"),
        }
    }

    fn root(&self) -> &Element {
        &self.root
    }

    fn render(&mut self) -> Result<(), FrameworkError> {
        for movie in &self.props.movies {
            self.root.append_child(&movie_card(movie));
        }
        Ok(())
    }

    fn set_event(&mut self) {
        let broker = self.props.broker.clone();
        self.root.add_listener(EventKind::Click, move |event| {
            let Some(movie_id) = event
                .target
                .closest("li.item-card")
                .and_then(|card| card.attr("data-movie-id"))
                .and_then(|id| id.parse::<MovieId>().ok())
            else {
                return;
            };
            debug!(movie_id, "Card selected");
            if let Err(error) = broker.publish(MovieEvent::DetailSelect { movie_id }) {
                warn!(movie_id, %error, "Detail selection was not fully delivered");
            }
        });
    }
}

/// One `li.item-card` for `movie`.
pub fn movie_card(movie: &MovieSummary) -> Element {
    let src = movie
        .poster_path
        .as_ref()
        .map(|path| format!("{IMAGE_BASE_URL}{path}"))
        .unwrap_or_else(|| NO_IMAGE.to_string());

    Element::new("li")
        .with_class("item-card")
        .with_attr("data-movie-id", movie.id.to_string())
        .with_child(
            Element::new("img")
                .with_class("item-thumbnail")
                .with_attr("src", src)
                .with_attr("alt", movie.title.clone()),
        )
        .with_child(
            Element::new("p")
                .with_class("item-title")
                .with_text(movie.title.clone()),
        )
        .with_child(
            Element::new("p")
                .with_class("item-score")
                .with_text(format!("{:.1}", movie.vote_average)),
        )
}

/// Placeholder cards shown while a page loads.
pub struct MovieCardSkeleton;

impl MovieCardSkeleton {
    /// A `ul.item-list.skeleton-list` with `count` empty cards.
    pub fn list(count: usize) -> Element {
        let list = Element::new("ul").with_class("item-list skeleton-list");
        for _ in 0..count {
            list.append_child(
                &Element::new("li")
                    .with_class("item-card skeleton")
                    .with_child(Element::new("div").with_class("item-thumbnail skeleton"))
                    .with_child(Element::new("div").with_class("item-title skeleton"))
                    .with_child(Element::new("div").with_class("item-score skeleton")),
            );
        }
        list
    }
}
