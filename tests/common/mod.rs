#![allow(dead_code)]

use movie_review::clients::MockMovieApi;
use movie_review::events::MovieBroker;
use movie_review::lifecycle::MovieReviewApp;
use movie_review::model::{Genre, MovieDetail, MovieId, MovieListResponse, MovieSummary};
use std::rc::Rc;
use view_framework::{Element, MemoryStore};

/// Selector for rendered (non-skeleton) movie cards.
pub const CARDS: &str = "#movie-list-container li.item-card[data-movie-id]";

/// A page of `count` movies with ids `first_id..first_id + count`.
pub fn movie_page(
    page: u32,
    total_pages: u32,
    first_id: MovieId,
    count: usize,
) -> MovieListResponse {
    MovieListResponse {
        page,
        results: (0..count as u64)
            .map(|i| {
                let id = first_id + i;
                let mut movie = MovieSummary::new(id, format!("Movie {id}"));
                movie.vote_average = 7.25;
                movie
            })
            .collect(),
        total_pages,
        total_results: total_pages * 20,
    }
}

pub fn dune() -> MovieDetail {
    let mut detail = MovieDetail::new(42, "Dune");
    detail.overview = Some("A noble family becomes embroiled in a war.".into());
    detail.genres = vec![
        Genre { id: 878, name: "Science Fiction".into() },
        Genre { id: 12, name: "Adventure".into() },
    ];
    detail.poster_path = Some("/dune.jpg".into());
    detail.vote_average = 7.84;
    detail
}

pub fn card_ids(doc: &Element) -> Vec<MovieId> {
    doc.query_all(CARDS)
        .iter()
        .filter_map(|card| card.attr("data-movie-id"))
        .filter_map(|id| id.parse().ok())
        .collect()
}

pub struct Harness {
    pub doc: Element,
    pub mock: MockMovieApi,
    pub store: Rc<MemoryStore>,
    pub broker: MovieBroker,
    pub app: MovieReviewApp,
}

/// Mounts the app on a fresh document. The popular page 1 expectation must
/// already be scripted on `mock`.
pub fn mount_app(mock: MockMovieApi, store: Rc<MemoryStore>) -> Harness {
    let doc = Element::document();
    let broker = MovieBroker::new();
    let app = MovieReviewApp::new(
        &doc,
        Rc::new(mock.clone()),
        store.clone(),
        broker.clone(),
    )
    .expect("app mounts");
    Harness {
        doc,
        mock,
        store,
        broker,
        app,
    }
}
