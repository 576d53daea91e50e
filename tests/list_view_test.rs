mod common;

use common::{card_ids, mount_app, movie_page, CARDS};
use movie_review::clients::{ApiError, MockCall, MockMovieApi};
use movie_review::constants::SKELETON_COUNT;
use movie_review::model::{MovieListResponse, QueryContext};
use movie_review::ReviewError;
use std::rc::Rc;
use tokio::task::LocalSet;
use view_framework::MemoryStore;

#[tokio::test(flavor = "current_thread")]
async fn test_popular_page_then_load_more_appends_in_fetch_order() {
    LocalSet::new()
        .run_until(async {
            let mock = MockMovieApi::new();
            mock.expect_list(QueryContext::Popular, 1)
                .return_ok(movie_page(1, 10, 100, 20));
            mock.expect_list(QueryContext::Popular, 2)
                .return_ok(movie_page(2, 10, 200, 20));
            let h = mount_app(mock, Rc::new(MemoryStore::new()));

            // Skeleton is visible before the first page resolves
            assert_eq!(h.doc.query_all("li.item-card.skeleton").len(), SKELETON_COUNT);
            h.app.settled().await;
            assert!(h.doc.query(".skeleton-list").is_none());
            assert_eq!(h.doc.query_all(CARDS).len(), 20);

            assert!(h.app.load_more());
            h.app.settled().await;

            let ids = card_ids(&h.doc);
            let expected: Vec<u64> = (100..120).chain(200..220).collect();
            assert_eq!(ids, expected);
            assert_eq!(h.doc.query_all("#movie-list-container > ul.item-list").len(), 2);
            assert!(h.doc.query("#more-button").is_some());
            h.mock.verify();
        })
        .await;
}

#[tokio::test(flavor = "current_thread")]
async fn test_more_button_click_loads_next_page() {
    LocalSet::new()
        .run_until(async {
            let mock = MockMovieApi::new();
            mock.expect_list(QueryContext::Popular, 1)
                .return_ok(movie_page(1, 3, 100, 20));
            mock.expect_list(QueryContext::Popular, 2)
                .return_ok(movie_page(2, 3, 200, 20));
            let h = mount_app(mock, Rc::new(MemoryStore::new()));
            h.app.settled().await;

            h.doc.query("#more-button").unwrap().click();
            h.app.settled().await;
            assert_eq!(h.doc.query_all(CARDS).len(), 40);
            h.mock.verify();
        })
        .await;
}

#[tokio::test(flavor = "current_thread")]
async fn test_short_page_removes_more_button() {
    LocalSet::new()
        .run_until(async {
            let mock = MockMovieApi::new();
            mock.expect_list(QueryContext::Popular, 1)
                .return_ok(movie_page(1, 1, 100, 7));
            let h = mount_app(mock, Rc::new(MemoryStore::new()));
            h.app.settled().await;

            assert_eq!(h.doc.query_all(CARDS).len(), 7);
            assert!(h.doc.query("#more-button").is_none());
            // Further loads are no-ops, no request is made
            assert!(!h.app.load_more());
            h.app.settled().await;
            assert_eq!(h.mock.call_count(), 1);
            h.mock.verify();
        })
        .await;
}

#[tokio::test(flavor = "current_thread")]
async fn test_last_page_removes_more_button() {
    LocalSet::new()
        .run_until(async {
            let mock = MockMovieApi::new();
            mock.expect_list(QueryContext::Popular, 1)
                .return_ok(movie_page(1, 2, 100, 20));
            mock.expect_list(QueryContext::Popular, 2)
                .return_ok(movie_page(2, 2, 200, 20));
            let h = mount_app(mock, Rc::new(MemoryStore::new()));
            h.app.settled().await;
            assert!(h.doc.query("#more-button").is_some());

            h.app.load_more();
            h.app.settled().await;
            assert!(h.doc.query("#more-button").is_none());
            h.mock.verify();
        })
        .await;
}

#[tokio::test(flavor = "current_thread")]
async fn test_zero_results_search_is_idempotent() {
    LocalSet::new()
        .run_until(async {
            let query = QueryContext::Search("no-such-movie-xyz".into());
            let mock = MockMovieApi::new();
            mock.expect_list(QueryContext::Popular, 1)
                .return_ok(movie_page(1, 10, 100, 20));
            mock.expect_list(query.clone(), 1)
                .return_ok(MovieListResponse::empty());
            mock.expect_list(query.clone(), 1)
                .return_ok(MovieListResponse::empty());
            let h = mount_app(mock, Rc::new(MemoryStore::new()));
            h.app.settled().await;

            for _ in 0..2 {
                h.app.search(query.clone()).unwrap();
                h.app.settled().await;

                assert_eq!(h.doc.query_all("#movie-list-container > img.no-result-image").len(), 1);
                assert!(h.doc.query("#more-button").is_none());
                assert!(h.doc.query_all(CARDS).is_empty());
                assert_eq!(h.doc.query_all("#movie-review-section").len(), 1);
                assert_eq!(
                    h.doc.query("#movie-review-section > h2").unwrap().text(),
                    "Results for \"no-such-movie-xyz\""
                );
            }
            h.mock.verify();
        })
        .await;
}

#[tokio::test(flavor = "current_thread")]
async fn test_load_more_is_ignored_while_fetch_in_flight() {
    LocalSet::new()
        .run_until(async {
            let mock = MockMovieApi::new();
            mock.expect_list(QueryContext::Popular, 1)
                .return_ok(movie_page(1, 10, 100, 20));
            let h = mount_app(mock, Rc::new(MemoryStore::new()));

            // Page 1 has not resolved yet
            assert!(!h.app.load_more());
            h.doc.query("#more-button").unwrap().click();
            h.app.settled().await;

            assert_eq!(h.doc.query_all(CARDS).len(), 20);
            assert_eq!(
                h.mock.calls(),
                vec![MockCall::List { query: QueryContext::Popular, page: 1 }]
            );
            h.mock.verify();
        })
        .await;
}

#[tokio::test(flavor = "current_thread")]
async fn test_failed_load_shows_toast_and_retries_same_page() {
    LocalSet::new()
        .run_until(async {
            let mock = MockMovieApi::new();
            mock.expect_list(QueryContext::Popular, 1)
                .return_ok(movie_page(1, 10, 100, 20));
            mock.expect_list(QueryContext::Popular, 2)
                .return_err(ApiError::Network("connection reset".into()));
            mock.expect_list(QueryContext::Popular, 2)
                .return_ok(movie_page(2, 10, 200, 20));
            let h = mount_app(mock, Rc::new(MemoryStore::new()));
            h.app.settled().await;

            assert!(h.app.load_more());
            h.app.settled().await;
            assert!(h.doc.query(".skeleton-list").is_none());
            assert_eq!(h.doc.query_all(CARDS).len(), 20);
            let toasts = h.app.toasts().messages();
            assert_eq!(toasts.len(), 1);
            assert!(toasts[0].contains("connection reset"));
            assert!(!h.app.error_modal().is_open());

            assert!(h.app.load_more());
            h.app.settled().await;
            assert_eq!(h.doc.query_all(CARDS).len(), 40);
            h.mock.verify();
        })
        .await;
}

#[tokio::test(flavor = "current_thread")]
async fn test_credential_error_opens_error_modal() {
    LocalSet::new()
        .run_until(async {
            let mock = MockMovieApi::new();
            mock.expect_list(QueryContext::Popular, 1)
                .return_err(ApiError::Credential { status: 401 });
            let h = mount_app(mock, Rc::new(MemoryStore::new()));
            h.app.settled().await;

            assert!(h.app.error_modal().is_open());
            assert!(h.app.error_modal().message().contains("401"));
            assert!(h.app.toasts().messages().is_empty());

            h.doc.query("#error-modal button.error-modal-confirm").unwrap().click();
            assert!(!h.app.error_modal().is_open());
            h.mock.verify();
        })
        .await;
}

#[tokio::test(flavor = "current_thread")]
async fn test_error_modal_blocks_page_until_confirmed() {
    LocalSet::new()
        .run_until(async {
            let mock = MockMovieApi::new();
            mock.expect_list(QueryContext::Popular, 1)
                .return_err(ApiError::Credential { status: 401 });
            mock.expect_list(QueryContext::Popular, 1)
                .return_ok(movie_page(1, 10, 100, 20));
            let h = mount_app(mock, Rc::new(MemoryStore::new()));
            h.app.settled().await;
            assert!(h.app.error_modal().is_open());

            h.doc.query("#more-button").unwrap().click();
            assert!(!h.app.load_more());
            assert!(matches!(h.app.select_movie(100), Err(ReviewError::PageBlocked)));
            assert!(matches!(
                h.app.search(QueryContext::Search("heat".into())),
                Err(ReviewError::PageBlocked)
            ));
            h.app.search_form().submit("heat");
            h.app.settled().await;

            assert!(h.doc.query_all(CARDS).is_empty());
            assert_eq!(h.mock.call_count(), 1);
            assert_eq!(h.app.current_query(), Some(QueryContext::Popular));

            // Acknowledging unblocks, and the failed page is asked for again
            h.doc.query("#error-modal button.error-modal-confirm").unwrap().click();
            h.doc.query("#more-button").unwrap().click();
            h.app.settled().await;
            assert_eq!(h.doc.query_all(CARDS).len(), 20);
            h.mock.verify();
        })
        .await;
}

#[tokio::test(flavor = "current_thread")]
async fn test_search_replaces_listing_and_starts_at_page_one() {
    LocalSet::new()
        .run_until(async {
            let query = QueryContext::Search("heat".into());
            let mock = MockMovieApi::new();
            mock.expect_list(QueryContext::Popular, 1)
                .return_ok(movie_page(1, 10, 100, 20));
            mock.expect_list(QueryContext::Popular, 2)
                .return_ok(movie_page(2, 10, 200, 20));
            mock.expect_list(query.clone(), 1)
                .return_ok(movie_page(1, 1, 900, 3));
            let h = mount_app(mock, Rc::new(MemoryStore::new()));
            h.app.settled().await;
            h.app.load_more();
            h.app.settled().await;

            h.app.search_form().submit("  heat ");
            h.app.settled().await;

            assert_eq!(card_ids(&h.doc), vec![900, 901, 902]);
            assert_eq!(h.app.current_query(), Some(query));
            h.mock.verify();
        })
        .await;
}
