mod common;

use common::{mount_app, movie_page};
use movie_review::clients::{MockCall, MockMovieApi};
use movie_review::constants::EMPTY_SEARCH_MESSAGE;
use movie_review::events::{CREDENTIAL_ERROR, DETAIL_SELECT};
use movie_review::model::QueryContext;
use movie_review::ReviewError;
use std::rc::Rc;
use tokio::task::LocalSet;
use view_framework::{EventKind, MemoryStore};

fn popular_only() -> MockMovieApi {
    let mock = MockMovieApi::new();
    mock.expect_list(QueryContext::Popular, 1)
        .return_ok(movie_page(1, 5, 100, 20));
    mock
}

#[tokio::test(flavor = "current_thread")]
async fn test_app_mounts_page_layout() {
    LocalSet::new()
        .run_until(async {
            let h = mount_app(popular_only(), Rc::new(MemoryStore::new()));
            h.app.settled().await;

            for selector in [
                "#toast-container",
                "header#app-header form#search-form",
                "main#app-main > section#movie-review-section",
                "dialog#movie-detail-modal .modal-body > .movie-detail-container",
                "dialog#error-modal",
            ] {
                assert!(h.doc.query(selector).is_some(), "missing {selector}");
            }
            assert_eq!(
                h.doc.query("#movie-review-section > h2").unwrap().text(),
                QueryContext::Popular.heading()
            );
            assert!(!h.app.modal().is_open());
            assert_eq!(h.app.current_query(), Some(QueryContext::Popular));

            let html = h.doc.outer_html();
            assert!(html.contains("<main id=\"app-main\">"));
            assert!(html.contains("<dialog id=\"error-modal\">"));
            h.mock.verify();
        })
        .await;
}

#[tokio::test(flavor = "current_thread")]
async fn test_empty_search_shows_toast_without_request() {
    LocalSet::new()
        .run_until(async {
            let h = mount_app(popular_only(), Rc::new(MemoryStore::new()));
            h.app.settled().await;

            h.app.search_form().submit("   ");
            h.app.settled().await;

            assert_eq!(h.app.toasts().messages(), vec![EMPTY_SEARCH_MESSAGE.to_string()]);
            assert_eq!(h.app.current_query(), Some(QueryContext::Popular));
            assert_eq!(h.mock.call_count(), 1);

            let result = h.app.search(QueryContext::Search(" ".into()));
            assert!(matches!(result, Err(ReviewError::EmptySearchTerm)));
            assert_eq!(h.mock.call_count(), 1);
            h.mock.verify();
        })
        .await;
}

#[tokio::test(flavor = "current_thread")]
async fn test_submit_button_reads_input_value() {
    LocalSet::new()
        .run_until(async {
            let query = QueryContext::Search("alien".into());
            let mock = popular_only();
            mock.expect_list(query.clone(), 1)
                .return_ok(movie_page(1, 1, 500, 2));
            let h = mount_app(mock, Rc::new(MemoryStore::new()));
            h.app.settled().await;

            h.doc
                .query("#search-form .search-input")
                .unwrap()
                .set_attr("value", " alien ");
            h.doc.query("#search-form .search-button").unwrap().click();
            h.app.settled().await;

            assert_eq!(h.app.current_query(), Some(query));
            assert_eq!(
                h.mock.calls().last(),
                Some(&MockCall::List {
                    query: QueryContext::Search("alien".into()),
                    page: 1
                })
            );
            h.mock.verify();
        })
        .await;
}

#[tokio::test(flavor = "current_thread")]
async fn test_navigation_clears_toasts() {
    LocalSet::new()
        .run_until(async {
            let mock = popular_only();
            mock.expect_list(QueryContext::Search("heat".into()), 1)
                .return_ok(movie_page(1, 1, 900, 1));
            let h = mount_app(mock, Rc::new(MemoryStore::new()));
            h.app.settled().await;

            h.doc
                .query("#search-form")
                .unwrap()
                .dispatch(EventKind::Submit, Some(String::new()));
            assert_eq!(h.app.toasts().messages().len(), 1);

            h.doc
                .query("#search-form")
                .unwrap()
                .dispatch(EventKind::Submit, Some("heat".into()));
            h.app.settled().await;
            assert!(h.app.toasts().messages().is_empty());
            h.mock.verify();
        })
        .await;
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn test_toasts_expire() {
    LocalSet::new()
        .run_until(async {
            let h = mount_app(popular_only(), Rc::new(MemoryStore::new()));
            h.app.settled().await;

            h.app.search_form().submit("");
            assert_eq!(h.app.toasts().messages().len(), 1);

            tokio::time::sleep(std::time::Duration::from_secs(4)).await;
            assert!(h.app.toasts().messages().is_empty());
        })
        .await;
}

#[tokio::test(flavor = "current_thread")]
async fn test_shutdown_unsubscribes_and_cancels() {
    LocalSet::new()
        .run_until(async {
            let mock = popular_only();
            let h = mount_app(mock, Rc::new(MemoryStore::new()));
            assert_eq!(h.broker.handler_count(DETAIL_SELECT), 1);
            assert_eq!(h.broker.handler_count(CREDENTIAL_ERROR), 1);

            // Page 1 is still in flight
            h.app.shutdown();
            tokio::task::yield_now().await;
            tokio::task::yield_now().await;

            assert_eq!(h.broker.handler_count(DETAIL_SELECT), 0);
            assert_eq!(h.broker.handler_count(CREDENTIAL_ERROR), 0);
            assert!(h.doc.query("#movie-review-section").is_none());
            assert!(h.doc.query("#error-modal").is_none());
            assert!(h.doc.query("li.item-card").is_none());
        })
        .await;
}
