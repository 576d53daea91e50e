//! # Views
//!
//! Every view is a [`Component`](view_framework::Component) rendered into the
//! headless element tree.
//!
//! | View | Root element |
//! |------|--------------|
//! | [`SearchForm`] | `form#search-form` |
//! | [`MovieReviewBody`] | `section#movie-review-section` |
//! | [`MovieList`] | `ul.item-list` |
//! | [`Modal`] | `dialog#movie-detail-modal` |
//! | [`MovieDetailView`] | `div.movie-detail-container` (inside the modal body) |
//! | [`ErrorModal`] | `dialog#error-modal` |
//! | [`ToastHost`] | `div#toast-container` |
//! | [`ErrorContainer`] | `div.error-container` |
//!
//! Views share state only through props (API, store, broker, toast host and
//! the error modal's page gate).
//! The listing and the detail never reference each other; they meet on the
//! broker.

pub mod error_surface;
pub mod modal;
pub mod movie_detail;
pub mod movie_list;
pub mod movie_review_body;
pub mod search_form;

pub use error_surface::{ErrorContainer, ErrorModal, PageGate, ToastHost};
pub use modal::Modal;
pub use movie_detail::{MovieDetailProps, MovieDetailView};
pub use movie_list::{movie_card, MovieCardSkeleton, MovieList, MovieListProps};
pub use movie_review_body::{MovieReviewBody, MovieReviewBodyProps};
pub use search_form::{SearchForm, SearchFormProps};
