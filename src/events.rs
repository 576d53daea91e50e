//! Application events carried by the broker.
//!
//! The list view and the detail view never hold references to each other.
//! A card click publishes [`MovieEvent::DetailSelect`]; the detail view is
//! subscribed to [`DETAIL_SELECT`]. Credential failures travel the same way
//! to the page-level error modal.

use crate::model::MovieId;
use view_framework::{BrokerEvent, EventBroker, EventType};

pub const DETAIL_SELECT: EventType = "detailMovieEvent";
pub const CREDENTIAL_ERROR: EventType = "credentialErrorEvent";

#[derive(Debug, Clone, PartialEq)]
pub enum MovieEvent {
    /// The user picked a movie in a listing.
    DetailSelect { movie_id: MovieId },
    /// A request was rejected because of the API key.
    CredentialError { message: String },
}

impl BrokerEvent for MovieEvent {
    fn event_type(&self) -> EventType {
        match self {
            MovieEvent::DetailSelect { .. } => DETAIL_SELECT,
            MovieEvent::CredentialError { .. } => CREDENTIAL_ERROR,
        }
    }
}

pub type MovieBroker = EventBroker<MovieEvent>;

thread_local! {
    static GLOBAL_BROKER: MovieBroker = MovieBroker::new();
}

/// The broker shared by everything on the current thread.
///
/// Tests should build their own [`MovieBroker`] instead.
pub fn global_broker() -> MovieBroker {
    GLOBAL_BROKER.with(MovieBroker::clone)
}
