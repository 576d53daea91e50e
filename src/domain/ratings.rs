use crate::constants::RATINGS_KEY;
use crate::model::{MovieDetail, MovieId};
use std::rc::Rc;
use tracing::info;
use view_framework::{Collection, FrameworkError, KeyValueStore};

/// Durable collection of rated movies, stored as one JSON array under
/// [`RATINGS_KEY`]. Movie ids are unique within it.
pub struct RatingStore {
    collection: Collection<MovieDetail, Rc<dyn KeyValueStore>>,
}

impl RatingStore {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self {
            collection: Collection::new(store, RATINGS_KEY),
        }
    }

    pub fn all(&self) -> Result<Vec<MovieDetail>, FrameworkError> {
        self.collection.load()
    }

    pub fn find(&self, movie_id: MovieId) -> Result<Option<MovieDetail>, FrameworkError> {
        Ok(self
            .collection
            .load()?
            .into_iter()
            .find(|detail| detail.movie_id == movie_id))
    }

    /// Inserts `detail`, or replaces the whole record with the same id.
    pub fn upsert(&self, detail: &MovieDetail) -> Result<(), FrameworkError> {
        let mut records = self.collection.load()?;
        match records.iter_mut().find(|r| r.movie_id == detail.movie_id) {
            Some(existing) => *existing = detail.clone(),
            None => records.push(detail.clone()),
        }
        self.collection.save(&records)?;
        info!(
            movie_id = detail.movie_id,
            score = %detail.star_score(),
            size = records.len(),
            "Rated movie"
        );
        Ok(())
    }
}
