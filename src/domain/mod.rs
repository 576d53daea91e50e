//! Domain state: the paginated movie model and the durable rating store.

pub mod movie;
pub mod ratings;

pub use movie::MovieModel;
pub use ratings::RatingStore;
