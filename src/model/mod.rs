//! Pure data structures shared by the API boundary, the domain model and the views.

pub mod movie;
pub mod page;

pub use movie::*;
pub use page::*;
