//! Collection state: the repository that owns the collection list and the
//! read-only queries derived from it.

pub mod query;
pub mod repository;

pub use repository::{AddOutcome, Repository};
