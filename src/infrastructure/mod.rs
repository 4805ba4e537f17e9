//! Infrastructure layer - execution against the database

pub mod database;

pub use database::{paginate_entity, paginate_entity_with, AsPagination};
