//! # ORM pagination
//!
//! Page-number pagination for SeaORM queries: count the matching rows, fetch
//! one slice, optionally convert each row, and return the slice together with
//! its page metadata.
//!
//! ## Architecture
//!
//! - **shared**: Result envelopes, errors and input validation
//! - **domain**: Page query options (filter, sort, cancellation) and item transforms
//! - **infrastructure**: Execution of paged queries through SeaORM
//! - **config**: Database connection configuration

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use config::{init_database, DatabaseConfig};

pub use domain::{PageQuery, Sort, SortKey, Transform};
pub use infrastructure::{paginate_entity, paginate_entity_with, AsPagination};
pub use shared::{
    validate_inputs, PageParams, Pagination, PaginationAuto, PaginationError, PaginationResult,
    TransformError,
};
