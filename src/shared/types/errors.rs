use thiserror::Error;

/// Error raised by a caller-supplied item transform.
pub type TransformError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum PaginationError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Query failed: {0}")]
    Query(#[from] sea_orm::DbErr),

    #[error("Paged query was cancelled")]
    Cancelled,

    #[error("Transform failed: {0}")]
    Transform(#[source] TransformError),
}

impl PaginationError {
    /// Whether the failure came from the data source rather than from the
    /// request or the item transform. Cancellation counts as a data source
    /// failure because it interrupts a pending query.
    pub fn is_query_failure(&self) -> bool {
        matches!(self, PaginationError::Query(_) | PaginationError::Cancelled)
    }
}

pub type PaginationResult<T> = Result<T, PaginationError>;
