use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::shared::{PaginationError, PaginationResult};

/// Rejects a page request before any query runs.
///
/// `page` is checked before `limit`, so a request where both are invalid
/// always reports the page.
pub fn validate_inputs(page: u64, limit: u64) -> PaginationResult<()> {
    if page < 1 {
        return Err(PaginationError::InvalidArgument(format!(
            "page must be at least 1, got {}",
            page
        )));
    }
    if limit < 1 {
        return Err(PaginationError::InvalidArgument(format!(
            "limit must be at least 1, got {}",
            limit
        )));
    }
    Ok(())
}

/// Paging query parameters as received by an HTTP layer.
///
/// Both values are required; there is no default page and no cap on the
/// page size.
#[derive(Debug, Clone, Copy, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page number (1-based)
    #[validate(range(min = 1))]
    pub page: u64,
    /// Items per page
    #[validate(range(min = 1))]
    pub limit: u64,
}

impl PageParams {
    pub fn new(page: u64, limit: u64) -> Self {
        Self { page, limit }
    }

    pub fn check(&self) -> PaginationResult<()> {
        validate_inputs(self.page, self.limit)
    }
}
