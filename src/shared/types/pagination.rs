use std::marker::PhantomData;
use std::ops::Deref;

use serde::Serialize;
use utoipa::ToSchema;

use super::errors::{PaginationError, PaginationResult};
use crate::domain::Transform;

/// One page of items plus the metadata describing where it sits in the
/// full result set.
///
/// The derived fields (`total_pages`, `has_previous`, `has_next`) are
/// computed once in [`Pagination::new`] and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination<T> {
    /// Items on the current page, at most `page_size` of them
    items: Vec<T>,
    /// Number of records matching the filter, ignoring paging
    total_items: u64,
    /// Current page (1-based)
    current_page: u64,
    /// Requested page size
    page_size: u64,
    /// `ceil(total_items / page_size)`
    total_pages: u64,
    has_previous: bool,
    has_next: bool,
}

impl<T> Pagination<T> {
    pub fn new(items: Vec<T>, total_items: u64, page: u64, limit: u64) -> Self {
        let total_pages = total_pages(total_items, limit);
        Self {
            items,
            total_items,
            current_page: page,
            page_size: limit,
            total_pages,
            has_previous: page > 1,
            has_next: page < total_pages,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.has_previous
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

fn total_pages(total_items: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 0;
    }
    total_items.div_ceil(limit)
}

/// A page whose items were converted from `S` to `D` while the envelope was
/// built. Reads and serializes exactly like `Pagination<D>`.
#[derive(Serialize)]
#[serde(transparent, bound(serialize = "D: Serialize"))]
pub struct PaginationAuto<S, D> {
    page: Pagination<D>,
    #[serde(skip)]
    _source: PhantomData<fn(S) -> D>,
}

impl<S, D> PaginationAuto<S, D> {
    pub fn new<F>(items: Vec<S>, total_items: u64, convert: F, page: u64, limit: u64) -> Self
    where
        F: FnMut(S) -> D,
    {
        let items = items.into_iter().map(convert).collect();
        Self::wrap(Pagination::new(items, total_items, page, limit))
    }

    /// Like [`PaginationAuto::new`] but with a fallible conversion. The first
    /// failing item aborts the whole page.
    pub fn try_new<F, E>(
        items: Vec<S>,
        total_items: u64,
        convert: F,
        page: u64,
        limit: u64,
    ) -> Result<Self, E>
    where
        F: FnMut(S) -> Result<D, E>,
    {
        let items = items.into_iter().map(convert).collect::<Result<Vec<_>, E>>()?;
        Ok(Self::wrap(Pagination::new(items, total_items, page, limit)))
    }

    /// Builds the page from a [`Transform`], awaiting a deferred transform
    /// once before any item is converted.
    pub async fn from_transform(
        items: Vec<S>,
        total_items: u64,
        transform: Transform<S, D>,
        page: u64,
        limit: u64,
    ) -> PaginationResult<Self> {
        let convert = transform.resolve().await?;
        Self::try_new(items, total_items, |item| convert(item), page, limit)
            .map_err(PaginationError::Transform)
    }

    pub fn into_pagination(self) -> Pagination<D> {
        self.page
    }

    fn wrap(page: Pagination<D>) -> Self {
        Self {
            page,
            _source: PhantomData,
        }
    }
}

// Hand-written so that only `D` needs the trait; `S` never appears in a value.
impl<S, D: std::fmt::Debug> std::fmt::Debug for PaginationAuto<S, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PaginationAuto").field(&self.page).finish()
    }
}

impl<S, D: Clone> Clone for PaginationAuto<S, D> {
    fn clone(&self) -> Self {
        Self::wrap(self.page.clone())
    }
}

impl<S, D: PartialEq> PartialEq for PaginationAuto<S, D> {
    fn eq(&self, other: &Self) -> bool {
        self.page == other.page
    }
}

impl<S, D: Eq> Eq for PaginationAuto<S, D> {}

impl<S, D> Deref for PaginationAuto<S, D> {
    type Target = Pagination<D>;

    fn deref(&self) -> &Self::Target {
        &self.page
    }
}

impl<S, D> From<PaginationAuto<S, D>> for Pagination<D> {
    fn from(auto: PaginationAuto<S, D>) -> Self {
        auto.into_pagination()
    }
}
