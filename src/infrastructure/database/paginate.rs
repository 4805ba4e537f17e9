//! SeaORM execution of page-number paged queries
//!
//! Every call runs validate → count → slice → (transform) → assemble, in that
//! order. The count is taken on the same filtered query the slice is drawn
//! from. Count and slice run one after the other, so a concurrent writer can
//! still make the total disagree with the slice.

use std::future::Future;

use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Select,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::domain::{PageQuery, Transform};
use crate::shared::{validate_inputs, Pagination, PaginationAuto, PaginationError, PaginationResult};

/// Page-number pagination over a SeaORM query.
///
/// ```ignore
/// use orm_pagination::{AsPagination, PageQuery, Transform};
///
/// let page = article::Entity::find()
///     .as_pagination(
///         &db,
///         2,
///         10,
///         PageQuery::new()
///             .filter(article::Column::Published.eq(true))
///             .order_by_desc(article::Column::CreatedAt),
///     )
///     .await?;
///
/// let titles = article::Entity::find()
///     .as_pagination_with(
///         &db,
///         1,
///         10,
///         PageQuery::new(),
///         Transform::map(|a: article::Model| a.title),
///     )
///     .await?;
/// ```
#[async_trait]
pub trait AsPagination<E: EntityTrait>: Sized {
    async fn as_pagination<C>(
        self,
        db: &C,
        page: u64,
        limit: u64,
        query: PageQuery<E>,
    ) -> PaginationResult<Pagination<E::Model>>
    where
        C: ConnectionTrait;

    /// Same as [`AsPagination::as_pagination`], converting every item of the
    /// page with `transform`. Either the whole page converts or the call fails.
    async fn as_pagination_with<C, D>(
        self,
        db: &C,
        page: u64,
        limit: u64,
        query: PageQuery<E>,
        transform: Transform<E::Model, D>,
    ) -> PaginationResult<PaginationAuto<E::Model, D>>
    where
        C: ConnectionTrait,
        D: Send + 'static;
}

#[async_trait]
impl<E> AsPagination<E> for Select<E>
where
    E: EntityTrait,
    E::Model: Sync,
{
    async fn as_pagination<C>(
        self,
        db: &C,
        page: u64,
        limit: u64,
        query: PageQuery<E>,
    ) -> PaginationResult<Pagination<E::Model>>
    where
        C: ConnectionTrait,
    {
        let (items, total_items) = fetch_page(self, db, page, limit, query).await?;
        let result = Pagination::new(items, total_items, page, limit);
        debug!(
            "Page {}/{} of {}: {} items, {} total",
            page,
            result.total_pages(),
            E::default().table_name(),
            result.items().len(),
            total_items
        );
        Ok(result)
    }

    async fn as_pagination_with<C, D>(
        self,
        db: &C,
        page: u64,
        limit: u64,
        query: PageQuery<E>,
        transform: Transform<E::Model, D>,
    ) -> PaginationResult<PaginationAuto<E::Model, D>>
    where
        C: ConnectionTrait,
        D: Send + 'static,
    {
        let (items, total_items) = fetch_page(self, db, page, limit, query).await?;
        let deferred = transform.is_deferred();
        let result = PaginationAuto::from_transform(items, total_items, transform, page, limit)
            .await
            .inspect_err(|e| {
                warn!(
                    "Transform of {} page {} failed: {}",
                    E::default().table_name(),
                    page,
                    e
                )
            })?;
        debug!(
            "Page {}/{} of {} (mapped, deferred={}): {} items, {} total",
            page,
            result.total_pages(),
            E::default().table_name(),
            deferred,
            result.items().len(),
            total_items
        );
        Ok(result)
    }
}

/// Pages over every row of `E`.
pub async fn paginate_entity<E, C>(
    db: &C,
    page: u64,
    limit: u64,
    query: PageQuery<E>,
) -> PaginationResult<Pagination<E::Model>>
where
    E: EntityTrait,
    E::Model: Sync,
    C: ConnectionTrait,
{
    E::find().as_pagination(db, page, limit, query).await
}

/// Pages over every row of `E`, converting each item with `transform`.
pub async fn paginate_entity_with<E, C, D>(
    db: &C,
    page: u64,
    limit: u64,
    query: PageQuery<E>,
    transform: Transform<E::Model, D>,
) -> PaginationResult<PaginationAuto<E::Model, D>>
where
    E: EntityTrait,
    E::Model: Sync,
    C: ConnectionTrait,
    D: Send + 'static,
{
    E::find()
        .as_pagination_with(db, page, limit, query, transform)
        .await
}

/// Validates the request, then counts and fetches one slice. Returns the
/// slice and the total number of matching rows.
async fn fetch_page<E, C>(
    select: Select<E>,
    db: &C,
    page: u64,
    limit: u64,
    query: PageQuery<E>,
) -> PaginationResult<(Vec<E::Model>, u64)>
where
    E: EntityTrait,
    E::Model: Sync,
    C: ConnectionTrait,
{
    let entity_def = E::default();
    let entity = entity_def.table_name();
    validate_inputs(page, limit)
        .inspect_err(|e| warn!("Rejected page request for {}: {}", entity, e))?;

    let (filter, sort, cancel) = query.into_parts();
    // Unknown column names must fail before anything is sent to the database.
    let order = sort
        .as_ref()
        .map(|s| s.resolve())
        .transpose()
        .inspect_err(|e| warn!("Rejected page request for {}: {}", entity, e))?;

    let (offset, limit) = slice_bounds(page, limit)
        .inspect_err(|e| warn!("Rejected page request for {}: {}", entity, e))?;

    debug!(
        "Paging {}: page={} limit={} filtered={} sorted={}",
        entity,
        page,
        limit,
        filter.is_some(),
        order.is_some()
    );

    let mut select = select;
    if let Some(filter) = filter {
        select = select.filter(filter);
    }

    let total_items = run_cancellable(cancel.as_ref(), select.clone().count(db)).await?;

    if let Some((column, order)) = order {
        select = select.order_by(column, order);
    }
    let slice = select.offset(offset).limit(limit);
    let items = run_cancellable(cancel.as_ref(), slice.all(db)).await?;

    Ok((items, total_items))
}

/// Offset and limit of the requested slice. Both are bound as signed 64-bit
/// integers, so anything past `i64::MAX` is rejected before a query runs.
fn slice_bounds(page: u64, limit: u64) -> PaginationResult<(u64, u64)> {
    let out_of_range = || {
        PaginationError::InvalidArgument(format!(
            "page {} with limit {} is out of range",
            page, limit
        ))
    };
    let offset = (page - 1).checked_mul(limit).ok_or_else(out_of_range)?;
    let offset = i64::try_from(offset).map_err(|_| out_of_range())?;
    let limit = i64::try_from(limit).map_err(|_| out_of_range())?;
    Ok((offset as u64, limit as u64))
}

/// Awaits a database future, failing with [`PaginationError::Cancelled`] as
/// soon as `cancel` fires. An already cancelled token wins over the query.
async fn run_cancellable<T, F>(cancel: Option<&CancellationToken>, fut: F) -> PaginationResult<T>
where
    F: Future<Output = Result<T, DbErr>>,
{
    let Some(token) = cancel else {
        return fut.await.map_err(PaginationError::from);
    };
    tokio::select! {
        biased;
        _ = token.cancelled() => {
            warn!("Paged query cancelled");
            Err(PaginationError::Cancelled)
        }
        res = fut => res.map_err(PaginationError::from),
    }
}
