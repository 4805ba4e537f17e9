//! Item transforms applied while a page envelope is built

use std::future::Future;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::shared::{PaginationError, PaginationResult, TransformError};

/// Per-item conversion, resolved and ready to apply.
pub type ItemFn<S, D> = Box<dyn Fn(S) -> Result<D, TransformError> + Send + Sync>;

/// Conversion applied to every item of a page.
///
/// Either available immediately, or produced by an asynchronous operation
/// that is awaited once per paged call, regardless of how many items the
/// page holds.
pub enum Transform<S, D> {
    Ready(ItemFn<S, D>),
    Deferred(BoxFuture<'static, Result<ItemFn<S, D>, TransformError>>),
}

impl<S, D> Transform<S, D>
where
    S: 'static,
    D: 'static,
{
    pub fn map<F>(f: F) -> Self
    where
        F: Fn(S) -> D + Send + Sync + 'static,
    {
        Transform::Ready(Box::new(move |item: S| Ok(f(item))))
    }

    pub fn try_map<F, E>(f: F) -> Self
    where
        F: Fn(S) -> Result<D, E> + Send + Sync + 'static,
        E: Into<TransformError>,
    {
        Transform::Ready(Box::new(move |item: S| {
            f(item).map_err(Into::<TransformError>::into)
        }))
    }

    /// Transform whose mapping function only becomes available once `fut`
    /// completes.
    pub fn deferred<Fut, F>(fut: Fut) -> Self
    where
        Fut: Future<Output = F> + Send + 'static,
        F: Fn(S) -> D + Send + Sync + 'static,
    {
        Transform::Deferred(
            fut.map(|f| -> Result<ItemFn<S, D>, TransformError> {
                let convert: ItemFn<S, D> = Box::new(move |item: S| Ok(f(item)));
                Ok(convert)
            })
            .boxed(),
        )
    }

    /// Like [`Transform::deferred`], for operations that can fail to
    /// produce the mapping function.
    pub fn try_deferred<Fut, F, E>(fut: Fut) -> Self
    where
        Fut: Future<Output = Result<F, E>> + Send + 'static,
        F: Fn(S) -> D + Send + Sync + 'static,
        E: Into<TransformError>,
    {
        Transform::Deferred(
            fut.map(|res| -> Result<ItemFn<S, D>, TransformError> {
                let f = res.map_err(Into::<TransformError>::into)?;
                let convert: ItemFn<S, D> = Box::new(move |item: S| Ok(f(item)));
                Ok(convert)
            })
            .boxed(),
        )
    }
}

impl<S, D> Transform<S, D> {
    pub fn is_deferred(&self) -> bool {
        matches!(self, Transform::Deferred(_))
    }

    /// Awaits a deferred transform (once) and returns the per-item function.
    pub async fn resolve(self) -> PaginationResult<ItemFn<S, D>> {
        match self {
            Transform::Ready(f) => Ok(f),
            Transform::Deferred(fut) => fut.await.map_err(PaginationError::Transform),
        }
    }
}

impl<S, D> std::fmt::Debug for Transform<S, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transform::Ready(_) => f.write_str("Transform::Ready"),
            Transform::Deferred(_) => f.write_str("Transform::Deferred"),
        }
    }
}
