//! Filter, sort and cancellation options for a paged query

use std::str::FromStr;

use sea_orm::sea_query::IntoCondition;
use sea_orm::{Condition, EntityTrait, Order};
use tokio_util::sync::CancellationToken;

use crate::shared::{PaginationError, PaginationResult};

/// Column a page is ordered by.
#[derive(Debug, Clone)]
pub enum SortKey<E: EntityTrait> {
    Column(E::Column),
    /// Column name, resolved against the entity when the query runs
    Named(String),
}

#[derive(Debug, Clone)]
pub struct Sort<E: EntityTrait> {
    pub key: SortKey<E>,
    pub descending: bool,
}

impl<E: EntityTrait> Sort<E> {
    /// Resolves a named key to one of the entity's columns. Unknown names
    /// are rejected here so that no query is issued for them.
    pub fn resolve(&self) -> PaginationResult<(E::Column, Order)> {
        let column = match &self.key {
            SortKey::Column(column) => *column,
            SortKey::Named(name) => <E::Column as FromStr>::from_str(name).map_err(|_| {
                PaginationError::InvalidArgument(format!(
                    "unknown sort column '{}' for {}",
                    name,
                    E::default().table_name()
                ))
            })?,
        };
        let order = if self.descending { Order::Desc } else { Order::Asc };
        Ok((column, order))
    }
}

/// Options for one paged query.
///
/// Without a sort the rows come back in whatever order the database yields,
/// which is not guaranteed to be stable between calls.
#[derive(Debug, Clone)]
pub struct PageQuery<E: EntityTrait> {
    filter: Option<Condition>,
    sort: Option<Sort<E>>,
    cancel: Option<CancellationToken>,
}

impl<E: EntityTrait> Default for PageQuery<E> {
    fn default() -> Self {
        Self {
            filter: None,
            sort: None,
            cancel: None,
        }
    }
}

impl<E: EntityTrait> PageQuery<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts both the page and the total count to matching rows.
    /// Calling it again narrows the filter further.
    pub fn filter<F: IntoCondition>(mut self, filter: F) -> Self {
        let condition = filter.into_condition();
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.add(condition),
            None => Condition::all().add(condition),
        });
        self
    }

    pub fn order_by(mut self, column: E::Column, order: Order) -> Self {
        self.sort = Some(Sort {
            key: SortKey::Column(column),
            descending: matches!(order, Order::Desc),
        });
        self
    }

    pub fn order_by_asc(self, column: E::Column) -> Self {
        self.order_by(column, Order::Asc)
    }

    pub fn order_by_desc(self, column: E::Column) -> Self {
        self.order_by(column, Order::Desc)
    }

    /// Orders by a column given by name (`snake_case` or `camelCase`).
    /// An empty name clears the ordering.
    pub fn order_by_name(mut self, name: impl Into<String>, descending: bool) -> Self {
        let name = name.into();
        self.sort = if name.is_empty() {
            None
        } else {
            Some(Sort {
                key: SortKey::Named(name),
                descending,
            })
        };
        self
    }

    /// Pending queries fail with [`PaginationError::Cancelled`] once `token`
    /// is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn filter_condition(&self) -> Option<&Condition> {
        self.filter.as_ref()
    }

    pub fn sort(&self) -> Option<&Sort<E>> {
        self.sort.as_ref()
    }

    pub fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancel.as_ref()
    }

    pub(crate) fn into_parts(
        self,
    ) -> (Option<Condition>, Option<Sort<E>>, Option<CancellationToken>) {
        (self.filter, self.sort, self.cancel)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::ColumnTrait;

    use super::*;
    use crate::infrastructure::database::test_support::article;

    #[test]
    fn test_typed_sort_resolves() {
        let query = PageQuery::<article::Entity>::new().order_by_desc(article::Column::CreatedAt);
        let (column, order) = query.sort().unwrap().resolve().unwrap();
        assert!(matches!(column, article::Column::CreatedAt));
        assert!(matches!(order, Order::Desc));
    }

    #[test]
    fn test_named_sort_resolves_snake_and_camel_case() {
        for name in ["created_at", "createdAt"] {
            let query = PageQuery::<article::Entity>::new().order_by_name(name, false);
            let (column, order) = query.sort().unwrap().resolve().unwrap();
            assert!(matches!(column, article::Column::CreatedAt));
            assert!(matches!(order, Order::Asc));
        }
    }

    #[test]
    fn test_unknown_named_sort_is_invalid_argument() {
        let query = PageQuery::<article::Entity>::new().order_by_name("Rating", true);
        let err = query.sort().unwrap().resolve().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid argument: unknown sort column 'Rating' for articles"
        );
    }

    #[test]
    fn test_later_sort_replaces_earlier() {
        let query = PageQuery::<article::Entity>::new()
            .order_by_name("title", false)
            .order_by_asc(article::Column::Id);
        let (column, _) = query.sort().unwrap().resolve().unwrap();
        assert!(matches!(column, article::Column::Id));
    }

    #[test]
    fn test_defaults_are_empty() {
        let query = PageQuery::<article::Entity>::default();
        assert!(query.filter_condition().is_none());
        assert!(query.sort().is_none());
        assert!(query.cancellation().is_none());
    }

    #[test]
    fn test_filter_and_cancellation_are_kept() {
        let token = CancellationToken::new();
        let query = PageQuery::<article::Entity>::new()
            .filter(article::Column::Published.eq(true))
            .filter(article::Column::ViewCount.gt(3))
            .with_cancellation(token.clone());

        assert!(query.filter_condition().is_some());
        token.cancel();
        assert!(query.cancellation().unwrap().is_cancelled());
    }
}
