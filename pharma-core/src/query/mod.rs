//! Filter, sort and paginate engine for order listings.
//!
//! Every caller-supplied name is checked against a closed allow-list and
//! every operand is parsed into a typed value before a store sees it, so a
//! `ListQuery` can be rendered into SQL without string interpolation of
//! untrusted input.

pub mod filter;

pub use filter::{ColumnKind, Comparison, FilterOperator, FilterValue, OrderColumn, Predicate, RawFilter};

use uuid::Uuid;

use crate::error::CoreResult;

/// Which orders a listing may ever see, applied before any filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    All,
    Customer(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Anything that is not `desc` sorts ascending.
    pub fn normalize(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: OrderColumn,
    pub direction: SortDirection,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            column: OrderColumn::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

/// 1-indexed page request. A non-positive limit means "no pagination".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i32,
    pub limit: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    pub fn window(&self) -> Option<PageWindow> {
        if self.limit <= 0 {
            return None;
        }
        let limit = i64::from(self.limit);
        let offset = ((i64::from(self.page) - 1) * limit).max(0);
        Some(PageWindow { limit, offset })
    }
}

/// Caller-facing listing parameters, still untrusted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub page: i32,
    pub limit: i32,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub filter: RawFilter,
}

/// A validated, bounded listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub scope: OrderScope,
    pub filter: Option<Predicate>,
    pub sort: Sort,
    pub pagination: Pagination,
}

impl ListQuery {
    pub fn build(scope: OrderScope, params: &ListParams) -> CoreResult<Self> {
        let filter = if params.filter.is_empty() {
            None
        } else {
            Some(Predicate::from_raw(&params.filter)?)
        };

        let sort = match params.sort_by.as_deref().map(str::trim) {
            Some(sort_by) if !sort_by.is_empty() => Sort {
                column: OrderColumn::parse(sort_by, "sort")?,
                direction: SortDirection::normalize(params.sort_order.as_deref().unwrap_or_default()),
            },
            _ => Sort::default(),
        };

        let query = Self {
            scope,
            filter,
            sort,
            pagination: Pagination {
                page: params.page,
                limit: params.limit,
            },
        };
        tracing::debug!(?query, "built order list query");
        Ok(query)
    }

    pub fn window(&self) -> Option<PageWindow> {
        self.pagination.window()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    fn params(page: i32, limit: i32) -> ListParams {
        ListParams {
            page,
            limit,
            ..Default::default()
        }
    }

    #[test]
    fn test_pagination_offsets() {
        assert_eq!(
            Pagination { page: 3, limit: 10 }.window(),
            Some(PageWindow { limit: 10, offset: 20 })
        );
        assert_eq!(
            Pagination { page: 0, limit: 10 }.window(),
            Some(PageWindow { limit: 10, offset: 0 })
        );
        assert_eq!(
            Pagination { page: -4, limit: 5 }.window(),
            Some(PageWindow { limit: 5, offset: 0 })
        );
    }

    #[test]
    fn test_non_positive_limit_is_unbounded() {
        assert_eq!(Pagination { page: 2, limit: 0 }.window(), None);
        assert_eq!(Pagination { page: 1, limit: -1 }.window(), None);
    }

    #[test]
    fn test_sort_order_normalization() {
        assert_eq!(SortDirection::normalize("DESC"), SortDirection::Desc);
        assert_eq!(SortDirection::normalize("asc"), SortDirection::Asc);
        assert_eq!(SortDirection::normalize("sideways"), SortDirection::Asc);
        assert_eq!(SortDirection::normalize(""), SortDirection::Asc);
    }

    #[test]
    fn test_build_defaults() {
        let query = ListQuery::build(OrderScope::All, &params(1, 10)).unwrap();
        assert_eq!(query.filter, None);
        assert_eq!(query.sort, Sort::default());
        assert_eq!(query.window(), Some(PageWindow { limit: 10, offset: 0 }));
    }

    #[test]
    fn test_build_with_sort_and_filter() {
        let customer = Uuid::new_v4();
        let params = ListParams {
            page: 2,
            limit: 5,
            sort_by: Some("subtotal".to_string()),
            sort_order: Some("Desc".to_string()),
            filter: RawFilter::new("status", "eq", "paid"),
        };

        let query = ListQuery::build(OrderScope::Customer(customer), &params).unwrap();
        assert_eq!(query.scope, OrderScope::Customer(customer));
        assert_eq!(
            query.sort,
            Sort {
                column: OrderColumn::Subtotal,
                direction: SortDirection::Desc
            }
        );
        assert_eq!(query.filter.unwrap().column(), OrderColumn::Status);
    }

    #[test]
    fn test_unknown_sort_column_rejected() {
        let params = ListParams {
            sort_by: Some("1; DELETE FROM orders".to_string()),
            ..params(1, 10)
        };
        let err = ListQuery::build(OrderScope::All, &params).unwrap_err();
        assert!(matches!(err, CoreError::BadRequest(msg) if msg.starts_with("invalid sort column")));
    }
}
