//! Pagination and sorting primitives shared by list endpoints
//!
//! A list request is a resource-specific filter plus a [`PageRequest`] and an
//! optional [`Sort`]. Sort fields are closed enums implementing
//! [`SortColumn`], so only allowlisted column names ever reach SQL.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page used when the caller does not ask for one
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the caller does not ask for one
pub const DEFAULT_ITEMS_PER_PAGE: u32 = 10;
/// Largest page size a caller may request
pub const MAX_ITEMS_PER_PAGE: u32 = 100;

/// Errors raised when building a [`PageRequest`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page must be at least 1")]
    InvalidPage,

    #[error("items_per_page must be between 1 and {MAX_ITEMS_PER_PAGE}")]
    InvalidItemsPerPage,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// SQL keyword for this direction
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A sortable field that maps onto a fixed SQL column expression
pub trait SortColumn: Copy {
    /// Unique column appended to every ordering so that OFFSET pages never
    /// overlap when the sort key has ties
    const TIE_BREAKER: &'static str;

    /// Column expression used in `ORDER BY`
    fn column(self) -> &'static str;
}

/// Requested ordering for a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort<F> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F: SortColumn> Sort<F> {
    pub fn new(field: F, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// `ORDER BY` body, e.g. `a.created_at DESC, a.id DESC`
    pub fn to_sql(self) -> String {
        let direction = self.direction.as_sql();
        format!("{} {direction}, {} {direction}", self.field.column(), F::TIE_BREAKER)
    }
}

/// Requested window of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub items_per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Validate a page request, applying defaults for missing values
    pub fn new(page: Option<u32>, items_per_page: Option<u32>) -> Result<Self, PaginationError> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        let items_per_page = items_per_page.unwrap_or(DEFAULT_ITEMS_PER_PAGE);

        if page < 1 {
            return Err(PaginationError::InvalidPage);
        }
        if !(1..=MAX_ITEMS_PER_PAGE).contains(&items_per_page) {
            return Err(PaginationError::InvalidItemsPerPage);
        }

        Ok(Self {
            page,
            items_per_page,
        })
    }

    /// SQL `LIMIT`
    pub fn limit(&self) -> i64 {
        i64::from(self.items_per_page)
    }

    /// SQL `OFFSET`
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.items_per_page)
    }
}

/// A list request: resource filter, window and optional ordering
///
/// `sort_by` and `sort_dir` are independent. A direction without a field
/// applies to the resource's default column; a field without a direction
/// sorts ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery<F, S> {
    pub filter: F,
    pub page: PageRequest,
    pub sort_by: Option<S>,
    pub sort_dir: Option<SortDirection>,
}

impl<F: Default, S> Default for ListQuery<F, S> {
    fn default() -> Self {
        Self {
            filter: F::default(),
            page: PageRequest::default(),
            sort_by: None,
            sort_dir: None,
        }
    }
}

impl<F, S: SortColumn> ListQuery<F, S> {
    /// Effective ordering given the resource's default
    pub fn sort(&self, default: Sort<S>) -> Sort<S> {
        match self.sort_by {
            Some(field) => Sort::new(field, self.sort_dir.unwrap_or_default()),
            None => Sort::new(default.field, self.sort_dir.unwrap_or(default.direction)),
        }
    }

    /// `ORDER BY` body for [`ListQuery::sort`]
    pub fn order_by(&self, default: Sort<S>) -> String {
        self.sort(default).to_sql()
    }
}

/// One page of results together with the unpaginated total
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: i64,
    pub page: u32,
    pub items_per_page: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_items: i64, request: PageRequest) -> Self {
        Self {
            items,
            total_items,
            page: request.page,
            items_per_page: request.items_per_page,
        }
    }

    pub fn total_pages(&self) -> i64 {
        total_pages(self.total_items, self.items_per_page)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
            page: self.page,
            items_per_page: self.items_per_page,
        }
    }
}

/// `ceil(total_items / items_per_page)`, zero when the page size is zero
pub fn total_pages(total_items: i64, items_per_page: u32) -> i64 {
    if items_per_page == 0 {
        return 0;
    }
    let per_page = i64::from(items_per_page);
    (total_items.max(0) + per_page - 1) / per_page
}
