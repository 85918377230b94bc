//! Paging engine
//!
//! Page requests, the paged result envelope and the arithmetic that turns a
//! row count into a page count and a slice.
//!
//! Pages are zero-based. The page count is computed by one of two formulas:
//!
//! | rows | size | [`compute_pages`] | [`compute_projection_pages`] |
//! |------|------|-------------------|------------------------------|
//! | 0    | 100  | 0                 | 0                            |
//! | 50   | 100  | 0                 | 0                            |
//! | 100  | 100  | 1                 | 0                            |
//! | 101  | 100  | 1                 | 1                            |
//! | 300  | 100  | 2                 | 2                            |
//!
//! Entity paging floors an exact-multiple result of 0 up to 1; projection
//! paging does not. Both are kept as separate paths so callers get the count
//! they always got.
//!
//! # Example
//!
//! ```rust
//! use criteria_query::paging::{compute_pages, PageParameters, PageRequest, SortParameter};
//!
//! let params = PageParameters::new(20, 2).with_sort(vec![SortParameter::descending("created_at")]);
//! let slice = params.pagination().unwrap();
//! assert_eq!(slice.offset, 40);
//! assert_eq!(slice.limit, 20);
//!
//! assert_eq!(compute_pages(100, 100).unwrap(), 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::query::{OrderDirection, Pageable, QueryError, QueryResult};

/// Page size used when a request does not name one
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Field sorted on when a request does not name one
pub const DEFAULT_SORT_FIELD: &str = "id";

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_sort_field() -> String {
    DEFAULT_SORT_FIELD.to_string()
}

fn default_sort() -> Vec<SortParameter> {
    vec![SortParameter::default()]
}

/// One sort directive
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortParameter {
    /// Field to sort on; `"id"` resolves to the entity's identifier attribute
    #[serde(default = "default_sort_field")]
    pub field: String,
    /// Sort descending instead of ascending
    #[serde(default)]
    pub desc: bool,
}

impl SortParameter {
    /// Directive on `field`
    pub fn new(field: impl Into<String>, desc: bool) -> Self {
        Self {
            field: field.into(),
            desc,
        }
    }

    /// Ascending directive on `field`
    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, false)
    }

    /// Descending directive on `field`
    pub fn descending(field: impl Into<String>) -> Self {
        Self::new(field, true)
    }

    /// Direction of this directive
    #[must_use]
    pub const fn direction(&self) -> OrderDirection {
        OrderDirection::from_desc(self.desc)
    }
}

impl Default for SortParameter {
    fn default() -> Self {
        Self::ascending(DEFAULT_SORT_FIELD)
    }
}

/// Slice bounds derived from page parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of rows to skip
    pub offset: u64,
    /// Maximum number of rows to return
    pub limit: u64,
}

impl Pagination {
    /// Slice bounds for a zero-based page
    ///
    /// ```rust
    /// use criteria_query::paging::Pagination;
    ///
    /// let slice = Pagination::page(3, 25).unwrap();
    /// assert_eq!(slice.offset, 75);
    /// assert!(Pagination::page(0, 0).is_err());
    /// ```
    pub fn page(page: u32, size: u32) -> QueryResult<Self> {
        let size = check_size(size)?;
        Ok(Self {
            offset: u64::from(page).saturating_mul(size),
            limit: size,
        })
    }
}

/// A page request
///
/// Implemented by the request shapes callers deserialize from the outside
/// world. The paging engine only reads through this trait.
pub trait PageRequest {
    /// Rows per page
    fn size(&self) -> u32;

    /// Zero-based page number
    fn page(&self) -> u32;

    /// Sort directives in application order, never empty
    fn sort(&self) -> Vec<SortParameter>;

    /// Normalized copy of this request, as echoed in [`PagedEntities`]
    fn page_parameters(&self) -> PageParameters {
        PageParameters {
            size: self.size(),
            page: self.page(),
            sort: self.sort(),
        }
    }

    /// Slice bounds for this request
    fn pagination(&self) -> QueryResult<Pagination> {
        Pagination::page(self.page(), self.size())
    }
}

/// Page request with a list of sort directives
///
/// ```rust
/// use criteria_query::paging::PageParameters;
///
/// let params: PageParameters = serde_json::from_str(r#"{"page": 3}"#).unwrap();
/// assert_eq!(params.size, 100);
/// assert_eq!(params.sort[0].field, "id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParameters {
    /// Rows per page
    #[serde(default = "default_page_size")]
    pub size: u32,
    /// Zero-based page number
    #[serde(default)]
    pub page: u32,
    /// Sort directives in application order
    #[serde(default = "default_sort")]
    pub sort: Vec<SortParameter>,
}

impl PageParameters {
    /// Page `page` of `size` rows, sorted by identifier
    #[must_use]
    pub fn new(size: u32, page: u32) -> Self {
        Self {
            size,
            page,
            sort: default_sort(),
        }
    }

    /// Replace the sort directives
    #[must_use]
    pub fn with_sort(mut self, sort: Vec<SortParameter>) -> Self {
        self.sort = sort;
        self
    }
}

impl Default for PageParameters {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, 0)
    }
}

impl PageRequest for PageParameters {
    fn size(&self) -> u32 {
        self.size
    }

    fn page(&self) -> u32 {
        self.page
    }

    fn sort(&self) -> Vec<SortParameter> {
        if self.sort.is_empty() {
            default_sort()
        } else {
            self.sort.clone()
        }
    }
}

/// Page request with a single sort field, as used in query strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplePageParameters {
    /// Rows per page
    #[serde(default = "default_page_size")]
    pub size: u32,
    /// Zero-based page number
    #[serde(default)]
    pub page: u32,
    /// Field to sort on
    #[serde(default = "default_sort_field")]
    pub sort: String,
    /// Sort descending instead of ascending
    #[serde(default)]
    pub desc: bool,
}

impl Default for SimplePageParameters {
    fn default() -> Self {
        Self {
            size: DEFAULT_PAGE_SIZE,
            page: 0,
            sort: default_sort_field(),
            desc: false,
        }
    }
}

impl PageRequest for SimplePageParameters {
    fn size(&self) -> u32 {
        self.size
    }

    fn page(&self) -> u32 {
        self.page
    }

    fn sort(&self) -> Vec<SortParameter> {
        let field = if self.sort.is_empty() {
            DEFAULT_SORT_FIELD
        } else {
            self.sort.as_str()
        };
        vec![SortParameter::new(field, self.desc)]
    }
}

/// One page of results with counts for the whole result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedEntities<T> {
    /// The request this page answers
    pub page_parameters: PageParameters,
    /// Page count for the whole result set
    pub pages: u64,
    /// Row count for the whole result set
    pub count: u64,
    /// Rows on this page
    pub resource: Vec<T>,
}

impl<T> PagedEntities<T> {
    /// Assemble a page
    pub const fn new(page_parameters: PageParameters, pages: u64, count: u64, resource: Vec<T>) -> Self {
        Self {
            page_parameters,
            pages,
            count,
            resource,
        }
    }

    /// Transform the rows, keeping counts and parameters
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedEntities<U> {
        PagedEntities {
            page_parameters: self.page_parameters,
            pages: self.pages,
            count: self.count,
            resource: self.resource.into_iter().map(f).collect(),
        }
    }
}

fn check_size(size: u32) -> QueryResult<u64> {
    if size == 0 {
        return Err(QueryError::invalid_page_parameters("page size must be greater than zero")
            .with_field("size"));
    }
    Ok(u64::from(size))
}

/// Page count for entity paging
///
/// Zero rows give zero pages. An exact multiple of `size` gives
/// `rows / size - 1`, raised to 1 when that is 0. Anything else gives
/// `rows / size`.
pub fn compute_pages(rows: u64, size: u32) -> QueryResult<u64> {
    let size = check_size(size)?;
    if rows == 0 {
        return Ok(0);
    }
    if rows % size == 0 {
        Ok((rows / size - 1).max(1))
    } else {
        Ok(rows / size)
    }
}

/// Page count for projection paging
///
/// Same as [`compute_pages`] without raising 0 to 1.
pub fn compute_projection_pages(rows: u64, size: u32) -> QueryResult<u64> {
    let size = check_size(size)?;
    if rows == 0 {
        return Ok(0);
    }
    if rows % size == 0 {
        Ok(rows / size - 1)
    } else {
        Ok(rows / size)
    }
}

/// Count, compute pages, slice, then hand the slice to `before_materialize`
pub(crate) async fn page_query<Q, R, F>(
    query: Q,
    request: &R,
    page_count: fn(u64, u32) -> QueryResult<u64>,
    before_materialize: F,
) -> QueryResult<PagedEntities<Q::Item>>
where
    Q: Pageable,
    R: PageRequest + ?Sized,
    F: FnOnce(Q) -> Q,
{
    let page_parameters = request.page_parameters();
    let slice = request.pagination()?;
    let count = query.count().await?;
    let pages = page_count(count, page_parameters.size)?;

    tracing::debug!(
        count,
        pages,
        page = page_parameters.page,
        size = page_parameters.size,
        offset = slice.offset,
        "computed page"
    );

    let resource = before_materialize(query.skip(slice.offset).take(slice.limit))
        .materialize()
        .await?;

    Ok(PagedEntities::new(page_parameters, pages, count, resource))
}

/// Count, slice and wrap an entity query
///
/// The query is counted once and then materialized once. The two passes
/// are not required to see the same data.
pub async fn page_entities<Q, R>(query: Q, request: &R) -> QueryResult<PagedEntities<Q::Item>>
where
    Q: Pageable,
    R: PageRequest + ?Sized,
{
    page_query(query, request, compute_pages, |query| query).await
}

/// Count, slice and wrap a projection query
pub async fn page_projection<Q, R>(query: Q, request: &R) -> QueryResult<PagedEntities<Q::Item>>
where
    Q: Pageable,
    R: PageRequest + ?Sized,
{
    page_query(query, request, compute_projection_pages, |query| query).await
}
