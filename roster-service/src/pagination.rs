//! Offset pagination over a lazily evaluated query
//!
//! A [`PaginatedList`] is built from a [`PageSource`] with exactly two round
//! trips against the same query: one `count`, then one bounded `fetch`. The
//! full result set is never materialised.
//!
//! # Example
//!
//! ```rust
//! use std::num::NonZeroU32;
//! use roster_service::pagination::{PageWindow, PaginatedList};
//!
//! let size = NonZeroU32::new(3).unwrap();
//! assert_eq!(PageWindow::for_page(3, size), PageWindow { skip: 6, take: 3 });
//!
//! let page = PaginatedList::new(vec!["g"], 7, 3, size);
//! assert_eq!(page.total_pages(), 3);
//! assert!(page.has_previous_page());
//! assert!(!page.has_next_page());
//! ```

use std::future::Future;
use std::num::NonZeroU32;

use serde::Serialize;

use crate::repository::RepositoryResult;

/// Bounds of one page against an ordered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Number of results to skip
    pub skip: u64,
    /// Maximum number of results to return
    pub take: u64,
}

impl PageWindow {
    /// Window for a 1-based page index
    #[must_use]
    pub fn for_page(page_index: u32, page_size: NonZeroU32) -> Self {
        let take = u64::from(page_size.get());
        let skip = u64::from(page_index.saturating_sub(1)).saturating_mul(take);
        Self { skip, take }
    }
}

/// Resolve a requested page index. Absent or below 1 becomes 1; large values
/// are kept so stale links land on an empty page instead of the last one.
#[must_use]
pub fn resolve_page_index(requested: Option<i64>) -> u32 {
    let requested = requested.unwrap_or(1).max(1);
    u32::try_from(requested).unwrap_or(u32::MAX)
}

/// A query that can be counted and sliced without materialising every row
pub trait PageSource<Q: ?Sized>: Send + Sync {
    /// Row type produced by `fetch`
    type Item: Send;

    /// Count all rows matching `query`
    fn count(&self, query: &Q) -> impl Future<Output = RepositoryResult<u64>> + Send;

    /// Fetch the rows of `query` inside `window`, in query order
    fn fetch(
        &self,
        query: &Q,
        window: PageWindow,
    ) -> impl Future<Output = RepositoryResult<Vec<Self::Item>>> + Send;
}

/// One page of results plus navigation metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginatedList<T> {
    items: Vec<T>,
    page_index: u32,
    total_pages: u32,
}

impl<T> PaginatedList<T> {
    /// Assemble a page from an already fetched slice and the total row count
    #[must_use]
    pub fn new(items: Vec<T>, total_count: u64, page_index: u32, page_size: NonZeroU32) -> Self {
        Self {
            items,
            page_index,
            total_pages: total_pages(total_count, page_size),
        }
    }

    /// Count `query`, then fetch the requested page of it
    pub async fn create<S, Q>(
        source: &S,
        query: &Q,
        requested_page: Option<i64>,
        page_size: NonZeroU32,
    ) -> RepositoryResult<Self>
    where
        S: PageSource<Q, Item = T>,
        Q: Sync + ?Sized,
    {
        let page_index = resolve_page_index(requested_page);
        let total_count = source.count(query).await?;
        let window = PageWindow::for_page(page_index, page_size);
        let items = source.fetch(query, window).await?;

        tracing::debug!(
            page_index,
            total_count,
            skip = window.skip,
            take = window.take,
            returned = items.len(),
            "Built page"
        );

        Ok(Self::new(items, total_count, page_index, page_size))
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The 1-based index that was requested, even when past the last page
    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn has_previous_page(&self) -> bool {
        self.page_index > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.page_index < self.total_pages
    }

    pub fn previous_page_index(&self) -> u32 {
        self.page_index.saturating_sub(1).max(1)
    }

    pub fn next_page_index(&self) -> u32 {
        self.page_index.saturating_add(1)
    }
}

/// Ceiling division of `total_count` by `page_size`
fn total_pages(total_count: u64, page_size: NonZeroU32) -> u32 {
    let pages = total_count.div_ceil(u64::from(page_size.get()));
    u32::try_from(pages).unwrap_or(u32::MAX)
}
