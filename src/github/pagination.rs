//! Cursor pagination for GitHub listing endpoints.
//!
//! GitHub paginates listings with a `page` query parameter and advertises the
//! following page through a `rel="next"` entry in the `Link` response header.
//! [`drain_pages`] follows that cursor until GitHub stops advertising a next
//! page and returns every item it collected along the way.

use std::future::Future;
use std::time::Duration;

use super::error::BrokerError;

/// Largest page size GitHub accepts.
pub const MAX_PER_PAGE: u8 = 100;

/// Page size used when the caller does not pick one.
pub const DEFAULT_PER_PAGE: u8 = MAX_PER_PAGE;

/// Parameters for fetching one page of a listing.
///
/// # Example
///
/// ```
/// use installation_broker::github::pagination::PageRequest;
///
/// let first = PageRequest::first(50).expect("50 is a valid page size");
/// assert_eq!(first.page(), 1);
/// assert_eq!(first.with_page(3).page(), 3);
/// assert!(PageRequest::first(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number (1-based).
    page: u32,
    /// Items per page.
    per_page: u8,
}

impl PageRequest {
    /// Creates a request for the first page.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::InvalidArgument`] when `per_page` is zero or
    /// exceeds [`MAX_PER_PAGE`].
    pub fn first(per_page: u8) -> Result<Self, BrokerError> {
        validate_per_page(per_page)?;
        Ok(Self { page: 1, per_page })
    }

    /// Returns a request for the given page with the same page size.
    #[must_use]
    pub const fn with_page(self, page: u32) -> Self {
        Self {
            page,
            per_page: self.per_page,
        }
    }

    /// Returns the page number (1-based).
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Returns the number of items per page.
    #[must_use]
    pub const fn per_page(&self) -> u8 {
        self.per_page
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// One page of upstream results together with the continuation cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page. May be empty even when more pages follow.
    pub items: Vec<T>,
    /// Next page number, or `None` when this is the final page.
    pub next_page: Option<u32>,
}

impl<T> Page<T> {
    /// Creates a page that is followed by `next_page`.
    #[must_use]
    pub const fn with_next(items: Vec<T>, next_page: u32) -> Self {
        Self {
            items,
            next_page: Some(next_page),
        }
    }

    /// Creates the terminal page of a listing.
    #[must_use]
    pub const fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_page: None,
        }
    }

    /// Returns true if GitHub advertised no further pages.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.next_page.is_none()
    }
}

/// Fetches every page of a listing and concatenates the items in order.
///
/// Each page runs under its own `timeout`; the timer is dropped as soon as
/// that page resolves. Enumeration stops only when a page reports no next
/// page. An empty page with a next cursor keeps going.
///
/// # Errors
///
/// Returns the first error raised by `fetch`, or
/// [`BrokerError::UpstreamUnavailable`] when a page exceeds `timeout`, or
/// [`BrokerError::UpstreamData`] when the next cursor does not move forward.
/// No partial results are returned.
pub async fn drain_pages<T, F, Fut>(
    operation: &str,
    first: PageRequest,
    timeout: Duration,
    mut fetch: F,
) -> Result<Vec<T>, BrokerError>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>, BrokerError>>,
{
    let mut collected = Vec::new();
    let mut request = first;

    loop {
        let step = format!("{operation} page {page}", page = request.page());
        let page = with_timeout(&step, timeout, fetch(request)).await?;

        tracing::debug!(
            operation,
            page = request.page(),
            items = page.items.len(),
            next_page = ?page.next_page,
            "fetched listing page"
        );

        collected.extend(page.items);

        let Some(next_page) = page.next_page else {
            return Ok(collected);
        };

        if next_page <= request.page() {
            return Err(BrokerError::UpstreamData {
                message: format!("{step}: next page cursor {next_page} does not advance"),
            });
        }

        request = request.with_page(next_page);
    }
}

/// Runs one upstream step under a bounded timeout.
///
/// # Errors
///
/// Propagates the step's own error, or returns
/// [`BrokerError::UpstreamUnavailable`] once `timeout` elapses.
pub async fn with_timeout<T, Fut>(
    step: &str,
    timeout: Duration,
    future: Fut,
) -> Result<T, BrokerError>
where
    Fut: Future<Output = Result<T, BrokerError>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_elapsed) => Err(BrokerError::UpstreamUnavailable {
            message: format!(
                "{step} timed out after {millis}ms",
                millis = timeout.as_millis()
            ),
        }),
    }
}

fn validate_per_page(per_page: u8) -> Result<(), BrokerError> {
    if per_page == 0 {
        return Err(BrokerError::InvalidArgument {
            message: "per_page must be at least 1".to_owned(),
        });
    }

    if per_page > MAX_PER_PAGE {
        return Err(BrokerError::InvalidArgument {
            message: format!("per_page must not exceed {MAX_PER_PAGE}"),
        });
    }

    Ok(())
}
