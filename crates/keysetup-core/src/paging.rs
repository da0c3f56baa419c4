//! Generic page draining
//!
//! Every listing endpoint of the remote API shares one contract: a request
//! carries a 1-based page number and a page size, and the response carries the
//! page's items plus the server's current idea of the total page count.
//! [`drain_pages`] walks such a resource from page 1 until it runs out of
//! pages or a request fails.

use std::future::Future;

use serde::Deserialize;

use crate::error::FetchError;

/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Paging parameters of a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page_number: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number,
            page_size,
        }
    }
}

/// One page of a paged listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: u32,
    #[serde(default)]
    pub total_records: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_pages: u32) -> Self {
        Self {
            items,
            total_pages,
            total_records: None,
        }
    }
}

/// The request that stopped a drain early
#[derive(Debug)]
pub struct PageFailure {
    pub page_number: u32,
    pub error: FetchError,
}

/// Items gathered by [`drain_pages`]
#[derive(Debug)]
pub struct Drained<T> {
    pub items: Vec<T>,
    /// Number of pages that were fetched successfully
    pub pages_fetched: u32,
    /// Set when pagination stopped on a failed request; `items` is then partial
    pub failure: Option<PageFailure>,
}

/// Fetch every page of a resource and concatenate the items
///
/// The loop starts out expecting a single page and re-reads `total_pages`
/// from every response, always trusting the most recent value, so a server
/// that revises its count mid-listing changes how far the loop goes.
///
/// A failed request is handed to `on_error` together with its page number,
/// and pagination of this resource stops there. Whatever was collected
/// before the failure is returned. Requests are never retried and are
/// issued strictly one after another.
pub async fn drain_pages<T, F, Fut, H>(page_size: u32, mut fetch_page: F, mut on_error: H) -> Drained<T>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>, FetchError>>,
    H: FnMut(u32, &FetchError),
{
    let mut items = Vec::new();
    let mut page_number = 1;
    let mut total_pages = 1;
    let mut pages_fetched = 0;
    let mut failure = None;

    while page_number <= total_pages {
        match fetch_page(PageRequest::new(page_number, page_size)).await {
            Ok(page) => {
                tracing::debug!(
                    page = page_number,
                    total_pages = page.total_pages,
                    items = page.items.len(),
                    "Fetched page"
                );
                items.extend(page.items);
                pages_fetched += 1;
                total_pages = page.total_pages;
                page_number += 1;
            }
            Err(error) => {
                on_error(page_number, &error);
                failure = Some(PageFailure { page_number, error });
                break;
            }
        }
    }

    Drained {
        items,
        pages_fetched,
        failure,
    }
}
