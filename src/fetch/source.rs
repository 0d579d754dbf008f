//! Page sources
//!
//! A `PageSource` turns a `PageRequest` into one `Page`. The HTTP source
//! issues `GET {resource}?_page=N&_limit=M` and applies the Link header
//! transformation to each response as a pure function.

use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{total_pages_from_link, PageRequest, PAGE_PARAM};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, LINK};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use tracing::debug;

/// Query parameter carrying the page size
pub const LIMIT_PARAM: &str = "_limit";

/// One page of results with the server-reported page count
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Assemble a page from a decoded body and the response headers.
    ///
    /// Without a Link header the requested page number stands in for the
    /// total: at least that many pages exist.
    pub fn from_parts(items: Vec<T>, headers: &HeaderMap, request: PageRequest) -> Self {
        let total_pages = headers
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map_or(request.page, total_pages_from_link);

        Self { items, total_pages }
    }
}

/// Anything able to fetch a single page
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    async fn fetch_page(&self, request: PageRequest) -> Result<Page<T>>;
}

/// Fetches pages of `T` from a REST collection
pub struct HttpPageSource<T> {
    client: HttpClient,
    resource: String,
    _record: PhantomData<fn() -> T>,
}

impl<T> HttpPageSource<T> {
    /// Create a source for `resource` (e.g., "/invoices") on the client's base URL
    pub fn new(client: HttpClient, resource: impl Into<String>) -> Self {
        Self {
            client,
            resource: resource.into(),
            _record: PhantomData,
        }
    }

    /// Request config for one page
    pub fn request_config(&self, request: PageRequest) -> RequestConfig {
        RequestConfig::new()
            .query(PAGE_PARAM, request.page)
            .query(LIMIT_PARAM, request.page_size)
    }
}

#[async_trait]
impl<T> PageSource<T> for HttpPageSource<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch_page(&self, request: PageRequest) -> Result<Page<T>> {
        let response = self
            .client
            .get_with_config(&self.resource, self.request_config(request))
            .await?;

        let headers = response.headers().clone();
        let bytes = response.bytes().await?;
        let items: Vec<T> = serde_json::from_slice(&bytes)
            .map_err(|e| Error::decode(format!("{} page {}: {e}", self.resource, request.page)))?;

        let page = Page::from_parts(items, &headers, request);
        debug!(
            "Fetched {} items from {} (page {} of {})",
            page.items.len(),
            self.resource,
            request.page,
            page.total_pages
        );
        Ok(page)
    }
}

impl<T> std::fmt::Debug for HttpPageSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPageSource")
            .field("client", &self.client)
            .field("resource", &self.resource)
            .finish()
    }
}
