//! Locations, routes and history
//!
//! The list route lives at `/invoices` and carries `page` and `pageSize`
//! in its query. Details live at `/invoices/detail/{id}`. Anything else
//! redirects to the list.

use crate::pagination::{PageRequest, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use url::Url;

/// Path of the invoice list
pub const LIST_PATH: &str = "/invoices";

const DETAIL_PREFIX: &str = "/invoices/detail/";

/// A resolved location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Invoice list with the page requested by the query
    List(PageRequest),
    /// Detail view for one invoice
    Detail { id: String },
    /// Unknown location; the host replaces it with the list
    Redirect,
}

impl Route {
    /// Resolve a location such as `/invoices?page=2&pageSize=20`
    pub fn resolve(location: &str) -> Self {
        let Ok(url) = Url::parse("http://app.local/").and_then(|base| base.join(location)) else {
            return Self::Redirect;
        };

        let path = url.path();
        if path == LIST_PATH || path == "/invoices/" {
            return Self::List(page_request_from_query(url.query().unwrap_or_default()));
        }

        match path.strip_prefix(DETAIL_PREFIX) {
            Some(id) if !id.is_empty() && !id.contains('/') => Self::Detail { id: id.to_string() },
            _ => Self::Redirect,
        }
    }
}

/// Read `page` and `pageSize` from a query string.
///
/// Missing, non-numeric or zero values fall back to 1 and 10.
pub fn page_request_from_query(query: &str) -> PageRequest {
    let mut page = None;
    let mut page_size = None;

    for (key, value) in url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
        let parsed = value.trim().parse::<u32>().ok().filter(|v| *v > 0);
        match key.as_ref() {
            "page" => page = parsed,
            "pageSize" => page_size = parsed,
            _ => {}
        }
    }

    PageRequest::new(
        page.unwrap_or(DEFAULT_PAGE),
        page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    )
}

/// Location of the list showing `request`
pub fn list_location(request: PageRequest) -> String {
    format!(
        "{LIST_PATH}?page={}&pageSize={}",
        request.page, request.page_size
    )
}

/// Location of the detail view for `id`
pub fn detail_location(id: &str) -> String {
    format!("{DETAIL_PREFIX}{id}")
}

/// Browser-like location history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: Vec<String>,
    index: usize,
}

impl History {
    /// Start a history at `location`
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            entries: vec![location.into()],
            index: 0,
        }
    }

    /// Current location
    pub fn current(&self) -> &str {
        &self.entries[self.index]
    }

    /// Number of entries, including forward ones
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add an entry, discarding any forward entries
    pub fn push(&mut self, location: impl Into<String>) {
        self.entries.truncate(self.index + 1);
        self.entries.push(location.into());
        self.index = self.entries.len() - 1;
    }

    /// Rewrite the current entry in place
    pub fn replace(&mut self, location: impl Into<String>) {
        self.entries[self.index] = location.into();
    }

    /// Step back one entry; returns `false` at the start of history
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }
}
