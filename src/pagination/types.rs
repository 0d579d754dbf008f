//! Pagination types
//!
//! `PaginationState` is the single source of truth for which page the
//! list view is asking for. It is mutated only through `advance`,
//! `retreat` and `reconcile`.

use crate::types::PageChange;

/// Default page number when the location does not carry one
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size when the location does not carry one
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A `(page, page_size)` pair, both at least 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Create a page request, lifting zero values to 1
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_PAGE_SIZE)
    }
}

impl From<PageChange> for PageRequest {
    fn from(change: PageChange) -> Self {
        Self::new(change.page, change.page_size)
    }
}

impl From<PageRequest> for PageChange {
    fn from(request: PageRequest) -> Self {
        Self {
            page: request.page,
            page_size: request.page_size,
        }
    }
}

/// Tracks which page is requested and how many pages the server reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    current_page: u32,
    page_size: u32,
    total_pages: u32,
}

impl PaginationState {
    /// Seed state from a request.
    ///
    /// `total_pages` starts out equal to the current page so that no
    /// paginator controls render before the first response arrives.
    pub fn new(request: PageRequest) -> Self {
        Self {
            current_page: request.page,
            page_size: request.page_size,
            total_pages: request.page,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// The request this state currently denotes
    pub fn request(&self) -> PageRequest {
        PageRequest {
            page: self.current_page,
            page_size: self.page_size,
        }
    }

    /// Move to the next page if one is known to exist.
    ///
    /// Returns `true` when the state changed.
    pub fn advance(&mut self) -> bool {
        if self.has_next() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Move to the previous page unless already on the first one.
    ///
    /// Returns `true` when the state changed.
    pub fn retreat(&mut self) -> bool {
        if self.has_previous() {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Replace all fields with the values confirmed by a successful fetch
    pub fn reconcile(&mut self, server_page: u32, server_page_size: u32, server_total_pages: u32) {
        self.current_page = server_page;
        self.page_size = server_page_size;
        self.total_pages = server_total_pages;
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.total_pages > 0 && self.current_page < self.total_pages
    }

    /// Paginator controls are only worth showing with more than one page
    pub fn shows_controls(&self) -> bool {
        self.total_pages > 1
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(PageRequest::default())
    }
}
