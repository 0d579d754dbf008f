//! Pagination module
//!
//! Paginator state transitions and Link header parsing.
//!
//! # Overview
//!
//! `PaginationState` decides which page the list view requests next.
//! The Link header parser recovers the authoritative page count from a
//! response so the state can be reconciled with the server.

mod link;
mod types;

pub use link::{parse_link_header, total_pages_from_link, RelLinks, PAGE_PARAM};
pub use types::{PageRequest, PaginationState, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
