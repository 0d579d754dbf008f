//! Fetch module
//!
//! Cancellable, single-flight page fetching.
//!
//! # Overview
//!
//! A `PageSource` fetches one page. The `FetchCoordinator` wraps a source,
//! keeps at most one request in flight, and publishes a `FetchOutcome`
//! only for the request that is still current. Superseded requests are
//! cancelled and their resolutions dropped.

mod coordinator;
mod source;

pub use coordinator::{FetchCoordinator, FetchOutcome, Settled};
pub use source::{HttpPageSource, Page, PageSource, LIMIT_PARAM};

#[cfg(test)]
mod tests;
