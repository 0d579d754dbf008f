//! Paginated fetch coordinator
//!
//! Owns at most one in-flight page request. Every `fetch` cancels the
//! previous request's token before spawning the new one, and every
//! resolution is tagged with the generation it was issued under. Only a
//! resolution of the current generation may produce a terminal outcome.

use super::source::{Page, PageSource};
use crate::error::{Error, Result};
use crate::pagination::PageRequest;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// State of the most recent fetch attempt
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    /// A request is outstanding
    Loading,
    /// The request failed for a reason other than cancellation
    Failed {
        /// Error text, for logs and diagnostics only
        reason: String,
    },
    /// The request completed
    Succeeded { items: Vec<T>, total_pages: u32 },
}

impl<T> FetchOutcome<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// Resolution of one spawned request
#[derive(Debug)]
pub(crate) struct Resolution<T> {
    pub(crate) generation: u64,
    pub(crate) request: PageRequest,
    pub(crate) result: Result<Page<T>>,
}

/// A terminal outcome applied by the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settled {
    /// The request the outcome belongs to
    pub request: PageRequest,
    /// Server page count when the request succeeded
    pub total_pages: Option<u32>,
}

/// Cancel-then-fetch coordinator scoped to one view
pub struct FetchCoordinator<T> {
    source: Arc<dyn PageSource<T>>,
    generation: u64,
    in_flight: Option<InFlight>,
    outcome: Option<FetchOutcome<T>>,
    /// Outcome before the current attempt started; restored on cancel
    settled: Option<FetchOutcome<T>>,
    tx: mpsc::UnboundedSender<Resolution<T>>,
    rx: mpsc::UnboundedReceiver<Resolution<T>>,
}

#[derive(Debug)]
struct InFlight {
    request: PageRequest,
    token: CancellationToken,
}

impl<T: Send + 'static> FetchCoordinator<T> {
    /// Create a coordinator over the given page source
    pub fn new(source: Arc<dyn PageSource<T>>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            generation: 0,
            in_flight: None,
            outcome: None,
            settled: None,
            tx,
            rx,
        }
    }

    /// Outcome of the latest attempt; `None` before the first fetch
    pub fn outcome(&self) -> Option<&FetchOutcome<T>> {
        self.outcome.as_ref()
    }

    /// Whether a request is outstanding
    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The request currently in flight, if any
    pub fn pending_request(&self) -> Option<PageRequest> {
        self.in_flight.as_ref().map(|f| f.request)
    }

    /// Cancel the previous request and issue a new one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn fetch(&mut self, request: PageRequest) {
        self.cancel();

        self.generation += 1;
        let generation = self.generation;
        let token = CancellationToken::new();
        self.in_flight = Some(InFlight {
            request,
            token: token.clone(),
        });
        self.settled = self.outcome.replace(FetchOutcome::Loading);

        debug!(
            "Fetching page {} (size {}), generation {}",
            request.page, request.page_size, generation
        );

        let source = Arc::clone(&self.source);
        let reply = Reply {
            tx: self.tx.clone(),
            generation,
            request,
            sent: false,
        };
        tokio::spawn(async move {
            let result = tokio::select! {
                () = token.cancelled() => Err(Error::Cancelled),
                result = source.fetch_page(request) => result,
            };
            reply.send(result);
        });
    }

    /// Cancel the in-flight request, if any.
    ///
    /// A cancelled attempt never emits; the outcome reverts to whatever
    /// it was before that attempt started.
    pub fn cancel(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            debug!(
                "Cancelling page {} (size {}), generation {}",
                in_flight.request.page, in_flight.request.page_size, self.generation
            );
            in_flight.token.cancel();
            self.outcome = self.settled.take();
        }
    }

    /// Wait for the current request to reach a terminal outcome.
    ///
    /// Stale and cancelled resolutions are discarded along the way.
    /// Returns `None` when nothing is in flight.
    pub async fn settle(&mut self) -> Option<Settled> {
        while self.in_flight.is_some() {
            let resolution = self.rx.recv().await?;
            if let Some(settled) = self.apply(resolution) {
                return Some(settled);
            }
        }
        None
    }

    /// Apply one resolution; returns the settled request when it was current.
    pub(crate) fn apply(&mut self, resolution: Resolution<T>) -> Option<Settled> {
        let Resolution {
            generation,
            request,
            result,
        } = resolution;

        if generation != self.generation || self.in_flight.is_none() {
            match &result {
                Err(e) if e.is_cancelled() => {
                    debug!("Page {} request was cancelled", request.page);
                }
                _ => debug!(
                    "Discarding stale resolution for page {} (generation {}, current {})",
                    request.page, generation, self.generation
                ),
            }
            return None;
        }

        // Cancelling always clears `in_flight`, so a current resolution is
        // never one this coordinator cancelled. A `Cancelled` error here came
        // from the source itself and counts as a failure.
        match result {
            Ok(page) => {
                self.in_flight = None;
                let total_pages = page.total_pages;
                self.outcome = Some(FetchOutcome::Succeeded {
                    items: page.items,
                    total_pages,
                });
                Some(Settled {
                    request,
                    total_pages: Some(total_pages),
                })
            }
            Err(e) => {
                self.in_flight = None;
                warn!("Failed to load page {}: {}", request.page, e);
                self.outcome = Some(FetchOutcome::Failed {
                    reason: e.to_string(),
                });
                Some(Settled {
                    request,
                    total_pages: None,
                })
            }
        }
    }
}

/// Sends the resolution of one spawned request.
///
/// If the request task unwinds before replying, the drop sends a failure
/// instead so the coordinator never waits on a resolution that cannot come.
struct Reply<T> {
    tx: mpsc::UnboundedSender<Resolution<T>>,
    generation: u64,
    request: PageRequest,
    sent: bool,
}

impl<T> Reply<T> {
    fn send(mut self, result: Result<Page<T>>) {
        self.sent = true;
        self.deliver(result);
    }

    fn deliver(&self, result: Result<Page<T>>) {
        // Receiver only goes away with the coordinator
        let _ = self.tx.send(Resolution {
            generation: self.generation,
            request: self.request,
            result,
        });
    }
}

impl<T> Drop for Reply<T> {
    fn drop(&mut self) {
        if !self.sent {
            self.deliver(Err(Error::Other(format!(
                "Page {} request ended without a response",
                self.request.page
            ))));
        }
    }
}

impl<T> Drop for FetchCoordinator<T> {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.token.cancel();
        }
    }
}

impl<T> std::fmt::Debug for FetchCoordinator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchCoordinator")
            .field("generation", &self.generation)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}
