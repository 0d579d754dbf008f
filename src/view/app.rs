//! Invoices host
//!
//! Owns the location history and whichever screen the current location
//! resolves to. Page changes rewrite the current history entry; opening
//! a detail pushes a new one and going back pops it.

use super::detail::InvoiceDetail;
use super::invoices::InvoiceList;
use super::router::{detail_location, list_location, History, Route};
use crate::fetch::PageSource;
use crate::pagination::PageRequest;
use crate::types::{Invoice, InvoiceClick, PageChange};
use std::sync::Arc;
use tracing::{debug, info};

/// The screen currently shown
#[derive(Debug)]
pub enum Screen {
    List(InvoiceList),
    Detail(InvoiceDetail),
}

/// Headless invoices application
pub struct InvoicesApp {
    source: Arc<dyn PageSource<Invoice>>,
    history: History,
    screen: Screen,
}

impl InvoicesApp {
    /// Open the application at `location`
    pub fn open(source: Arc<dyn PageSource<Invoice>>, location: &str) -> Self {
        let history = History::new(location);
        let screen = Self::mount(&source, &Route::resolve(location), None);
        let mut app = Self {
            source,
            history,
            screen,
        };
        app.sync_location();
        app
    }

    pub fn location(&self) -> &str {
        self.history.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn list(&self) -> Option<&InvoiceList> {
        match &self.screen {
            Screen::List(list) => Some(list),
            Screen::Detail(_) => None,
        }
    }

    pub fn detail(&self) -> Option<&InvoiceDetail> {
        match &self.screen {
            Screen::Detail(detail) => Some(detail),
            Screen::List(_) => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.list().is_some_and(InvoiceList::is_loading)
    }

    /// Show the list at the requested page.
    ///
    /// The current history entry is rewritten rather than pushed. A list
    /// already on that page is left alone; otherwise the list is remounted
    /// at the new page, which cancels whatever it had in flight.
    pub fn on_page_change(&mut self, change: PageChange) {
        let request = PageRequest::from(change);
        self.replace_location(request);

        let current = self.list().map(|list| list.paginator().request());
        if current != Some(request) {
            info!("Navigating to {}", self.history.current());
            self.screen = Screen::List(InvoiceList::mount(Arc::clone(&self.source), request));
        }
    }

    /// Open the detail view for an invoice
    pub fn on_invoice_click(&mut self, click: InvoiceClick) {
        let invoice = self
            .list()
            .and_then(|list| list.find(&click.id))
            .cloned();
        let location = detail_location(&click.id);
        info!("Opening {}", location);

        self.history.push(location);
        self.screen = Screen::Detail(InvoiceDetail::new(click.id, invoice));
    }

    /// Open the detail view for the invoice at `index` on the current page
    pub fn open_invoice(&mut self, index: usize) -> bool {
        let click = self
            .list()
            .and_then(|list| list.invoice(index))
            .map(InvoiceClick::from);
        match click {
            Some(click) => {
                self.on_invoice_click(click);
                true
            }
            None => false,
        }
    }

    pub fn next_page(&mut self) -> bool {
        let change = match &mut self.screen {
            Screen::List(list) => list.next_page(),
            Screen::Detail(_) => None,
        };
        self.apply_change(change)
    }

    pub fn previous_page(&mut self) -> bool {
        let change = match &mut self.screen {
            Screen::List(list) => list.previous_page(),
            Screen::Detail(_) => None,
        };
        self.apply_change(change)
    }

    /// Re-issue the request for the current page
    pub fn refresh(&mut self) -> bool {
        match &mut self.screen {
            Screen::List(list) => {
                list.refresh();
                true
            }
            Screen::Detail(_) => false,
        }
    }

    /// Step back in history and remount whatever is there
    pub fn go_back(&mut self) -> bool {
        if !self.history.back() {
            return false;
        }
        let route = Route::resolve(self.history.current());
        info!("Back to {}", self.history.current());
        self.screen = Self::mount(&self.source, &route, Some(&self.screen));
        self.sync_location();
        true
    }

    /// Wait for the list's in-flight request, if any
    pub async fn settle(&mut self) -> bool {
        match &mut self.screen {
            Screen::List(list) => list.settle().await,
            Screen::Detail(_) => false,
        }
    }

    pub fn render(&self) -> String {
        match &self.screen {
            Screen::List(list) => list.render(),
            Screen::Detail(detail) => detail.render(),
        }
    }

    fn apply_change(&mut self, change: Option<PageChange>) -> bool {
        match change {
            Some(change) => {
                self.replace_location(change.into());
                true
            }
            None => false,
        }
    }

    fn replace_location(&mut self, request: PageRequest) {
        let location = list_location(request);
        debug!("Replacing location with {}", location);
        self.history.replace(location);
    }

    /// Canonicalise the current entry after mounting a screen
    fn sync_location(&mut self) {
        if let Screen::List(list) = &self.screen {
            let request = list.paginator().request();
            self.replace_location(request);
        }
    }

    fn mount(
        source: &Arc<dyn PageSource<Invoice>>,
        route: &Route,
        previous: Option<&Screen>,
    ) -> Screen {
        match route {
            Route::List(request) => Screen::List(InvoiceList::mount(Arc::clone(source), *request)),
            Route::Redirect => {
                Screen::List(InvoiceList::mount(Arc::clone(source), PageRequest::default()))
            }
            Route::Detail { id } => {
                let invoice = match previous {
                    Some(Screen::List(list)) => list.find(id).cloned(),
                    Some(Screen::Detail(detail)) if detail.id() == id => detail.invoice().cloned(),
                    _ => None,
                };
                Screen::Detail(InvoiceDetail::new(id.clone(), invoice))
            }
        }
    }
}

impl std::fmt::Debug for InvoicesApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvoicesApp")
            .field("history", &self.history)
            .field("screen", &self.screen)
            .finish_non_exhaustive()
    }
}
