//! Incremental page accumulation for one collection view
//!
//! The first load replaces the accumulated set; each "load more" appends the
//! next page in arrival order. Only one load runs at a time, and once the
//! store reports no further pages the accumulator stops issuing requests.

use tracing::{debug, warn};

use crate::error::Result;
use crate::lifecycle::{Generation, Lifecycle, LoadOutcome};
use crate::store::{Page, PageRequest, QueryFilter, RecordStore, RecordStoreExt};
use crate::traits::Record;

/// Whether a page replaces or extends the accumulated set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    Replace,
    Append,
}

/// An issued page request. Hand it back to
/// [`PaginationAccumulator::complete`] with the store's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    generation: Generation,
    pub request: PageRequest,
    pub mode: LoadMode,
}

/// Append-only accumulation of a paged collection.
///
/// # Example
///
/// ```rust,ignore
/// let mut neos = PaginationAccumulator::<NearEarthObject>::new(12);
/// neos.load_initial(&store).await;
///
/// while neos.has_next() {
///     neos.load_more(&store).await;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PaginationAccumulator<T> {
    page_size: u32,
    filter: QueryFilter,
    items: Vec<T>,
    has_next: bool,
    next_offset: u32,
    is_loading: bool,
    loaded: bool,
    lifecycle: Lifecycle,
}

impl<T> PaginationAccumulator<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            filter: QueryFilter::new(),
            items: Vec::new(),
            has_next: false,
            next_offset: 0,
            is_loading: false,
            loaded: false,
            lifecycle: Lifecycle::new(),
        }
    }

    /// Restrict every page request with `filter`
    pub fn with_filter(mut self, filter: QueryFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn next_offset(&self) -> u32 {
        self.next_offset
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// True once a load succeeded and the store reported no further pages
    pub fn is_exhausted(&self) -> bool {
        self.loaded && !self.has_next
    }

    pub fn can_load_more(&self) -> bool {
        self.loaded && self.has_next && !self.is_loading
    }

    /// Start the first page. Any load still in flight becomes stale.
    pub fn begin_initial(&mut self) -> PageTicket {
        let generation = self.lifecycle.mount();
        self.is_loading = true;
        PageTicket {
            generation,
            request: PageRequest::first(self.page_size),
            mode: LoadMode::Replace,
        }
    }

    /// Start the next page, or `None` while a load is in flight or after
    /// the last page.
    pub fn begin_load_more(&mut self) -> Option<PageTicket> {
        if !self.can_load_more() {
            return None;
        }
        self.is_loading = true;
        Some(PageTicket {
            generation: self.lifecycle.current(),
            request: PageRequest::new(self.page_size, self.next_offset),
            mode: LoadMode::Append,
        })
    }

    /// Apply the store's answer to an issued ticket.
    pub fn complete(&mut self, ticket: PageTicket, result: Result<Page<T>>) -> LoadOutcome {
        if !self.lifecycle.is_current(ticket.generation) {
            debug!(skip = ticket.request.skip, "Dropping page for a superseded load");
            return LoadOutcome::Stale;
        }
        self.is_loading = false;

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                warn!(skip = ticket.request.skip, error = %e, "Page load failed");
                return LoadOutcome::Failed(e);
            }
        };

        let received = page.items.len();
        match ticket.mode {
            LoadMode::Replace => self.items = page.items,
            LoadMode::Append => self.items.extend(page.items),
        }
        self.has_next = page.has_next;
        self.next_offset = page
            .next_skip
            .unwrap_or(ticket.request.skip + received as u32);
        self.loaded = true;

        debug!(
            skip = ticket.request.skip,
            received,
            total = self.items.len(),
            has_next = self.has_next,
            "Page applied"
        );
        LoadOutcome::Applied { received }
    }

    /// Drop everything and invalidate any load in flight.
    pub fn reset(&mut self) {
        self.lifecycle.unmount();
        self.items.clear();
        self.has_next = false;
        self.next_offset = 0;
        self.is_loading = false;
        self.loaded = false;
    }
}

impl<T: Record> PaginationAccumulator<T> {
    pub async fn load_initial<S: RecordStore + ?Sized>(&mut self, store: &S) -> LoadOutcome {
        let ticket = self.begin_initial();
        let result = store.fetch_page::<T>(&self.filter, ticket.request).await;
        self.complete(ticket, result)
    }

    pub async fn load_more<S: RecordStore + ?Sized>(&mut self, store: &S) -> LoadOutcome {
        let Some(ticket) = self.begin_load_more() else {
            return LoadOutcome::Skipped;
        };
        let result = store.fetch_page::<T>(&self.filter, ticket.request).await;
        self.complete(ticket, result)
    }
}
