//! Search state controller: filter criteria, pagination cursor and the
//! latest result set.
//!
//! Every fetch is tagged with a monotonically increasing sequence number
//! when it is issued. Only the outcome carrying the latest number is
//! applied; anything older is discarded whatever order responses arrive in.
//! Issuing a fetch ([`SearchController::set_filter`] and friends) and
//! running it ([`SearchFetch::execute`]) are separate steps so callers can
//! keep several in flight; the `async` helpers do both for the common case.

use std::sync::Arc;

use desaparecidos_client::ApiError;
use desaparecidos_core::model::DEFAULT_PAGE_SIZE;
use desaparecidos_core::{Person, PersonResponse, PersonSearch, SearchFilter};
use tracing::{debug, info};

use crate::api::PersonsApi;
use crate::notice::{Notice, Notifier};

/// Whether a resolved fetch changed the controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// Superseded by a later fetch; dropped.
    Stale,
}

/// Pagination snapshot of the last successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub total_elements: u64,
    pub total_pages: u32,
    pub current_page: u32,
    pub size: u32,
    pub first: bool,
    pub last: bool,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            total_elements: 0,
            total_pages: 0,
            current_page: 0,
            size: DEFAULT_PAGE_SIZE,
            first: true,
            last: true,
        }
    }
}

impl From<&PersonResponse> for Pagination {
    fn from(page: &PersonResponse) -> Self {
        Self {
            total_elements: page.total_elements,
            total_pages: page.total_pages,
            current_page: page.number,
            size: page.size,
            first: page.first,
            last: page.last,
        }
    }
}

/// What the view renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// Kept across failed fetches.
    pub persons: Vec<Person>,
    pub loading: bool,
    pub error: Option<String>,
    pub pagination: Pagination,
}

/// An issued, not yet executed, search.
pub struct SearchFetch<A: ?Sized> {
    seq: u64,
    query: PersonSearch,
    api: Arc<A>,
}

impl<A: PersonsApi + ?Sized> SearchFetch<A> {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &PersonSearch {
        &self.query
    }

    /// Perform the request. Never cancelled once started.
    pub async fn execute(self) -> SearchOutcome {
        let result = self.api.search_persons(&self.query).await;
        SearchOutcome {
            seq: self.seq,
            query: self.query,
            result,
        }
    }
}

/// A completed search waiting to be applied.
#[derive(Debug)]
pub struct SearchOutcome {
    pub seq: u64,
    pub query: PersonSearch,
    pub result: Result<PersonResponse, ApiError>,
}

pub struct SearchController<A: ?Sized> {
    api: Arc<A>,
    notifier: Arc<dyn Notifier>,
    query: PersonSearch,
    state: SearchState,
    issued: u64,
}

impl<A: PersonsApi + ?Sized> SearchController<A> {
    /// Create an idle controller holding `initial` as the current query.
    pub fn new(api: Arc<A>, notifier: Arc<dyn Notifier>, initial: PersonSearch) -> Self {
        Self {
            api,
            notifier,
            query: initial,
            state: SearchState::default(),
            issued: 0,
        }
    }

    /// Create a controller and load `initial`.
    pub async fn open(api: Arc<A>, notifier: Arc<dyn Notifier>, initial: PersonSearch) -> Self {
        let mut controller = Self::new(api, notifier, initial);
        controller.refresh().await;
        controller
    }

    /// The most recently issued query.
    pub fn query(&self) -> &PersonSearch {
        &self.query
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Issue a fetch of the current query.
    pub fn reload(&mut self) -> SearchFetch<A> {
        self.issue(self.query.clone())
    }

    /// Issue a fetch with `filter`; the page index goes back to 0.
    pub fn set_filter(&mut self, filter: SearchFilter) -> SearchFetch<A> {
        let query = self.query.with_filter(filter);
        self.issue(query)
    }

    /// Issue a fetch of `page`; filters stay as they are.
    pub fn change_page(&mut self, page: u32) -> SearchFetch<A> {
        let query = self.query.with_page(page);
        self.issue(query)
    }

    /// Issue a fetch with every filter cleared, from page 0.
    pub fn clear_filters(&mut self) -> SearchFetch<A> {
        self.set_filter(SearchFilter::default())
    }

    fn issue(&mut self, query: PersonSearch) -> SearchFetch<A> {
        self.issued += 1;
        self.query = query.clone();
        self.state.loading = true;
        self.state.error = None;
        debug!(seq = self.issued, page = query.page, "search issued");
        SearchFetch {
            seq: self.issued,
            query,
            api: Arc::clone(&self.api),
        }
    }

    /// Apply a completed fetch unless a later one has been issued since.
    pub fn resolve(&mut self, outcome: SearchOutcome) -> Resolution {
        if outcome.seq != self.issued {
            debug!(
                seq = outcome.seq,
                latest = self.issued,
                "discarding superseded search result"
            );
            return Resolution::Stale;
        }

        self.state.loading = false;
        match outcome.result {
            Ok(page) => {
                info!(
                    count = page.content.len(),
                    page = page.number,
                    total = page.total_elements,
                    "search results loaded"
                );
                self.state.pagination = Pagination::from(&page);
                self.state.persons = page.content;
                self.state.error = None;
            }
            Err(err) => {
                self.notifier.notify(Notice::error(err.message.clone()));
                self.state.error = Some(err.message);
            }
        }
        Resolution::Applied
    }

    /// Fetch the current query again and apply it.
    pub async fn refresh(&mut self) -> Resolution {
        let fetch = self.reload();
        let outcome = fetch.execute().await;
        self.resolve(outcome)
    }

    /// Apply `filter` from page 0 and wait for the result.
    pub async fn search(&mut self, filter: SearchFilter) -> Resolution {
        let fetch = self.set_filter(filter);
        let outcome = fetch.execute().await;
        self.resolve(outcome)
    }

    /// Move to `page` and wait for the result.
    pub async fn go_to_page(&mut self, page: u32) -> Resolution {
        let fetch = self.change_page(page);
        let outcome = fetch.execute().await;
        self.resolve(outcome)
    }
}
