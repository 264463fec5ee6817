//! Detail state controller for a single person.

use std::sync::Arc;

use desaparecidos_client::ApiError;
use desaparecidos_core::Person;
use tracing::{debug, info};

use crate::api::PersonsApi;
use crate::notice::{Notice, Notifier};
use crate::search::Resolution;

/// Parse a route parameter into a person identifier.
///
/// Non-numeric input and `0` are treated as absent.
pub fn parse_person_id(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|id| *id > 0)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailState {
    pub person: Option<Person>,
    pub loading: bool,
    pub error: Option<String>,
}

/// An issued, not yet executed, lookup.
pub struct DetailFetch<A: ?Sized> {
    seq: u64,
    id: u64,
    api: Arc<A>,
}

impl<A: PersonsApi + ?Sized> DetailFetch<A> {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub async fn execute(self) -> DetailOutcome {
        let result = self.api.get_person_by_id(self.id).await;
        DetailOutcome {
            seq: self.seq,
            id: self.id,
            result,
        }
    }
}

#[derive(Debug)]
pub struct DetailOutcome {
    pub seq: u64,
    pub id: u64,
    pub result: Result<Person, ApiError>,
}

pub struct DetailController<A: ?Sized> {
    api: Arc<A>,
    notifier: Arc<dyn Notifier>,
    id: Option<u64>,
    state: DetailState,
    issued: u64,
}

impl<A: PersonsApi + ?Sized> DetailController<A> {
    pub fn new(api: Arc<A>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            id: None,
            state: DetailState::default(),
            issued: 0,
        }
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    /// Switch to `id`. A fetch is issued only when the identifier changes
    /// to a present value.
    ///
    /// Any change drops the shown person and invalidates lookups still in
    /// flight for the previous identifier.
    pub fn select(&mut self, id: Option<u64>) -> Option<DetailFetch<A>> {
        if id == self.id {
            return None;
        }
        self.id = id;
        self.issued += 1;
        self.state = DetailState::default();
        self.refetch()
    }

    /// [`select`](Self::select) from a raw route parameter.
    pub fn select_route(&mut self, raw: &str) -> Option<DetailFetch<A>> {
        self.select(parse_person_id(raw))
    }

    /// Issue a fetch for the current identifier, if any.
    pub fn refetch(&mut self) -> Option<DetailFetch<A>> {
        let id = self.id?;
        self.issued += 1;
        self.state.loading = true;
        self.state.error = None;
        debug!(seq = self.issued, id, "person lookup issued");
        Some(DetailFetch {
            seq: self.issued,
            id,
            api: Arc::clone(&self.api),
        })
    }

    /// Apply a completed lookup unless a later one has been issued since.
    pub fn resolve(&mut self, outcome: DetailOutcome) -> Resolution {
        if outcome.seq != self.issued {
            debug!(
                seq = outcome.seq,
                latest = self.issued,
                id = outcome.id,
                "discarding superseded person lookup"
            );
            return Resolution::Stale;
        }

        self.state.loading = false;
        match outcome.result {
            Ok(person) => {
                info!(id = person.id, "person loaded");
                self.state.person = Some(person);
                self.state.error = None;
            }
            Err(err) => {
                self.notifier.notify(Notice::error(err.message.clone()));
                self.state.error = Some(err.message);
            }
        }
        Resolution::Applied
    }

    /// Select `id` and wait for the lookup. `None` when nothing was fetched.
    pub async fn show(&mut self, id: Option<u64>) -> Option<Resolution> {
        let fetch = self.select(id)?;
        let outcome = fetch.execute().await;
        Some(self.resolve(outcome))
    }

    /// Fetch the current identifier again and wait for it.
    pub async fn refresh(&mut self) -> Option<Resolution> {
        let fetch = self.refetch()?;
        let outcome = fetch.execute().await;
        Some(self.resolve(outcome))
    }
}
