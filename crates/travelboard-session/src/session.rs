//! Search session state machine.
//!
//! `SearchSession` owns the query, page, total-pages bound, accumulated
//! results, and loading/error status. It performs no I/O: every operation
//! that needs the search provider returns a [`FetchTicket`], and the caller
//! hands the provider's outcome back through [`SearchSession::complete`].
//! Several tickets may be outstanding at once; only the most recently issued
//! one is applied, older completions are reported as [`Completion::Stale`].
//!
//! Navigation writes produced by `submit_search` and `load_more` are queued
//! and drained with [`SearchSession::drain_navigation_writes`]. When the
//! navigator later reports one of those states back, the observation is
//! treated as the echo of our own write and does not trigger another fetch.

use std::collections::VecDeque;

use travelboard_core::error::{ProviderError, ValidationError};
use travelboard_core::models::{Photo, SearchPage};

use crate::dedup::{MergeMode, ResultSet};
use crate::navigation::NavigationState;

/// Loading status of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchStatus {
    Idle,
    Loading,
    Error,
}

impl SearchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one issued search request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: String,
    pub page: u32,
    pub mode: MergeMode,
}

/// What happened when a completion was handed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Results merged; `admitted` new photos were added.
    Applied { admitted: usize },
    /// The provider failed; prior results are untouched.
    Failed { message: String },
    /// A newer request superseded this one; nothing changed.
    Stale,
}

/// Trim `text` and reject it when nothing is left.
pub fn validate_query(text: &str) -> Result<String, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyQuery);
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Clone)]
pub struct SearchSession {
    draft: String,
    query: String,
    page: u32,
    total_pages: Option<u32>,
    results: ResultSet,
    status: SearchStatus,
    error_message: Option<String>,
    generation: u64,
    in_flight: Option<FetchTicket>,
    pending_echoes: VecDeque<NavigationState>,
    outbox: Vec<NavigationState>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            draft: String::new(),
            query: String::new(),
            page: 1,
            total_pages: None,
            results: ResultSet::new(),
            status: SearchStatus::Idle,
            error_message: None,
            generation: 0,
            in_flight: None,
            pending_echoes: VecDeque::new(),
            outbox: Vec::new(),
        }
    }

    // -- operations --------------------------------------------------------

    /// Stage a candidate query. Does not fetch.
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Start a fresh session for the staged query.
    ///
    /// Returns `None` (and changes nothing) when the trimmed draft is empty.
    pub fn submit_search(&mut self) -> Option<FetchTicket> {
        let query = validate_query(&self.draft).ok()?;
        self.query = query;
        self.page = 1;
        self.total_pages = None;
        self.results.clear();
        self.emit_navigation(NavigationState::new(&self.query, 1));
        Some(self.issue(MergeMode::Replace, 1))
    }

    /// Request the next page, appending its results.
    ///
    /// Returns `None` unless the total-pages bound is known, the current page
    /// is below it, and nothing is loading.
    pub fn load_more(&mut self) -> Option<FetchTicket> {
        if !self.can_load_more() {
            return None;
        }
        let next = self.page + 1;
        self.emit_navigation(NavigationState::new(&self.query, next));
        Some(self.issue(MergeMode::Append, next))
    }

    /// React to an externally observed navigation state.
    ///
    /// Same query with a strictly greater page appends; anything else
    /// replaces. A different query resets the total-pages bound and the
    /// accumulated results right away. Echoes of our own navigation writes
    /// and observations with an empty query are ignored.
    pub fn sync_from_navigation(&mut self, observed: &NavigationState) -> Option<FetchTicket> {
        if self.consume_echo(observed) {
            return None;
        }
        if observed.query.trim().is_empty() {
            return None;
        }
        let same_query = observed.query == self.query;
        let mode = if same_query && observed.page > self.page {
            MergeMode::Append
        } else {
            MergeMode::Replace
        };
        if !same_query {
            // Nothing from the previous query survives a failed fetch.
            self.total_pages = None;
            self.results.clear();
        }
        self.query = observed.query.clone();
        self.draft = observed.query.clone();
        self.page = observed.page.max(1);
        Some(self.issue(mode, self.page))
    }

    /// Apply the provider outcome for `ticket`.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<SearchPage, ProviderError>,
    ) -> Completion {
        if !self.is_current(ticket) {
            return Completion::Stale;
        }
        self.in_flight = None;
        match outcome {
            Ok(page) => {
                self.total_pages = page.total_pages;
                let admitted = self.results.merge(page.results, ticket.mode);
                self.page = ticket.page;
                self.status = SearchStatus::Idle;
                Completion::Applied { admitted }
            }
            Err(err) => {
                let message = err.search_message();
                self.status = SearchStatus::Error;
                self.error_message = Some(message.clone());
                Completion::Failed { message }
            }
        }
    }

    /// Take the navigation writes queued since the last drain.
    pub fn drain_navigation_writes(&mut self) -> Vec<NavigationState> {
        std::mem::take(&mut self.outbox)
    }

    // -- queries -----------------------------------------------------------

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    pub fn results(&self) -> &[Photo] {
        self.results.items()
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Loading
    }

    /// The request whose completion will be applied, if any.
    pub fn in_flight(&self) -> Option<&FetchTicket> {
        self.in_flight.as_ref()
    }

    /// The `(query, page)` pair the session currently stands on.
    pub fn recorded(&self) -> NavigationState {
        NavigationState {
            query: self.query.clone(),
            page: self.page,
        }
    }

    pub fn can_search(&self) -> bool {
        validate_query(&self.draft).is_ok()
    }

    pub fn can_load_more(&self) -> bool {
        !self.is_loading() && self.total_pages.is_some_and(|total| self.page < total)
    }

    /// Loading with nothing to show yet.
    pub fn is_initial_loading(&self) -> bool {
        self.is_loading() && self.results.is_empty()
    }

    /// Results are shown and no further page is offered.
    pub fn has_reached_end(&self) -> bool {
        !self.results.is_empty() && !self.is_loading() && !self.can_load_more()
    }

    /// City to look up weather for when `photo` is selected: its location,
    /// or the current query when it has none.
    pub fn weather_city_for(&self, photo: &Photo) -> String {
        photo
            .place_name()
            .map(str::to_string)
            .unwrap_or_else(|| self.query.clone())
    }

    // -- internals ---------------------------------------------------------

    fn issue(&mut self, mode: MergeMode, page: u32) -> FetchTicket {
        self.generation += 1;
        let ticket = FetchTicket {
            generation: self.generation,
            query: self.query.clone(),
            page,
            mode,
        };
        self.in_flight = Some(ticket.clone());
        self.status = SearchStatus::Loading;
        self.error_message = None;
        ticket
    }

    fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.in_flight.as_ref() == Some(ticket)
    }

    fn emit_navigation(&mut self, state: NavigationState) {
        self.pending_echoes.push_back(state.clone());
        self.outbox.push(state);
    }

    /// Observers may coalesce writes, so an echo also retires every earlier
    /// pending write. Any other observation clears them all.
    fn consume_echo(&mut self, observed: &NavigationState) -> bool {
        match self.pending_echoes.iter().position(|s| s == observed) {
            Some(idx) => {
                self.pending_echoes.drain(..=idx);
                true
            }
            None => {
                self.pending_echoes.clear();
                false
            }
        }
    }
}
