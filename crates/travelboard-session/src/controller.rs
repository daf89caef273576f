//! Async driver for the search session.
//!
//! `SearchController` wires a [`SearchSession`] to a search provider and a
//! navigator: each operation issues its request, forwards queued navigation
//! writes, awaits the provider, and applies the outcome. Failures never
//! escape; they end up in the session's status and error message.

use std::sync::Arc;

use travelboard_core::config::SearchConfig;

use crate::event::{discarding_sink, SessionEvent, SessionEventKind, SessionEventSink};
use crate::navigation::{NavigationState, Navigator};
use crate::service::SearchProvider;
use crate::session::{Completion, FetchTicket, SearchSession};

pub struct SearchController {
    session: SearchSession,
    provider: Arc<dyn SearchProvider>,
    navigator: Arc<dyn Navigator>,
    page_size: u32,
    events: Arc<dyn SessionEventSink>,
}

impl SearchController {
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        navigator: Arc<dyn Navigator>,
        config: &SearchConfig,
    ) -> Self {
        Self {
            session: SearchSession::new(),
            provider,
            navigator,
            page_size: config.page_size,
            events: discarding_sink(),
        }
    }

    pub fn with_event_sink(mut self, events: Arc<dyn SessionEventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    /// Initial load: sync with whatever the navigator currently shows.
    pub async fn start(&mut self) -> Option<Completion> {
        let current = self.navigator.current();
        self.sync_from_navigation(&current).await
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.session.set_query(text);
    }

    /// Submit the staged query. `None` when the query is empty.
    pub async fn submit_search(&mut self) -> Option<Completion> {
        let Some(ticket) = self.session.submit_search() else {
            tracing::debug!(draft = self.session.draft(), "ignoring empty search");
            return None;
        };
        Some(self.run(ticket).await)
    }

    /// Fetch and append the next page. `None` when no further page is offered.
    pub async fn load_more(&mut self) -> Option<Completion> {
        let ticket = self.session.load_more()?;
        Some(self.run(ticket).await)
    }

    /// Handle a navigation change reported by the navigator's observer.
    pub async fn sync_from_navigation(&mut self, observed: &NavigationState) -> Option<Completion> {
        let Some(ticket) = self.session.sync_from_navigation(observed) else {
            tracing::debug!(observed = %observed, "navigation echo or empty query, no fetch");
            return None;
        };
        Some(self.run(ticket).await)
    }

    async fn run(&mut self, ticket: FetchTicket) -> Completion {
        for state in self.session.drain_navigation_writes() {
            self.navigator.replace(&state);
            self.events.record(SessionEvent::success(
                &state.query,
                SessionEventKind::NavigationWrite,
                format!("replace {state}"),
            ));
        }

        tracing::debug!(
            query = %ticket.query,
            page = ticket.page,
            mode = %ticket.mode,
            generation = ticket.generation,
            "search issued"
        );
        self.events.record(SessionEvent::success(
            &ticket.query,
            SessionEventKind::SearchIssued,
            format!("page {} ({})", ticket.page, ticket.mode),
        ));

        let outcome = self
            .provider
            .search(&ticket.query, ticket.page, self.page_size)
            .await;
        if let Err(err) = &outcome {
            tracing::warn!(query = %ticket.query, page = ticket.page, error = %err, "search failed");
        }

        let completion = self.session.complete(&ticket, outcome);
        self.record_completion(&ticket, &completion);
        completion
    }

    fn record_completion(&self, ticket: &FetchTicket, completion: &Completion) {
        let event = match completion {
            Completion::Applied { admitted } => SessionEvent::success(
                &ticket.query,
                SessionEventKind::SearchApplied,
                format!(
                    "page {} admitted {admitted}, {} total",
                    ticket.page,
                    self.session.results().len()
                ),
            ),
            Completion::Failed { message } => {
                SessionEvent::failure(&ticket.query, SessionEventKind::SearchFailed, message.clone())
            }
            Completion::Stale => SessionEvent::success(
                &ticket.query,
                SessionEventKind::SearchDiscarded,
                format!("superseded page {} result", ticket.page),
            ),
        };
        self.events.record(event);
    }
}
