//! Session event recording for audit and debugging.
//!
//! The controllers emit an event at each decision point (request issued,
//! result applied or discarded, favorite saved, persistence failed) so the
//! history of a browsing session can be inspected after the fact.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::storage::lock;

/// The kind of controller decision that generated an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEventKind {
    SearchIssued,
    SearchApplied,
    SearchFailed,
    SearchDiscarded,
    NavigationWrite,
    FavoritesLoaded,
    FavoriteAdded,
    FavoriteRemoved,
    PersistFailed,
    WeatherRequested,
    WeatherReady,
    WeatherUnavailable,
    WeatherDiscarded,
}

impl std::fmt::Display for SessionEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SearchIssued => "search_issued",
            Self::SearchApplied => "search_applied",
            Self::SearchFailed => "search_failed",
            Self::SearchDiscarded => "search_discarded",
            Self::NavigationWrite => "navigation_write",
            Self::FavoritesLoaded => "favorites_loaded",
            Self::FavoriteAdded => "favorite_added",
            Self::FavoriteRemoved => "favorite_removed",
            Self::PersistFailed => "persist_failed",
            Self::WeatherRequested => "weather_requested",
            Self::WeatherReady => "weather_ready",
            Self::WeatherUnavailable => "weather_unavailable",
            Self::WeatherDiscarded => "weather_discarded",
        };
        f.write_str(s)
    }
}

/// Outcome attached to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEventOutcome {
    Success,
    Error(String),
}

impl std::fmt::Display for SessionEventOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Error(msg) => write!(f, "error: {msg}"),
        }
    }
}

/// An event emitted by one of the session controllers.
#[derive(Debug, Clone)]
pub struct SessionEvent {
    pub timestamp: DateTime<Utc>,
    /// Query, photo id, or city the event is about.
    pub subject: Option<String>,
    pub kind: SessionEventKind,
    pub outcome: SessionEventOutcome,
    pub detail: String,
}

impl SessionEvent {
    pub fn new(
        subject: Option<String>,
        kind: SessionEventKind,
        outcome: SessionEventOutcome,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            subject,
            kind,
            outcome,
            detail: detail.into(),
        }
    }

    pub fn success(subject: &str, kind: SessionEventKind, detail: impl Into<String>) -> Self {
        Self::new(
            Some(subject.to_string()),
            kind,
            SessionEventOutcome::Success,
            detail,
        )
    }

    pub fn failure(subject: &str, kind: SessionEventKind, error: impl Into<String>) -> Self {
        let error = error.into();
        Self::new(
            Some(subject.to_string()),
            kind,
            SessionEventOutcome::Error(error.clone()),
            error,
        )
    }
}

/// Trait for sinks that receive session events.
pub trait SessionEventSink: Send + Sync {
    fn record(&self, event: SessionEvent);
}

/// Any `Fn(SessionEvent)` closure can act as a sink.
impl<F> SessionEventSink for F
where
    F: Fn(SessionEvent) + Send + Sync,
{
    fn record(&self, event: SessionEvent) {
        self(event)
    }
}

/// Sink used when the caller did not attach one.
pub fn discarding_sink() -> Arc<dyn SessionEventSink> {
    Arc::new(|_event: SessionEvent| {})
}

/// Log of recorded events.
///
/// `drain` hands back everything recorded since the previous drain, which
/// lets a caller look at the events of one step in isolation.
#[derive(Default)]
pub struct EventLog {
    entries: Mutex<Vec<SessionEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<SessionEvent> {
        lock(&self.entries).clone()
    }

    pub fn drain(&self) -> Vec<SessionEvent> {
        std::mem::take(&mut *lock(&self.entries))
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Kinds of all recorded events, in order.
    pub fn kinds(&self) -> Vec<SessionEventKind> {
        lock(&self.entries).iter().map(|e| e.kind).collect()
    }
}

impl SessionEventSink for EventLog {
    fn record(&self, event: SessionEvent) {
        lock(&self.entries).push(event);
    }
}

/// Sink that forwards every event to `tracing`.
///
/// Failures are logged at `warn`, discarded results at `debug`, everything
/// else at `info`.
pub struct TracingEventSink;

impl SessionEventSink for TracingEventSink {
    fn record(&self, event: SessionEvent) {
        let subject = event.subject.as_deref().unwrap_or("-");
        match (&event.outcome, event.kind) {
            (SessionEventOutcome::Error(err), kind) => {
                tracing::warn!(kind = %kind, subject, error = %err, "{}", event.detail);
            }
            (_, SessionEventKind::SearchDiscarded | SessionEventKind::WeatherDiscarded) => {
                tracing::debug!(kind = %event.kind, subject, "{}", event.detail);
            }
            (_, kind) => {
                tracing::info!(kind = %kind, subject, "{}", event.detail);
            }
        }
    }
}
