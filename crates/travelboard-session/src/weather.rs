//! Weather lookup panel.
//!
//! `closed → loading → {ready | unavailable}`, and back to `closed` from any
//! state. A failed lookup never leaves the panel stuck on loading: it shows a
//! synthetic "Unavailable" report for the requested city instead.
//!
//! Lookups are not cancelled. Each `open` bumps a generation; a completion
//! is applied only while the panel is still loading the same generation and
//! city, so a late answer for a previous city cannot overwrite a newer one
//! or reopen a closed panel.

use std::sync::Arc;

use travelboard_core::error::ProviderError;
use travelboard_core::models::{WeatherObservation, WeatherReport};

use crate::event::{discarding_sink, SessionEvent, SessionEventKind, SessionEventSink};
use crate::service::WeatherProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelStatus {
    Closed,
    Loading,
    Ready,
    Unavailable,
}

impl PanelStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Unavailable => "unavailable",
        }
    }

    pub fn is_open(self) -> bool {
        self != Self::Closed
    }
}

impl std::fmt::Display for PanelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one issued weather lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WeatherTicket {
    pub generation: u64,
    pub city: String,
}

#[derive(Debug, Clone)]
pub struct WeatherPanel {
    status: PanelStatus,
    city: Option<String>,
    report: Option<WeatherReport>,
    generation: u64,
}

impl Default for WeatherPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherPanel {
    pub fn new() -> Self {
        Self {
            status: PanelStatus::Closed,
            city: None,
            report: None,
            generation: 0,
        }
    }

    /// Start loading weather for exactly `city`.
    pub fn open(&mut self, city: &str) -> WeatherTicket {
        self.generation += 1;
        self.status = PanelStatus::Loading;
        self.city = Some(city.to_string());
        self.report = None;
        WeatherTicket {
            generation: self.generation,
            city: city.to_string(),
        }
    }

    /// Apply a lookup outcome. Returns whether the panel changed.
    pub fn complete(
        &mut self,
        ticket: &WeatherTicket,
        outcome: Result<WeatherObservation, ProviderError>,
    ) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        match outcome {
            Ok(obs) => {
                self.report = Some(WeatherReport::from_observation(obs));
                self.status = PanelStatus::Ready;
            }
            Err(_) => {
                self.report = Some(WeatherReport::unavailable(&ticket.city));
                self.status = PanelStatus::Unavailable;
            }
        }
        true
    }

    pub fn close(&mut self) {
        self.status = PanelStatus::Closed;
    }

    pub fn status(&self) -> PanelStatus {
        self.status
    }

    /// City of the most recent `open`.
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    /// Report to display; `None` while loading or closed.
    pub fn report(&self) -> Option<&WeatherReport> {
        if self.status.is_open() {
            self.report.as_ref()
        } else {
            None
        }
    }

    fn is_current(&self, ticket: &WeatherTicket) -> bool {
        self.status == PanelStatus::Loading
            && self.generation == ticket.generation
            && self.city.as_deref() == Some(ticket.city.as_str())
    }
}

/// Async driver for the weather panel.
pub struct WeatherController {
    panel: WeatherPanel,
    provider: Arc<dyn WeatherProvider>,
    events: Arc<dyn SessionEventSink>,
}

impl WeatherController {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self {
            panel: WeatherPanel::new(),
            provider,
            events: discarding_sink(),
        }
    }

    pub fn with_event_sink(mut self, events: Arc<dyn SessionEventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn panel(&self) -> &WeatherPanel {
        &self.panel
    }

    /// Open the panel for `city` and look it up. Returns whether the result
    /// was applied.
    pub async fn open(&mut self, city: &str) -> bool {
        let ticket = self.panel.open(city);
        self.events.record(SessionEvent::success(
            city,
            SessionEventKind::WeatherRequested,
            "lookup issued",
        ));

        let outcome = self.provider.lookup(&ticket.city).await;
        self.apply(&ticket, outcome)
    }

    /// Apply an outcome that arrived for `ticket`.
    pub fn apply(
        &mut self,
        ticket: &WeatherTicket,
        outcome: Result<WeatherObservation, ProviderError>,
    ) -> bool {
        let failure = outcome.as_ref().err().map(ToString::to_string);
        if !self.panel.complete(ticket, outcome) {
            tracing::debug!(city = %ticket.city, "discarding late weather result");
            self.events.record(SessionEvent::success(
                &ticket.city,
                SessionEventKind::WeatherDiscarded,
                format!("generation {} superseded", ticket.generation),
            ));
            return false;
        }
        let event = match failure {
            Some(err) => {
                tracing::warn!(city = %ticket.city, error = %err, "weather lookup failed");
                SessionEvent::failure(&ticket.city, SessionEventKind::WeatherUnavailable, err)
            }
            None => SessionEvent::success(
                &ticket.city,
                SessionEventKind::WeatherReady,
                self.panel
                    .report()
                    .map(|r| format!("{} {}", r.temperature_label(), r.description))
                    .unwrap_or_default(),
            ),
        };
        self.events.record(event);
        true
    }

    pub fn close(&mut self) {
        self.panel.close();
    }
}
