//! Dashboard View-Model
//!
//! A synchronous state machine over [`ViewState`]. It decides when a fetch is
//! needed and which completions may still touch the state; the async driver
//! in [`super::runtime`] does the actual I/O.
//!
//! Two states:
//!
//! - **Idle-Zero**: blank filter, zero counts, not loading, no request
//! - **Loading-Then-Settled**: a fetch is outstanding for the current
//!   generation, then settles with its result
//!
//! Every filter event starts a new generation. Completions tagged with an
//! older generation are dropped, so a slow response can never overwrite a
//! newer state.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analytics::{AnalyticsCounts, FetchError, NormalizedFilter};

/// Snapshot consumed by the chart surface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    /// Filter exactly as supplied by the shell
    pub filter: String,
    pub counts: AnalyticsCounts,
    pub loading: bool,
    /// Sequence number of the latest filter event
    pub generation: u64,
    /// Message from the most recent failed fetch
    pub last_error: Option<String>,
    /// When counts last came from a successful fetch
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            filter: String::new(),
            counts: AnalyticsCounts::ZERO,
            loading: true,
            generation: 0,
            last_error: None,
            updated_at: None,
        }
    }
}

impl ViewState {
    pub fn normalized_filter(&self) -> NormalizedFilter {
        NormalizedFilter::new(&self.filter)
    }

    /// True in the Idle-Zero state
    pub fn is_idle(&self) -> bool {
        !self.loading && self.normalized_filter().is_empty()
    }
}

/// A fetch the driver must perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub filter: NormalizedFilter,
}

/// What a filter event asks the driver to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Blank filter: state already settled, no request
    Idle,
    /// Issue this fetch and report back with its generation
    Fetch(FetchTicket),
}

/// Outcome of applying a fetch result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Updated,
    Failed,
    /// Result belonged to a superseded generation and was dropped
    Stale,
}

/// Owns one dashboard's [`ViewState`]
#[derive(Debug, Default)]
pub struct DashboardModel {
    state: ViewState,
}

impl DashboardModel {
    /// Fresh model in the mount transient: loading, zero counts
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.state.generation
    }

    /// React to a filter change from the shell
    pub fn set_filter(&mut self, input: &str) -> Transition {
        self.state.filter = input.to_string();
        self.begin()
    }

    /// Re-run the current filter under a new generation
    pub fn refresh(&mut self) -> Transition {
        self.begin()
    }

    fn begin(&mut self) -> Transition {
        self.state.generation += 1;
        let filter = self.state.normalized_filter();

        if filter.is_empty() {
            self.state.counts = AnalyticsCounts::ZERO;
            self.state.loading = false;
            self.state.last_error = None;
            tracing::debug!(
                generation = self.state.generation,
                "Blank filter, showing zero counts"
            );
            return Transition::Idle;
        }

        self.state.loading = true;
        tracing::debug!(generation = self.state.generation, filter = %filter, "Fetch started");
        Transition::Fetch(FetchTicket {
            generation: self.state.generation,
            filter,
        })
    }

    /// Apply the result of the fetch issued for `generation`
    pub fn complete(
        &mut self,
        generation: u64,
        result: Result<AnalyticsCounts, FetchError>,
    ) -> Completion {
        if generation != self.state.generation {
            tracing::debug!(
                generation,
                current = self.state.generation,
                "Dropping stale analytics response"
            );
            return Completion::Stale;
        }

        self.state.loading = false;
        match result {
            Ok(counts) => {
                self.state.counts = counts;
                self.state.last_error = None;
                self.state.updated_at = Some(Utc::now());
                Completion::Updated
            }
            Err(e) => {
                // Previously displayed counts stay on screen.
                tracing::warn!(filter = %self.state.filter, "Error fetching analytics: {}", e);
                self.state.last_error = Some(e.to_string());
                Completion::Failed
            }
        }
    }
}
