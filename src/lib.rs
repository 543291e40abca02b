//! # Sentiment Dashboard
//!
//! A reactive view over company feedback analytics. The remote aggregation
//! service classifies feedback as positive, negative or neutral; this crate
//! fetches the tallies and turns them into a bar chart description.
//!
//! ## Modules
//!
//! - [`analytics`]: Filter normalization, count types and the HTTP client
//! - [`dashboard`]: View-model state machine and its async driver
//! - [`chart`]: Pure chart renderer producing a [`ChartSpec`]
//! - [`router`]: Maps shell paths to screens
//! - [`terminal`]: Draws a [`ChartSpec`] as text
//! - [`config`]: TOML configuration with environment overrides
//! - [`telemetry`]: Logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sentiment_dashboard::{chart, AnalyticsClient, Dashboard, ServiceConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(AnalyticsClient::new(ServiceConfig::default())?);
//!
//!     // Mount a dashboard scoped to one company
//!     let dashboard = Dashboard::mount(client, "Acme Corp");
//!     let state = dashboard.settled().await;
//!
//!     let spec = chart::render(&state.counts, &state.filter);
//!     println!("{}: {:?}", spec.title, spec.values());
//!
//!     dashboard.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod router;
pub mod telemetry;
pub mod terminal;

pub use analytics::{
    AnalyticsClient, AnalyticsCounts, AnalyticsSource, ClassifyOutcome, CompanyAnalytics,
    CompanyBreakdown, FeedbackError, FetchError, NormalizedFilter, Sentiment,
};

pub use chart::{ChartSpec, Rgba, YAxis};

pub use config::{Config, ConfigError, DashboardConfig, LoggingConfig, ServiceConfig};

pub use dashboard::{
    Completion, Dashboard, DashboardError, DashboardModel, FetchTicket, Transition, ViewState,
};

pub use router::{Route, RouteError, Router, Screen};
