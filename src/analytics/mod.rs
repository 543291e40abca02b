//! Analytics Service Integration
//!
//! Talks to the feedback aggregation service, which classifies submitted
//! feedback and keeps per-company sentiment tallies.
//!
//! ## Architecture
//!
//! - **Types**: filter normalization and the fixed-shape count records
//! - **Client**: REST client for the analytics, classify and reset endpoints
//! - **AnalyticsSource**: the seam the dashboard fetches through
//!
//! ## Endpoints
//!
//! - `GET /analytics/` - per-company breakdown (unfiltered)
//! - `GET /analytics/?company=...` - counts for one company
//! - `POST /classify/` - submit one piece of feedback
//! - `POST /reset/?company=...` - zero a company's tallies

mod client;
mod error;
mod types;

pub use client::{AnalyticsClient, AnalyticsSource};
pub use error::{FeedbackError, FetchError};
pub use types::{
    AnalyticsCounts, ClassifyOutcome, CompanyAnalytics, CompanyBreakdown, NormalizedFilter,
    Sentiment,
};
