//! Analytics Dashboard
//!
//! The view-model behind the dashboard screen.
//!
//! ## Data Flow
//!
//! 1. The shell mounts a [`Dashboard`] with a company parameter
//! 2. Each parameter change is sent to the driver as a command
//! 3. [`DashboardModel`] decides between Idle-Zero and a new fetch
//! 4. Fetch results come back tagged with their generation; stale ones drop
//! 5. Settled states are published for the chart surface to redraw

mod model;
mod runtime;

pub use model::{Completion, DashboardModel, FetchTicket, Transition, ViewState};
pub use runtime::{Dashboard, DashboardError};
