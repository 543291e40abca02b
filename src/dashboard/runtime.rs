//! Dashboard Driver
//!
//! Runs a [`DashboardModel`] on a tokio task. Filter changes arrive as
//! commands, fetches run as spawned tasks that report back over a channel,
//! and every settled change is published on a watch channel for redraws.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::model::{Completion, DashboardModel, Transition, ViewState};
use crate::analytics::{AnalyticsCounts, AnalyticsSource, FetchError};

/// Errors from talking to a dashboard driver
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error("Dashboard has been shut down")]
    Closed,
}

#[derive(Debug)]
enum Command {
    SetFilter(String),
    Refresh,
}

type FetchDone = (u64, Result<AnalyticsCounts, FetchError>);

/// A mounted dashboard
pub struct Dashboard {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<ViewState>,
    /// Generations requested so far; one per accepted command
    requested: AtomicU64,
    task: JoinHandle<()>,
}

impl Dashboard {
    /// Mount a dashboard and apply `company` as its first filter.
    ///
    /// Must be called inside a tokio runtime.
    pub fn mount<S>(source: Arc<S>, company: impl Into<String>) -> Self
    where
        S: AnalyticsSource + ?Sized + 'static,
    {
        let model = DashboardModel::new();
        let (publish, state) = watch::channel(model.state().clone());
        let (commands, command_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(drive(source, model, command_rx, publish));

        let dashboard = Self {
            commands,
            state,
            requested: AtomicU64::new(0),
            task,
        };
        // The receiver is alive until `task` ends, which it cannot do yet.
        let _ = dashboard.send(Command::SetFilter(company.into()));
        dashboard
    }

    /// Notify the dashboard that the company parameter changed
    pub fn set_company(&self, company: impl Into<String>) -> Result<(), DashboardError> {
        self.send(Command::SetFilter(company.into()))
    }

    /// Fetch the current filter again
    pub fn refresh(&self) -> Result<(), DashboardError> {
        self.send(Command::Refresh)
    }

    fn send(&self, command: Command) -> Result<(), DashboardError> {
        self.commands
            .send(command)
            .map_err(|_| DashboardError::Closed)?;
        self.requested.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Observe every published state
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.clone()
    }

    /// Latest published state
    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Wait until every command sent so far has settled.
    ///
    /// There is no timeout: if the service never answers this never returns.
    /// If the driver stops first, the last published state is returned.
    pub async fn settled(&self) -> ViewState {
        let target = self.requested.load(Ordering::SeqCst);
        let mut rx = self.state.clone();

        let result = rx
            .wait_for(|s| s.generation >= target && !s.loading)
            .await
            .map(|s| ViewState::clone(&s));

        match result {
            Ok(state) => state,
            Err(_) => rx.borrow().clone(),
        }
    }

    /// Stop the driver. Results of in-flight fetches are discarded.
    pub async fn shutdown(self) {
        let Dashboard { commands, task, .. } = self;
        drop(commands);
        if let Err(e) = task.await {
            tracing::error!("Dashboard driver panicked: {}", e);
        }
    }
}

async fn drive<S>(
    source: Arc<S>,
    mut model: DashboardModel,
    mut commands: mpsc::UnboundedReceiver<Command>,
    publish: watch::Sender<ViewState>,
) where
    S: AnalyticsSource + ?Sized + 'static,
{
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<FetchDone>();

    loop {
        let changed = tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else { break };
                let transition = match command {
                    Command::SetFilter(filter) => model.set_filter(&filter),
                    Command::Refresh => model.refresh(),
                };

                if let Transition::Fetch(ticket) = transition {
                    let source = Arc::clone(&source);
                    let done = done_tx.clone();
                    tokio::spawn(async move {
                        let result = source.fetch_analytics(&ticket.filter).await;
                        // Driver may be gone by now.
                        let _ = done.send((ticket.generation, result));
                    });
                }
                true
            }
            Some((generation, result)) = done_rx.recv() => {
                model.complete(generation, result) != Completion::Stale
            }
        };

        if changed {
            publish.send_replace(model.state().clone());
        }
    }

    tracing::debug!(generation = model.generation(), "Dashboard driver stopped");
}
