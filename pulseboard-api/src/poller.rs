//! Periodic refresh of the dashboard view.

use pulseboard_client::{ApiClient, CollectionSource, source::fetch_view_model};
use pulseboard_common::{
    dashboard::{CycleFailure, CycleTicket, DashboardState},
    model::view::ViewModel,
    util::PositiveDuration,
};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use time::UtcDateTime;
use tokio::{
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub type DashboardPoller = Poller<ApiClient>;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleOutcome {
    Completed,
    Failed,
    /// Another cycle was already running.
    Skipped,
}

/// The state is only ever locked for short synchronous updates, never across an await.
fn lock(state: &Mutex<DashboardState>) -> MutexGuard<'_, DashboardState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A running cycle. Dropped before it is finished, it records the cycle as failed so the
/// next trigger can start a new one.
struct CycleGuard<'a> {
    state: &'a Mutex<DashboardState>,
    cycle: u64,
    ticket: Option<CycleTicket>,
}

impl<'a> CycleGuard<'a> {
    fn begin(state: &'a Mutex<DashboardState>) -> Option<Self> {
        let ticket = lock(state).begin_cycle()?;

        Some(Self {
            state,
            cycle: ticket.cycle(),
            ticket: Some(ticket),
        })
    }

    fn complete(mut self, view: ViewModel) {
        if let Some(ticket) = self.ticket.take() {
            lock(self.state).complete_cycle(ticket, view);
        }
    }

    fn fail(mut self, message: String) {
        if let Some(ticket) = self.ticket.take() {
            lock(self.state).fail_cycle(ticket, failure(message));
        }
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            warn!(cycle = self.cycle, "Refresh cycle abandoned before finishing");
            lock(self.state).fail_cycle(ticket, failure("Refresh cycle was abandoned".to_owned()));
        }
    }
}

fn failure(message: String) -> CycleFailure {
    CycleFailure {
        at: UtcDateTime::now(),
        message,
    }
}

#[derive(Debug)]
pub struct Poller<S> {
    source: S,
    state: Mutex<DashboardState>,
}

impl<S: CollectionSource + 'static> Poller<S> {
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: Mutex::new(DashboardState::new()),
        }
    }

    /// The latest successfully derived view, if any cycle has completed yet.
    #[must_use]
    pub fn view(&self) -> Option<Arc<ViewModel>> {
        lock(&self.state).view()
    }

    #[must_use]
    pub fn state(&self) -> DashboardState {
        lock(&self.state).clone()
    }

    /// Runs one fetch-and-derive cycle unless one is already in flight.
    ///
    /// Dropping the future mid-cycle records the cycle as failed.
    pub async fn refresh(&self) -> CycleOutcome {
        let Some(guard) = CycleGuard::begin(&self.state) else {
            debug!("Refresh cycle already running, ignoring trigger");
            return CycleOutcome::Skipped;
        };
        let cycle = guard.cycle;
        debug!(cycle, "Starting refresh cycle");

        match fetch_view_model(&self.source, UtcDateTime::now()).await {
            Ok(view) => {
                info!(
                    cycle,
                    users = view.users().len(),
                    posts = view.feed().len(),
                    trending = view.trending().len(),
                    "Refresh cycle completed"
                );
                guard.complete(view);
                CycleOutcome::Completed
            }
            Err(err) => {
                error!(
                    cycle,
                    operation = %err.operation(),
                    error = %err,
                    "Refresh cycle failed, keeping previous view"
                );
                guard.fail(err.to_string());
                CycleOutcome::Failed
            }
        }
    }

    /// Runs a cycle on its own task, so it finishes even if the caller goes away.
    pub fn spawn_refresh(self: &Arc<Self>) -> JoinHandle<CycleOutcome> {
        let poller = Arc::clone(self);
        tokio::spawn(async move { poller.refresh().await })
    }

    /// Runs a cycle now and then once every `period` until the handle is stopped or dropped.
    pub fn start(self: Arc<Self>, period: PositiveDuration) -> PollerHandle {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        let task = tokio::spawn(async move {
            let mut ticker = interval(period.get());
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    () = cancelled.cancelled() => break,
                    _ = ticker.tick() => {
                        self.refresh().await;
                    }
                }
            }
            debug!("Poller stopped");
        });

        info!(period = ?period.get(), "Poller started");
        PollerHandle {
            token,
            task: Some(task),
        }
    }
}

#[derive(Debug)]
pub struct PollerHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Cancels the schedule and waits for a running cycle to finish.
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take()
            && let Err(err) = task.await
        {
            warn!(error = %err, "Poller task did not exit cleanly");
        }
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
