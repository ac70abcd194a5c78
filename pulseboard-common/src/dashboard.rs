//! Refresh cycle bookkeeping for the dashboard.
//!
//! A cycle is one fetch of all collections followed by derivation. At most one cycle is in
//! flight: [`DashboardState::begin_cycle`] hands out the only [`CycleTicket`], and a cycle can
//! only be finished by presenting it. A trigger while a cycle is running is ignored rather
//! than queued.

use crate::model::view::ViewModel;
use std::sync::Arc;
use time::UtcDateTime;

/// Proof that the holder is running the current cycle.
#[derive(Eq, PartialEq, Debug, Hash)]
pub struct CycleTicket {
    cycle: u64,
}

impl CycleTicket {
    #[must_use]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct CycleFailure {
    pub at: UtcDateTime,
    pub message: String,
}

#[derive(Clone, Debug, Default)]
pub struct DashboardState {
    view: Option<Arc<ViewModel>>,
    in_flight: Option<u64>,
    started_cycles: u64,
    last_failure: Option<CycleFailure>,
}

impl DashboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a cycle, or returns `None` if one is already running.
    pub fn begin_cycle(&mut self) -> Option<CycleTicket> {
        if self.in_flight.is_some() {
            return None;
        }

        self.started_cycles += 1;
        self.in_flight = Some(self.started_cycles);
        Some(CycleTicket {
            cycle: self.started_cycles,
        })
    }

    /// Replaces the view with the cycle's result.
    ///
    /// The last failure is kept; the view's refresh time tells whether it is older.
    /// Returns `false` and leaves everything untouched if `ticket` is not the running cycle.
    pub fn complete_cycle(&mut self, ticket: CycleTicket, view: ViewModel) -> bool {
        if !self.finish(&ticket) {
            return false;
        }

        self.view = Some(Arc::new(view));
        true
    }

    /// Records the failure and keeps serving the previous view.
    pub fn fail_cycle(&mut self, ticket: CycleTicket, failure: CycleFailure) -> bool {
        if !self.finish(&ticket) {
            return false;
        }

        self.last_failure = Some(failure);
        true
    }

    fn finish(&mut self, ticket: &CycleTicket) -> bool {
        if self.in_flight != Some(ticket.cycle) {
            return false;
        }

        self.in_flight = None;
        true
    }

    #[must_use]
    pub fn view(&self) -> Option<Arc<ViewModel>> {
        self.view.clone()
    }

    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub fn started_cycles(&self) -> u64 {
        self.started_cycles
    }

    #[must_use]
    pub fn last_failure(&self) -> Option<&CycleFailure> {
        self.last_failure.as_ref()
    }
}
