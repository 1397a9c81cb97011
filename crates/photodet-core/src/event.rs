//! Per-event energy deposit accumulation.
//!
//! An [`EventAccumulator`] collects the energy deposited during one
//! simulated event, independently of how many transport steps report into
//! it. Its lifecycle:
//!
//! ```text
//! Uninitialized --begin_event--> Accumulating --end_event--> Finalized
//!                                     ^                          |
//!                                     +-------begin_event--------+
//! ```
//!
//! `begin_event` always re-zeroes, including mid-event. Concurrent events
//! each need their own accumulator.

use thiserror::Error;

/// Errors from recording a deposit.
#[derive(Debug, Error, PartialEq)]
pub enum EventError {
    #[error("Invalid energy deposit {0}: must be finite and >= 0")]
    InvalidDeposit(f64),

    #[error("No open event: call begin_event before adding deposits")]
    NoOpenEvent,
}

/// Lifecycle state of an [`EventAccumulator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventState {
    #[default]
    Uninitialized,
    Accumulating,
    Finalized,
}

/// Sums energy deposits over the lifetime of one event.
#[derive(Debug, Clone, Default)]
pub struct EventAccumulator {
    edep: f64,
    state: EventState,
    events: u64,
}

impl EventAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new event with a zero total, discarding anything accumulated so far.
    pub fn begin_event(&mut self) {
        if self.state == EventState::Accumulating && self.edep != 0.0 {
            log::debug!("begin_event while accumulating: discarding {}", self.edep);
        }
        self.edep = 0.0;
        self.state = EventState::Accumulating;
        self.events += 1;
    }

    /// Add a non-negative energy deposit to the running total.
    ///
    /// # Errors
    /// [`EventError::InvalidDeposit`] for negative, NaN or infinite amounts,
    /// [`EventError::NoOpenEvent`] outside `begin_event`/`end_event`. The
    /// total is left unchanged on error.
    pub fn add_deposit(&mut self, amount: f64) -> Result<(), EventError> {
        if !amount.is_finite() || amount < 0.0 {
            log::warn!("rejected energy deposit {amount}");
            return Err(EventError::InvalidDeposit(amount));
        }
        if self.state != EventState::Accumulating {
            log::warn!("rejected energy deposit {amount} outside an event");
            return Err(EventError::NoOpenEvent);
        }
        self.edep += amount;
        Ok(())
    }

    /// Close the event and return its total deposit.
    ///
    /// Forwarding the total to a run-level aggregator is left to the caller.
    /// Calling this again before the next `begin_event` returns the same total.
    pub fn end_event(&mut self) -> f64 {
        self.state = EventState::Finalized;
        self.edep
    }

    /// Current running total.
    pub fn edep(&self) -> f64 {
        self.edep
    }

    pub fn state(&self) -> EventState {
        self.state
    }

    /// Number of events begun over the accumulator's lifetime.
    pub fn event_count(&self) -> u64 {
        self.events
    }
}
