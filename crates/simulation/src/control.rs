//! Run control for Monte Carlo simulations: one run in flight, cancellable.

use crate::error::SimulationError;
use crate::monte_carlo::{MonteCarloConfig, run_monte_carlo_with_cancel};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;
use tradeplan_domain::config::Config;
use tradeplan_domain::value_objects::MonteCarloResult;

/// Shared cancellation flag, polled between iterations.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of every run holding a clone of this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Admits at most one simulation at a time.
#[derive(Debug, Clone, Default)]
pub struct SimulationSlot {
    busy: Arc<AtomicBool>,
}

/// Occupies a [`SimulationSlot`] until dropped.
#[derive(Debug)]
pub struct SlotGuard {
    busy: Arc<AtomicBool>,
}

impl SimulationSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the slot.
    ///
    /// # Errors
    /// Returns [`SimulationError::Busy`] while another guard is alive.
    pub fn try_acquire(&self) -> Result<SlotGuard, SimulationError> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| SimulationError::Busy)?;
        Ok(SlotGuard {
            busy: Arc::clone(&self.busy),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}

/// Caller-facing entry point combining the single-flight slot with cancellation.
#[derive(Debug, Clone, Default)]
pub struct MonteCarloService {
    slot: SimulationSlot,
    current: Arc<Mutex<Option<CancellationToken>>>,
}

impl MonteCarloService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.slot.is_busy()
    }

    /// Runs a simulation, rejecting the request if one is already in flight.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Busy`] when another run holds the slot,
    /// [`SimulationError::Cancelled`] when [`MonteCarloService::cancel`] or
    /// `token` fires mid-run, and validation/allocation errors from the run.
    pub fn run(
        &self,
        config: &Config,
        settings: &MonteCarloConfig,
        token: CancellationToken,
    ) -> Result<MonteCarloResult, SimulationError> {
        // Claim the slot and publish the token under one lock so `cancel`
        // never sees a running service without its token.
        let guard = {
            let mut current = self.lock_current();
            let guard = self.slot.try_acquire().inspect_err(|_| {
                warn!("Rejected simulation request: another run is in progress");
            })?;
            *current = Some(token.clone());
            guard
        };

        let result = run_monte_carlo_with_cancel(config, settings, &token);

        let mut current = self.lock_current();
        *current = None;
        drop(guard);
        result
    }

    /// Cancels the run in flight, if any.
    pub fn cancel(&self) -> bool {
        match self.lock_current().as_ref() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    fn lock_current(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
