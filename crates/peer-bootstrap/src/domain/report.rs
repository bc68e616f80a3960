//! Sweep outcomes and service counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Summary of one sweep in which no dial failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Dials issued to the host.
    pub attempted: usize,
    /// Dials that completed successfully.
    pub connected: usize,
    /// Seeds skipped because the peer minimum was already met.
    pub skipped: usize,
}

/// Which path triggered a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepTrigger {
    Initial,
    Manual,
    Soft,
    Hard,
}

impl SweepTrigger {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Manual => "manual",
            Self::Soft => "soft",
            Self::Hard => "hard",
        }
    }
}

/// Counters for observability. Relaxed ordering; values are advisory.
#[derive(Debug, Default)]
pub struct BootstrapStats {
    /// Sweeps started (any trigger)
    pub sweeps: AtomicU64,
    /// Dials issued to the host
    pub dials_attempted: AtomicU64,
    /// Dials that failed
    pub dials_failed: AtomicU64,
    /// Sweeps triggered by a listen-address change
    pub soft_sweeps: AtomicU64,
    /// Sweeps triggered by the hard timer
    pub hard_sweeps: AtomicU64,
}

impl BootstrapStats {
    pub(crate) fn record_sweep(&self, trigger: SweepTrigger) {
        self.sweeps.fetch_add(1, Ordering::Relaxed);
        match trigger {
            SweepTrigger::Soft => {
                self.soft_sweeps.fetch_add(1, Ordering::Relaxed);
            }
            SweepTrigger::Hard => {
                self.hard_sweeps.fetch_add(1, Ordering::Relaxed);
            }
            SweepTrigger::Initial | SweepTrigger::Manual => {}
        }
    }

    pub(crate) fn record_dials(&self, attempted: usize, failed: usize) {
        self.dials_attempted
            .fetch_add(attempted as u64, Ordering::Relaxed);
        self.dials_failed.fetch_add(failed as u64, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            sweeps: self.sweeps.load(Ordering::Relaxed),
            dials_attempted: self.dials_attempted.load(Ordering::Relaxed),
            dials_failed: self.dials_failed.load(Ordering::Relaxed),
            soft_sweeps: self.soft_sweeps.load(Ordering::Relaxed),
            hard_sweeps: self.hard_sweeps.load(Ordering::Relaxed),
        }
    }
}

/// Plain copy of [`BootstrapStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub sweeps: u64,
    pub dials_attempted: u64,
    pub dials_failed: u64,
    pub soft_sweeps: u64,
    pub hard_sweeps: u64,
}
