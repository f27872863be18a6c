//! Shared closed-loop core of the position tasks

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::warn;
use serde::Serialize;

use super::{ControlGains, PidController, Setpoint};
use crate::drive_act::PositionReading;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A PID loop on one position measurement, with a watchdog on stale
/// feedback.
///
/// While feedback is stale the loop repeats its last valid output for up to
/// `stale_window_cycles` cycles, after which it outputs zero and aborts.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ClosedLoop {
    pid: PidController,

    /// Maximum number of consecutive stale cycles tolerated.
    stale_window_cycles: u32,

    /// Number of consecutive stale cycles seen.
    num_stale_cycles: u32,

    /// Output computed from the last valid feedback.
    last_output: f64,

    aborted: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ClosedLoop {
    pub fn new(stale_window_cycles: u32) -> Self {
        Self {
            pid: PidController::new(),
            stale_window_cycles,
            num_stale_cycles: 0,
            last_output: 0.0,
            aborted: false,
        }
    }

    /// Clear all state, ready for a new run.
    pub fn reset(&mut self) {
        self.pid.reset();
        self.num_stale_cycles = 0;
        self.last_output = 0.0;
        self.aborted = false;
    }

    /// Compute the output for this cycle's measurement.
    pub fn step(
        &mut self,
        measured: PositionReading,
        setpoint: &Setpoint,
        gains: &ControlGains,
        dt_s: f64,
    ) -> f64 {
        if self.aborted {
            return 0.0;
        }

        if measured.stale {
            self.num_stale_cycles += 1;

            if self.num_stale_cycles > self.stale_window_cycles {
                warn!(
                    "Feedback stale for {} cycles, stopping the drive",
                    self.num_stale_cycles
                );
                self.aborted = true;
                self.last_output = 0.0;
                return 0.0;
            }

            return self.last_output;
        }

        self.num_stale_cycles = 0;
        self.last_output = self.pid.get(
            setpoint.error(measured.revs),
            setpoint.target_revs,
            gains,
            dt_s,
        );
        self.last_output
    }

    /// True once the setpoint is reached on fresh feedback, or the loop has
    /// aborted.
    pub fn is_finished(&self, measured: PositionReading, setpoint: &Setpoint) -> bool {
        self.aborted || (!measured.stale && setpoint.is_reached(measured.revs))
    }

    pub fn aborted(&self) -> bool {
        self.aborted
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
