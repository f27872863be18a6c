//! # Control task module
//!
//! Control tasks are the discrete actions which own the drive for a while:
//! tank driving from the joysticks, driving straight to a distance, turning on
//! the spot, and sequences of these. Every task follows the same lifecycle,
//! dispatched by the task scheduler:
//!
//! - `initialize` - called once when the task gains ownership of the drive.
//!   Closed-loop tasks reset the encoders and cache their setpoint here.
//! - `execute` - called once per control cycle while the task is active.
//! - `is_finished` - polled after every `execute`.
//! - `end` - called once when the task finishes or is interrupted. The drive
//!   is always left stopped.
//!
//! Tasks never cache gains. Gains come from the dashboard snapshot in the
//! [`TaskContext`] on every cycle, so a value changed on the dashboard takes
//! effect on the next cycle.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod closed_loop;
mod drive_dist;
mod gains;
mod params;
mod pid;
mod sequence;
mod setpoint;
mod teleop;
mod tunable;
mod turn;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use drive_dist::*;
pub use gains::*;
pub use params::*;
pub use pid::*;
pub use sequence::*;
pub use setpoint::*;
pub use teleop::*;
pub use tunable::*;
pub use turn::*;

use drive_if::task::TaskId;

use crate::{dashboard::TunableValues, drive_act::DriveActuator, input_bind::TankInputs};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Everything a task may touch during one call.
///
/// The context is rebuilt by the scheduler for every call, so nothing in it
/// outlives the cycle.
pub struct TaskContext<'a> {
    /// The drive. Only the active task is ever given this.
    pub actuator: &'a mut DriveActuator,

    /// Dashboard values for this cycle.
    pub tunables: &'a TunableValues,

    /// Raw joystick inputs sampled for this cycle.
    pub tank: TankInputs,

    /// Fixed period of the control cycle.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A time-bounded action which owns the drive while it is active.
pub trait ControlTask {
    /// Identifier the task is scheduled by.
    fn id(&self) -> TaskId;

    /// Called once when the task becomes active.
    fn initialize(&mut self, ctx: &mut TaskContext<'_>);

    /// Called once per cycle while the task is active.
    fn execute(&mut self, ctx: &mut TaskContext<'_>);

    /// Completion predicate, polled after each `execute`.
    fn is_finished(&self, ctx: &TaskContext<'_>) -> bool;

    /// Called once when the task stops being active, either because it
    /// finished or because it was interrupted. Must leave the drive stopped.
    fn end(&mut self, interrupted: bool, ctx: &mut TaskContext<'_>);

    /// True if the task gave up rather than reaching its goal.
    fn aborted(&self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// TEST HELPERS
// ---------------------------------------------------------------------------

/// Dashboard values with the robot's default gains, a 60 rev drive target and
/// a 2 rev margin.
#[cfg(test)]
pub(crate) fn test_tunables() -> TunableValues {
    TunableValues {
        gains: ControlGains {
            k_p: 0.015,
            k_i: 0.0,
            k_d: 0.0,
            k_f: 0.0,
            min_output: -1.0,
            max_output: 1.0,
        },
        turn_k_p: 0.014,
        tunable_setpoint: Setpoint {
            target_revs: 60.0,
            margin_revs: 2.0,
        },
    }
}
