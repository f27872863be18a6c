//! # Autonomous routine
//!
//! Builds the autonomous routine task from its configured steps.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use drive_if::task::TaskId;

use crate::{
    ctrl_task::{ControlTask, DriveToDistance, Setpoint, SetpointError, TaskSequence, TurnToAngle},
    params::AutonStep,
    unit_conv::UnitConverter,
};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Build the autonomous routine.
///
/// Drive distances are converted from inches to revolutions with `conv`.
pub fn build_routine(
    steps: &[AutonStep],
    conv: &UnitConverter,
    stale_window_cycles: u32,
) -> Result<TaskSequence, SetpointError> {
    let mut tasks: Vec<Box<dyn ControlTask>> = Vec::with_capacity(steps.len());

    for step in steps.iter() {
        let task: Box<dyn ControlTask> = match *step {
            AutonStep::Drive {
                distance_in,
                margin_in,
            } => Box::new(DriveToDistance::new(
                Setpoint::from_inches(distance_in, margin_in, conv)?,
                stale_window_cycles,
            )),
            AutonStep::Turn {
                target_revs,
                margin_revs,
            } => Box::new(TurnToAngle::new(
                Setpoint::new(target_revs, margin_revs)?,
                stale_window_cycles,
            )),
        };

        tasks.push(task);
    }

    Ok(TaskSequence::new(TaskId::Autonomous, tasks))
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
