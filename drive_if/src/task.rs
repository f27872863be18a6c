//! # Task identifiers

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::fmt;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Identifies one of the control tasks the scheduler knows about.
///
/// Input bindings and the executable refer to tasks by these identifiers, the scheduler owns the
/// task instances themselves.
#[derive(Serialize, Deserialize, Debug, Hash, Eq, PartialEq, Copy, Clone)]
#[serde(rename_all = "snake_case")]
pub enum TaskId {
    /// Tank drive from the operator's joysticks, the usual default task.
    TeleopDrive,

    /// Drive straight to a fixed distance.
    DriveToDistance,

    /// Turn on the spot by a fixed amount.
    TurnToAngle,

    /// Drive straight to a distance read live from the dashboard.
    TunableGainDrive,

    /// The autonomous routine, a sequence of other tasks.
    Autonomous,
}

/// A request made of the task scheduler.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Copy, Clone)]
pub enum SchedRequest {
    /// Make the task the active one, interrupting whichever task is active.
    Schedule(TaskId),

    /// Interrupt the task if it is active.
    Cancel(TaskId),

    /// Interrupt whichever task is active.
    CancelAll,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskId::TeleopDrive => "TeleopDrive",
            TaskId::DriveToDistance => "DriveToDistance",
            TaskId::TurnToAngle => "TurnToAngle",
            TaskId::TunableGainDrive => "TunableGainDrive",
            TaskId::Autonomous => "Autonomous",
        };
        write!(f, "{}", name)
    }
}
