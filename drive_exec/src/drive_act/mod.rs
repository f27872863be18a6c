//! # Drive actuator module
//!
//! Abstracts the drive hardware as two independent sides, each made of a
//! leader motor controller and followers replicating the leader's output.
//! This is the only module which touches hardware state.
//!
//! Hardware communication failures never escape this module. They are
//! reported as stale feedback (the last known position) and counted, so that
//! the robot stays controllable with a failed sensor.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod hardware;
mod params;
pub mod sim;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use hardware::*;
pub use params::*;
pub use state::*;

use drive_if::eqpt::drive::Side;
use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A position measurement of one drive side.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PositionReading {
    /// Position of the side since the last encoder reset, positive forwards.
    ///
    /// Units: revolutions
    pub revs: f64,

    /// True if the hardware could not be read and `revs` is the last known
    /// value.
    pub stale: bool,
}

/// Position feedback of both sides, as sampled at the start of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ActuatorFeedback {
    pub left: PositionReading,
    pub right: PositionReading,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors reported by a motor controller.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum HwError {
    #[error("Motor controller {0} did not respond")]
    NoResponse(MotorId),

    #[error("Motor controller {0} reported a fault: {1}")]
    Fault(MotorId, String),
}

/// Errors in the drive actuator parameters.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DriveActParamsError {
    #[error("Motor controller ID {0} is used more than once")]
    DuplicateMotorId(MotorId),

    #[error("Simulated free speed must be positive and finite, found {0} rev/s")]
    InvalidFreeSpeed(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ActuatorFeedback {
    pub fn side(&self, side: Side) -> PositionReading {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn side_mut(&mut self, side: Side) -> &mut PositionReading {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// True if either side is stale.
    pub fn is_stale(&self) -> bool {
        self.left.stale || self.right.stale
    }

    /// Mean position of both sides, the distance travelled straight ahead.
    ///
    /// Units: revolutions
    pub fn mean_revs(&self) -> f64 {
        util::maths::mean2(self.left.revs, self.right.revs)
    }

    /// Half the difference between the sides, the amount turned on the spot
    /// (positive when the left side has moved forwards of the right).
    ///
    /// Units: revolutions
    pub fn differential_revs(&self) -> f64 {
        (self.left.revs - self.right.revs) / 2.0
    }
}

// ---------------------------------------------------------------------------
// TEST HELPERS
// ---------------------------------------------------------------------------

/// Parameters of a four motor drivetrain with the right side inverted.
#[cfg(test)]
pub(crate) fn test_params() -> Params {
    Params {
        left: SideParams {
            leader_id: 10,
            follower_ids: vec![11],
            inverted: false,
        },
        right: SideParams {
            leader_id: 15,
            follower_ids: vec![16],
            inverted: true,
        },
        sim: SimParams {
            free_speed_revs_per_s: 100.0,
        },
    }
}
