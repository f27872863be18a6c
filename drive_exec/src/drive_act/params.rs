//! Parameters structure for the drive actuator

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use std::collections::HashSet;

use super::{DriveActParamsError, MotorId};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the drive actuator, as loaded from `drive_act.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    pub left: SideParams,

    pub right: SideParams,

    pub sim: SimParams,
}

/// Wiring of one drive side.
#[derive(Debug, Clone, Deserialize)]
pub struct SideParams {
    /// The controller whose encoder provides the side's feedback.
    pub leader_id: MotorId,

    /// Controllers which replicate the leader's output.
    #[serde(default)]
    pub follower_ids: Vec<MotorId>,

    /// True if positive motor output drives this side backwards, as is
    /// usual for one side of a mirrored drivetrain.
    #[serde(default)]
    pub inverted: bool,
}

/// Parameters of the simulated drivetrain.
#[derive(Debug, Clone, Deserialize)]
pub struct SimParams {
    /// Output shaft speed at full output.
    ///
    /// Units: revolutions/second
    pub free_speed_revs_per_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    pub fn validate(&self) -> Result<(), DriveActParamsError> {
        let mut seen = HashSet::new();

        for side in [&self.left, &self.right].iter() {
            for id in side.motor_ids() {
                if !seen.insert(id) {
                    return Err(DriveActParamsError::DuplicateMotorId(id));
                }
            }
        }

        let speed = self.sim.free_speed_revs_per_s;
        if !(speed.is_finite() && speed > 0.0) {
            return Err(DriveActParamsError::InvalidFreeSpeed(speed));
        }

        Ok(())
    }
}

impl SideParams {
    /// All controller IDs on this side, leader first.
    pub fn motor_ids(&self) -> impl Iterator<Item = MotorId> + '_ {
        std::iter::once(self.leader_id).chain(self.follower_ids.iter().copied())
    }

    /// Sign applied to outputs and positions on this side.
    pub fn sign(&self) -> f64 {
        if self.inverted { -1.0 } else { 1.0 }
    }
}
