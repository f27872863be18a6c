//! # Drive Executable Parameters
//!
//! This module provides parameters for the drive executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

use drive_if::task::TaskId;
use util::logger::LogParams;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for the drive executable, as loaded from `drive_exec.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DriveExecParams {
    /// Target period of one control cycle.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// Length of the autonomous period, after which the autonomous routine
    /// is cancelled whether it has finished or not.
    ///
    /// Units: seconds
    pub auton_duration_s: f64,

    /// Task run when no other task is active.
    pub default_task: TaskId,

    /// Logging configuration
    pub log: LogParams,

    /// Steps of the autonomous routine, run in order.
    #[serde(default)]
    pub auton_steps: Vec<AutonStep>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A step of the autonomous routine.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AutonStep {
    /// Drive straight, distances in inches.
    Drive { distance_in: f64, margin_in: f64 },

    /// Turn on the spot, in differential revolutions.
    Turn { target_revs: f64, margin_revs: f64 },
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DriveExecParamsError {
    #[error("Cycle period must be positive and finite, found {0} s")]
    InvalidCyclePeriod(f64),

    #[error("Autonomous period must be positive and finite, found {0} s")]
    InvalidAutonDuration(f64),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl DriveExecParams {
    pub fn validate(&self) -> Result<(), DriveExecParamsError> {
        if !(self.cycle_period_s.is_finite() && self.cycle_period_s > 0.0) {
            return Err(DriveExecParamsError::InvalidCyclePeriod(self.cycle_period_s));
        }
        if !(self.auton_duration_s.is_finite() && self.auton_duration_s > 0.0) {
            return Err(DriveExecParamsError::InvalidAutonDuration(self.auton_duration_s));
        }
        Ok(())
    }

    /// Number of cycles per second
    pub fn cycle_frequency_hz(&self) -> f64 {
        1.0 / self.cycle_period_s
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_load() {
        let p: DriveExecParams = util::params::parse(
            r#"
            cycle_period_s = 0.02
            auton_duration_s = 15.0
            default_task = "teleop_drive"

            [log]
            min_level = "debug"

            [[auton_steps]]
            type = "drive"
            distance_in = 60.0
            margin_in = 2.0

            [[auton_steps]]
            type = "turn"
            target_revs = 21.0
            margin_revs = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(p.validate(), Ok(()));
        assert_eq!(p.default_task, TaskId::TeleopDrive);
        assert!((p.cycle_frequency_hz() - 50.0).abs() < 1e-9);
        assert_eq!(
            p.auton_steps,
            vec![
                AutonStep::Drive {
                    distance_in: 60.0,
                    margin_in: 2.0
                },
                AutonStep::Turn {
                    target_revs: 21.0,
                    margin_revs: 2.0
                }
            ]
        );
    }
}
