//! Parameters structure for the control tasks

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use super::{ControlGains, GainsError, Setpoint, SetpointError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the control tasks, as loaded from `ctrl_task.toml`.
///
/// The gains and the tunable setpoint are only the initial dashboard values.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// Gains of the straight driving tasks
    pub gains: ControlGains,

    /// Proportional gain of the turning task, which otherwise shares `gains`
    #[serde(rename = "turnkP")]
    pub turn_k_p: f64,

    /// Setpoint of the DriveToDistance task
    pub drive_setpoint: Setpoint,

    /// Setpoint of the TurnToAngle task
    pub turn_setpoint: Setpoint,

    /// Initial setpoint of the TunableGainDrive task
    pub tunable_setpoint: Setpoint,

    /// Number of consecutive cycles of stale feedback a closed-loop task
    /// tolerates before stopping.
    pub stale_window_cycles: u32,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CtrlTaskParamsError {
    #[error("Invalid gains: {0}")]
    InvalidGains(#[from] GainsError),

    #[error("Turn proportional gain must be finite, found {0}")]
    InvalidTurnGain(f64),

    #[error("Invalid {0} setpoint: {1}")]
    InvalidSetpoint(&'static str, SetpointError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    pub fn validate(&self) -> Result<(), CtrlTaskParamsError> {
        self.gains.validate()?;

        if !self.turn_k_p.is_finite() {
            return Err(CtrlTaskParamsError::InvalidTurnGain(self.turn_k_p));
        }

        let setpoints = [
            ("drive", &self.drive_setpoint),
            ("turn", &self.turn_setpoint),
            ("tunable", &self.tunable_setpoint),
        ];
        for &(name, sp) in setpoints.iter() {
            sp.validate()
                .map_err(|e| CtrlTaskParamsError::InvalidSetpoint(name, e))?;
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const PARAMS: &str = r#"
        turnkP = 0.014
        stale_window_cycles = 10

        [gains]
        kP = 0.015
        kI = 0.0
        kD = 0.0
        kF = 0.0
        minOutput = -1.0
        maxOutput = 1.0

        [drive_setpoint]
        target_revs = 60.0
        margin_revs = 2.0

        [turn_setpoint]
        target_revs = 21.0
        margin_revs = 2.0

        [tunable_setpoint]
        target_revs = 60.0
        margin_revs = 2.0
    "#;

    #[test]
    fn test_load() {
        let p: Params = util::params::parse(PARAMS).unwrap();
        p.validate().unwrap();

        assert_eq!(p.gains.k_p, 0.015);
        assert_eq!(p.turn_k_p, 0.014);
        assert_eq!(p.turn_setpoint.target_revs, 21.0);
        assert_eq!(p.stale_window_cycles, 10);
    }

    #[test]
    fn test_invalid_margin() {
        let mut p: Params = util::params::parse(PARAMS).unwrap();
        p.turn_setpoint.margin_revs = -1.0;

        match p.validate() {
            Err(CtrlTaskParamsError::InvalidSetpoint("turn", SetpointError::InvalidMargin(m))) => {
                assert_eq!(m, -1.0)
            }
            r => panic!("Expected invalid turn margin, got {:?}", r),
        }
    }
}
