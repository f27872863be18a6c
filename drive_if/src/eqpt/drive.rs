//! # Drive Equipment Commands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Lowest normalised output an actuator accepts.
pub const MIN_OUTPUT: f64 = -1.0;

/// Highest normalised output an actuator accepts.
pub const MAX_OUTPUT: f64 = 1.0;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Demands on the two drive sides for one control cycle.
///
/// Outputs are normalised, `+1.0` is full forward and `-1.0` full reverse. A command is produced
/// fresh every cycle and never kept beyond it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct DriveCommand {
    /// Left side output
    pub left: f64,

    /// Right side output
    pub right: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The two independent sides of a differential drive.
#[derive(Serialize, Deserialize, Debug, Hash, Eq, PartialEq, Copy, Clone)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

// -----------------------------------------------------------------------------------------------
// IMPLS
// -----------------------------------------------------------------------------------------------

impl DriveCommand {
    /// The stopped command.
    pub const STOP: DriveCommand = DriveCommand {
        left: 0.0,
        right: 0.0,
    };

    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    /// Command the same output on both sides.
    pub fn straight(output: f64) -> Self {
        Self::new(output, output)
    }

    /// Command opposite outputs on each side, turning on the spot. Positive outputs drive the left
    /// side forwards.
    pub fn spin(output: f64) -> Self {
        Self::new(output, -output)
    }

    /// Limit both sides to `[min, max]`.
    ///
    /// Non-finite outputs are replaced by zero, an actuator must never be sent a NaN.
    pub fn clamped(&self, min: f64, max: f64) -> Self {
        let limit = |v: f64| {
            if v.is_finite() {
                v.max(min).min(max)
            } else {
                0.0
            }
        };

        Self::new(limit(self.left), limit(self.right))
    }

    /// Get the output for one side.
    pub fn side(&self, side: Side) -> f64 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.left == 0.0 && self.right == 0.0
    }
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clamped() {
        let cmd = DriveCommand::new(1.7, -0.4).clamped(MIN_OUTPUT, MAX_OUTPUT);
        assert_eq!(cmd, DriveCommand::new(1.0, -0.4));

        let cmd = DriveCommand::new(f64::NAN, -3.0).clamped(-0.5, 0.5);
        assert_eq!(cmd, DriveCommand::new(0.0, -0.5));
    }

    #[test]
    fn test_spin() {
        let cmd = DriveCommand::spin(0.3);
        assert_eq!(cmd.side(Side::Left), -cmd.side(Side::Right));
        assert!(DriveCommand::STOP.is_stopped());
        assert!(!cmd.is_stopped());
    }
}
