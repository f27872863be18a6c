//! # Operator input module
//!
//! Events produced outside the drive core: button edges and axis samples from the operator's
//! devices, values written by the dashboard, and robot mode changes. Events can be parsed from JSON
//! so they may be played back from a script.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Lowest value an axis can report.
pub const AXIS_MIN: f64 = -1.0;

/// Highest value an axis can report.
pub const AXIS_MAX: f64 = 1.0;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Operator input devices.
#[derive(Serialize, Deserialize, Debug, Hash, Eq, PartialEq, Copy, Clone)]
#[serde(rename_all = "snake_case")]
pub enum DeviceId {
    /// Left flight stick
    LeftStick,
    /// Right flight stick
    RightStick,
    /// Gamepad
    Controller,
}

/// Edge of a button.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Copy, Clone)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAction {
    Pressed,
    Released,
}

/// Operating mode of the whole robot.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Copy, Clone)]
#[serde(rename_all = "snake_case")]
pub enum RobotMode {
    /// No output is allowed.
    Disabled,
    /// The autonomous routine runs.
    Autonomous,
    /// The operator drives.
    Teleop,
}

/// An input event.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// A button on a device was pressed or released.
    Button {
        device: DeviceId,
        button: u8,
        action: ButtonAction,
    },

    /// An axis on a device moved.
    ///
    /// Values are in `[-1, 1]`.
    Axis {
        device: DeviceId,
        axis: u8,
        value: f64,
    },

    /// A numeric value was written on the dashboard.
    Tunable { key: String, value: f64 },

    /// The robot changed operating mode.
    Mode { mode: RobotMode },
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum InputParseError {
    #[error("Input event contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("Axis value {0} is outside [-1, 1]")]
    AxisOutOfRange(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl InputEvent {
    /// Parse a new event from a JSON packet
    pub fn from_json(json_str: &str) -> Result<Self, InputParseError> {
        let event: InputEvent =
            serde_json::from_str(json_str).map_err(InputParseError::InvalidJson)?;

        if let InputEvent::Axis { value, .. } = event {
            if !(AXIS_MIN..=AXIS_MAX).contains(&value) {
                return Err(InputParseError::AxisOutOfRange(value));
            }
        }

        Ok(event)
    }
}

impl RobotMode {
    /// True if tasks may drive in this mode.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, RobotMode::Disabled)
    }
}

impl Default for RobotMode {
    fn default() -> Self {
        RobotMode::Disabled
    }
}

impl DeviceId {
    /// USB port the device is plugged into on the driver station.
    pub fn port(&self) -> u8 {
        match self {
            DeviceId::LeftStick => 0,
            DeviceId::RightStick => 1,
            DeviceId::Controller => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_json() {
        assert_eq!(
            InputEvent::from_json(
                r#"{"type": "button", "device": "controller", "button": 3, "action": "pressed"}"#
            )
            .unwrap(),
            InputEvent::Button {
                device: DeviceId::Controller,
                button: 3,
                action: ButtonAction::Pressed
            }
        );

        assert_eq!(
            InputEvent::from_json(r#"{"type": "tunable", "key": "kP", "value": 0.02}"#).unwrap(),
            InputEvent::Tunable {
                key: String::from("kP"),
                value: 0.02
            }
        );

        assert_eq!(
            InputEvent::from_json(r#"{"type": "mode", "mode": "autonomous"}"#).unwrap(),
            InputEvent::Mode {
                mode: RobotMode::Autonomous
            }
        );
    }

    #[test]
    fn test_from_json_rejects() {
        match InputEvent::from_json(
            r#"{"type": "axis", "device": "left_stick", "axis": 1, "value": 1.5}"#,
        ) {
            Err(InputParseError::AxisOutOfRange(v)) => assert_eq!(v, 1.5),
            r => panic!("Expected out of range axis, got {:?}", r),
        }

        match InputEvent::from_json(r#"{"type": "joystick"}"#) {
            Err(InputParseError::InvalidJson(_)) => (),
            r => panic!("Expected invalid JSON, got {:?}", r),
        }
    }
}
