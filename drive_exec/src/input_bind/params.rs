//! Parameters structure for the input bindings

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use drive_if::{input::DeviceId, task::TaskId};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the input bindings, as loaded from `input_bind.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// Axes driving each side in tank drive.
    pub tank: TankAxes,

    /// Button to task bindings.
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

/// The axes used for tank drive.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TankAxes {
    pub left: AxisRef,

    pub right: AxisRef,

    /// If true the axis values are negated, for sticks which report forward
    /// as negative.
    #[serde(default)]
    pub invert: bool,
}

/// An axis on a device.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Hash)]
pub struct AxisRef {
    pub device: DeviceId,
    pub axis: u8,
}

/// A button bound to a task.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct Binding {
    pub device: DeviceId,

    pub button: u8,

    pub trigger: Trigger,

    pub task: TaskId,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// When a binding acts on its task.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Schedule the task when the button is pressed.
    WhenPressed,

    /// Schedule the task when the button is pressed and cancel it when the
    /// button is released.
    WhileHeld,

    /// Schedule the task when the button is released.
    WhenReleased,
}
