//! # Input bindings module
//!
//! Turns operator input events into scheduler requests. Each bound button
//! acts on exactly one task, according to its [`Trigger`]. Axis events are
//! kept in a table so that the tank drive inputs can be sampled once per
//! cycle.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use params::*;

use std::collections::HashMap;

use log::{debug, warn};

use drive_if::{
    input::{ButtonAction, DeviceId, InputEvent, AXIS_MAX, AXIS_MIN},
    task::{SchedRequest, TaskId},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Raw tank drive inputs for one cycle, in `[-1, 1]`. Deadzone filtering is
/// left to the task using them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TankInputs {
    pub left: f64,
    pub right: f64,
}

/// The input bindings state.
#[derive(Debug, Clone)]
pub struct InputBindings {
    /// Bound buttons, keyed by device and button number.
    buttons: HashMap<(DeviceId, u8), (Trigger, TaskId)>,

    /// Latest value of every axis seen.
    axes: HashMap<AxisRef, f64>,

    tank: TankAxes,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BindError {
    #[error("Button {1} on {0:?} is bound more than once")]
    DuplicateBinding(DeviceId, u8),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl InputBindings {
    pub fn new(params: &Params) -> Result<Self, BindError> {
        let mut buttons = HashMap::new();

        for b in params.bindings.iter() {
            if buttons
                .insert((b.device, b.button), (b.trigger, b.task))
                .is_some()
            {
                return Err(BindError::DuplicateBinding(b.device, b.button));
            }

            debug!(
                "Button {} on {:?} (port {}) {:?} {}",
                b.button,
                b.device,
                b.device.port(),
                b.trigger,
                b.task
            );
        }

        Ok(Self {
            buttons,
            axes: HashMap::new(),
            tank: params.tank,
        })
    }

    /// Process one input event, returning the scheduler request it causes.
    ///
    /// Only button and axis events are handled here, others are ignored.
    pub fn process(&mut self, event: &InputEvent) -> Option<SchedRequest> {
        match *event {
            InputEvent::Button {
                device,
                button,
                action,
            } => {
                let (trigger, task) = match self.buttons.get(&(device, button)) {
                    Some(&b) => b,
                    None => {
                        debug!("Button {} on {:?} is not bound", button, device);
                        return None;
                    }
                };

                let req = match (trigger, action) {
                    (Trigger::WhenPressed, ButtonAction::Pressed)
                    | (Trigger::WhileHeld, ButtonAction::Pressed)
                    | (Trigger::WhenReleased, ButtonAction::Released) => {
                        Some(SchedRequest::Schedule(task))
                    }
                    (Trigger::WhileHeld, ButtonAction::Released) => {
                        Some(SchedRequest::Cancel(task))
                    }
                    _ => None,
                };

                debug!("Button {} on {:?} {:?}: {:?}", button, device, action, req);

                req
            }
            InputEvent::Axis {
                device,
                axis,
                value,
            } => {
                if value.is_nan() {
                    warn!("Ignoring NaN value on axis {} of {:?}", axis, device);
                } else {
                    self.axes.insert(
                        AxisRef { device, axis },
                        util::maths::clamp(&value, &AXIS_MIN, &AXIS_MAX),
                    );
                }
                None
            }
            _ => None,
        }
    }

    /// Sample the tank drive inputs. Axes which have not reported yet read as
    /// zero.
    pub fn tank_inputs(&self) -> TankInputs {
        let sign = if self.tank.invert { -1.0 } else { 1.0 };
        let read = |a: &AxisRef| sign * self.axes.get(a).copied().unwrap_or(0.0);

        TankInputs {
            left: read(&self.tank.left),
            right: read(&self.tank.right),
        }
    }

    /// Every task referred to by a binding.
    pub fn bound_tasks(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.buttons.values().map(|&(_, task)| task)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const PARAMS: &str = r#"
        [tank]
        left = { device = "left_stick", axis = 1 }
        right = { device = "right_stick", axis = 1 }
        invert = true

        [[bindings]]
        device = "controller"
        button = 1
        trigger = "while_held"
        task = "turn_to_angle"

        [[bindings]]
        device = "controller"
        button = 3
        trigger = "when_pressed"
        task = "drive_to_distance"

        [[bindings]]
        device = "right_stick"
        button = 3
        trigger = "when_released"
        task = "tunable_gain_drive"
    "#;

    fn button(device: DeviceId, button: u8, action: ButtonAction) -> InputEvent {
        InputEvent::Button {
            device,
            button,
            action,
        }
    }

    #[test]
    fn test_triggers() {
        let params: Params = util::params::parse(PARAMS).unwrap();
        let mut ib = InputBindings::new(&params).unwrap();

        use ButtonAction::*;
        use DeviceId::*;

        assert_eq!(
            ib.process(&button(Controller, 1, Pressed)),
            Some(SchedRequest::Schedule(TaskId::TurnToAngle))
        );
        assert_eq!(
            ib.process(&button(Controller, 1, Released)),
            Some(SchedRequest::Cancel(TaskId::TurnToAngle))
        );

        assert_eq!(
            ib.process(&button(Controller, 3, Pressed)),
            Some(SchedRequest::Schedule(TaskId::DriveToDistance))
        );
        assert_eq!(ib.process(&button(Controller, 3, Released)), None);

        assert_eq!(ib.process(&button(RightStick, 3, Pressed)), None);
        assert_eq!(
            ib.process(&button(RightStick, 3, Released)),
            Some(SchedRequest::Schedule(TaskId::TunableGainDrive))
        );

        // Same button number on another device is not bound
        assert_eq!(ib.process(&button(LeftStick, 1, Pressed)), None);

        let mut tasks: Vec<TaskId> = ib.bound_tasks().collect();
        tasks.sort_by_key(|t| t.to_string());
        assert_eq!(
            tasks,
            vec![
                TaskId::DriveToDistance,
                TaskId::TunableGainDrive,
                TaskId::TurnToAngle
            ]
        );
    }

    #[test]
    fn test_duplicate_binding() {
        let mut params: Params = util::params::parse(PARAMS).unwrap();
        params.bindings.push(Binding {
            device: DeviceId::Controller,
            button: 3,
            trigger: Trigger::WhileHeld,
            task: TaskId::TurnToAngle,
        });

        assert_eq!(
            InputBindings::new(&params).unwrap_err(),
            BindError::DuplicateBinding(DeviceId::Controller, 3)
        );
    }

    #[test]
    fn test_tank_inputs() {
        let params: Params = util::params::parse(PARAMS).unwrap();
        let mut ib = InputBindings::new(&params).unwrap();

        assert_eq!(ib.tank_inputs(), TankInputs::default());

        let axis = |device, axis, value| InputEvent::Axis {
            device,
            axis,
            value,
        };

        assert_eq!(ib.process(&axis(DeviceId::LeftStick, 1, -0.5)), None);
        ib.process(&axis(DeviceId::RightStick, 1, 0.25));
        ib.process(&axis(DeviceId::RightStick, 0, 0.9));
        ib.process(&axis(DeviceId::LeftStick, 1, f64::NAN));

        assert_eq!(
            ib.tank_inputs(),
            TankInputs {
                left: 0.5,
                right: -0.25
            }
        );
    }
}
