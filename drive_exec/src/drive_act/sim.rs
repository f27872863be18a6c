//! # Simulated drivetrain
//!
//! Motor controllers backed by a trivial plant model, for running the
//! executable without hardware and for testing. Each simulated controller can
//! have read or write faults injected.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::cell::RefCell;
use std::rc::Rc;

use drive_if::eqpt::drive::Side;

use super::{
    DriveActuator, HwError, MotorController, MotorId, Params, SideMotors, SideParams
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct SimMotorState {
    /// Last output written.
    output: f64,

    /// Position of the output shaft relative to the last reset.
    ///
    /// Units: revolutions
    position_revs: f64,

    /// If set, position reads fail.
    read_fault: bool,

    /// If set, output writes and resets fail.
    write_fault: bool,
}

/// A simulated motor controller.
///
/// Clones share the same underlying motor, so a test can keep a handle to a
/// motor which has been given to a [`DriveActuator`].
#[derive(Debug, Clone)]
pub struct SimMotor {
    id: MotorId,
    state: Rc<RefCell<SimMotorState>>,
}

/// A simulated drivetrain made of [`SimMotor`]s.
pub struct SimDrive {
    left: Vec<SimMotor>,
    right: Vec<SimMotor>,

    left_sign: f64,
    right_sign: f64,

    /// Units: revolutions/second
    free_speed_revs_per_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimMotor {
    pub fn new(id: MotorId) -> Self {
        Self {
            id,
            state: Rc::new(RefCell::new(SimMotorState::default())),
        }
    }

    /// The last output written to the motor.
    pub fn output(&self) -> f64 {
        self.state.borrow().output
    }

    /// The true position of the motor, regardless of faults.
    pub fn position(&self) -> f64 {
        self.state.borrow().position_revs
    }

    /// Move the motor to the given position.
    pub fn set_position(&self, revs: f64) {
        self.state.borrow_mut().position_revs = revs;
    }

    pub fn set_read_fault(&self, fault: bool) {
        self.state.borrow_mut().read_fault = fault;
    }

    pub fn set_write_fault(&self, fault: bool) {
        self.state.borrow_mut().write_fault = fault;
    }

    /// Advance the motor by `dt_s` seconds at its current output.
    pub fn step(&self, dt_s: f64, free_speed_revs_per_s: f64) {
        let mut s = self.state.borrow_mut();
        let travelled = s.output * free_speed_revs_per_s * dt_s;
        s.position_revs += travelled;
    }
}

impl MotorController for SimMotor {
    fn id(&self) -> MotorId {
        self.id
    }

    fn set_output(&mut self, output: f64) -> Result<(), HwError> {
        let mut s = self.state.borrow_mut();
        if s.write_fault {
            return Err(HwError::NoResponse(self.id));
        }
        s.output = output;
        Ok(())
    }

    fn position_revs(&mut self) -> Result<f64, HwError> {
        let s = self.state.borrow();
        if s.read_fault {
            return Err(HwError::NoResponse(self.id));
        }
        Ok(s.position_revs)
    }

    fn reset_position(&mut self) -> Result<(), HwError> {
        let mut s = self.state.borrow_mut();
        if s.write_fault {
            return Err(HwError::Fault(self.id, String::from("encoder reset rejected")));
        }
        s.position_revs = 0.0;
        Ok(())
    }
}

impl SimDrive {
    /// Build a simulated drivetrain and the actuator driving it.
    pub fn new(params: &Params) -> (Self, DriveActuator) {
        let left: Vec<SimMotor> = params.left.motor_ids().map(SimMotor::new).collect();
        let right: Vec<SimMotor> = params.right.motor_ids().map(SimMotor::new).collect();

        let actuator = DriveActuator::new(
            side_motors(&left, &params.left),
            side_motors(&right, &params.right),
        );

        let sim = Self {
            left,
            right,
            left_sign: params.left.sign(),
            right_sign: params.right.sign(),
            free_speed_revs_per_s: params.sim.free_speed_revs_per_s,
        };

        (sim, actuator)
    }

    /// Advance every motor by `dt_s` seconds.
    pub fn step(&self, dt_s: f64) {
        for m in self.left.iter().chain(self.right.iter()) {
            m.step(dt_s, self.free_speed_revs_per_s);
        }
    }

    /// Left side motors, leader first.
    pub fn left(&self) -> &[SimMotor] {
        &self.left
    }

    /// Right side motors, leader first.
    pub fn right(&self) -> &[SimMotor] {
        &self.right
    }

    /// Move every motor on a side so that the actuator will read `revs` for
    /// that side, accounting for the side's inversion.
    pub fn set_side_position(&self, side: Side, revs: f64) {
        let (motors, sign) = match side {
            Side::Left => (&self.left, self.left_sign),
            Side::Right => (&self.right, self.right_sign),
        };

        for m in motors.iter() {
            m.set_position(sign * revs);
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn side_motors(motors: &[SimMotor], params: &SideParams) -> SideMotors {
    let mut boxed = motors
        .iter()
        .map(|m| Box::new(m.clone()) as Box<dyn MotorController>);

    // `motor_ids` always yields the leader first
    let leader = boxed
        .next()
        .unwrap_or_else(|| Box::new(SimMotor::new(params.leader_id)));

    SideMotors::new(leader, boxed.collect(), params.inverted)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::drive_act::test_params;

    #[test]
    fn test_step() {
        let (sim, mut act) = SimDrive::new(&test_params());

        act.set_open_loop(0.5, 0.5);
        sim.step(0.02);
        sim.step(0.02);

        // 0.5 * 100 rev/s * 0.04 s
        let fb = act.refresh_feedback();
        assert!((fb.left.revs - 2.0).abs() < 1e-12);
        assert!((fb.right.revs - 2.0).abs() < 1e-12);

        assert_eq!(sim.left()[0].id(), 10);
        assert_eq!(sim.right()[1].id(), 16);
    }
}
