//! Implementation of the drive actuator

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace, warn};

// Internal
use super::{ActuatorFeedback, HwError, MotorController, MotorId, PositionReading};
use drive_if::eqpt::drive::{DriveCommand, Side, MAX_OUTPUT, MIN_OUTPUT};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The motor controllers making up one side of the drive.
pub struct SideMotors {
    /// Controller providing the side's feedback.
    pub leader: Box<dyn MotorController>,

    /// Controllers replicating the leader's output.
    pub followers: Vec<Box<dyn MotorController>>,

    /// True if positive motor output drives this side backwards.
    pub inverted: bool,

    /// Set while an encoder reset has failed and not yet been retried
    /// successfully. The side's position is meaningless until then.
    reset_pending: bool,
}

/// The drive actuator.
///
/// Owns both drive sides and the latest sampled feedback. Tasks command it
/// through [`DriveActuator::set_open_loop`] and read feedback through
/// [`DriveActuator::get_position`].
pub struct DriveActuator {
    left: SideMotors,
    right: SideMotors,

    /// Feedback sampled by the last call to `refresh_feedback` (or zeroed by
    /// the last reset).
    feedback: ActuatorFeedback,

    /// The last command sent to the hardware, after limiting.
    last_cmd: DriveCommand,

    /// Total number of hardware errors encountered.
    num_hw_faults: u64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SideMotors {
    pub fn new(
        leader: Box<dyn MotorController>,
        followers: Vec<Box<dyn MotorController>>,
        inverted: bool,
    ) -> Self {
        Self {
            leader,
            followers,
            inverted,
            reset_pending: false,
        }
    }

    fn motor_ids(&self) -> Vec<MotorId> {
        std::iter::once(&self.leader)
            .chain(self.followers.iter())
            .map(|m| m.id())
            .collect()
    }

    fn sign(&self) -> f64 {
        if self.inverted { -1.0 } else { 1.0 }
    }

    /// Write the output to the leader and every follower, returning the
    /// errors from each controller that failed.
    fn write(&mut self, output: f64) -> Vec<HwError> {
        let physical = self.sign() * output;

        std::iter::once(&mut self.leader)
            .chain(self.followers.iter_mut())
            .filter_map(|m| m.set_output(physical).err())
            .collect()
    }

    fn read(&mut self) -> Result<f64, HwError> {
        let sign = self.sign();
        self.leader.position_revs().map(|p| sign * p)
    }

    fn reset(&mut self) -> Vec<HwError> {
        std::iter::once(&mut self.leader)
            .chain(self.followers.iter_mut())
            .filter_map(|m| m.reset_position().err())
            .collect()
    }
}

impl DriveActuator {
    /// Create a new actuator from the two sides.
    ///
    /// The actuator starts stopped with zero, non-stale feedback.
    pub fn new(left: SideMotors, right: SideMotors) -> Self {
        info!(
            "Drive motor controllers: left {:?}, right {:?} (inverted: {}, {})",
            left.motor_ids(),
            right.motor_ids(),
            left.inverted,
            right.inverted
        );

        Self {
            left,
            right,
            feedback: ActuatorFeedback::default(),
            last_cmd: DriveCommand::STOP,
            num_hw_faults: 0,
        }
    }

    /// Command raw normalised outputs on both sides.
    ///
    /// Outputs are silently limited to [-1, 1]. Returns the command which was
    /// actually sent.
    pub fn set_open_loop(&mut self, left_output: f64, right_output: f64) -> DriveCommand {
        let cmd = DriveCommand::new(left_output, right_output).clamped(MIN_OUTPUT, MAX_OUTPUT);

        for &side in Side::BOTH.iter() {
            let errors = self.side_mut(side).write(cmd.side(side));
            for e in errors {
                warn!("Could not command {:?} drive: {}", side, e);
                self.num_hw_faults += 1;
            }
        }

        trace!("Drive output: {:?}", cmd);

        self.last_cmd = cmd;
        cmd
    }

    /// Command a [`DriveCommand`].
    pub fn set_command(&mut self, cmd: DriveCommand) -> DriveCommand {
        self.set_open_loop(cmd.left, cmd.right)
    }

    /// Stop both sides.
    pub fn stop(&mut self) -> DriveCommand {
        self.set_open_loop(0.0, 0.0)
    }

    /// Sample the position of both sides from the hardware.
    ///
    /// A side which cannot be read keeps its last known position and is
    /// marked stale until it can be read again. A side whose encoder reset
    /// failed has the reset retried first, and stays stale until the retry
    /// succeeds.
    pub fn refresh_feedback(&mut self) -> ActuatorFeedback {
        for &side in Side::BOTH.iter() {
            if self.side_mut(side).reset_pending && !self.retry_reset(side) {
                self.feedback.side_mut(side).stale = true;
                continue;
            }

            let result = self.side_mut(side).read();
            let was_stale = self.feedback.side(side).stale;

            match result {
                Ok(revs) => {
                    if was_stale {
                        info!("{:?} drive feedback recovered", side);
                    }
                    *self.feedback.side_mut(side) = PositionReading { revs, stale: false };
                }
                Err(e) => {
                    if !was_stale {
                        warn!("{:?} drive feedback is stale: {}", side, e);
                    }
                    self.feedback.side_mut(side).stale = true;
                    self.num_hw_faults += 1;
                }
            }
        }

        self.feedback
    }

    /// Zero both sides' position counters.
    ///
    /// If a side cannot be reset its feedback is marked stale, since its last
    /// known position is no longer relative to the reset point.
    ///
    /// The reset is retried on every following `refresh_feedback` until it
    /// succeeds, the side reading stale meanwhile.
    pub fn reset_encoders(&mut self) {
        for &side in Side::BOTH.iter() {
            let errors = self.side_mut(side).reset();

            if errors.is_empty() {
                self.side_mut(side).reset_pending = false;
                *self.feedback.side_mut(side) = PositionReading::default();
            } else {
                for e in errors {
                    warn!("Could not reset {:?} drive encoder: {}", side, e);
                    self.num_hw_faults += 1;
                }
                self.side_mut(side).reset_pending = true;
                self.feedback.side_mut(side).stale = true;
            }
        }
    }

    /// Get the sampled position of one side.
    pub fn get_position(&self, side: Side) -> PositionReading {
        self.feedback.side(side)
    }

    /// Get the sampled feedback of both sides.
    pub fn feedback(&self) -> ActuatorFeedback {
        self.feedback
    }

    /// Get the last command sent to the hardware.
    pub fn last_command(&self) -> DriveCommand {
        self.last_cmd
    }

    /// Total number of hardware errors encountered since creation.
    pub fn num_hw_faults(&self) -> u64 {
        self.num_hw_faults
    }

    /// Retry a failed encoder reset, returning true if it succeeded.
    fn retry_reset(&mut self, side: Side) -> bool {
        let errors = self.side_mut(side).reset();

        if errors.is_empty() {
            info!("{:?} drive encoder reset on retry", side);
            self.side_mut(side).reset_pending = false;
            return true;
        }

        for e in errors {
            debug!("{:?} drive encoder reset still failing: {}", side, e);
            self.num_hw_faults += 1;
        }
        false
    }

    fn side_mut(&mut self, side: Side) -> &mut SideMotors {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::drive_act::sim::SimDrive;
    use crate::drive_act::test_params;

    #[test]
    fn test_set_open_loop_clamps() {
        let (sim, mut act) = SimDrive::new(&test_params());

        let cmd = act.set_open_loop(1.5, -2.0);
        assert_eq!(cmd, DriveCommand::new(1.0, -1.0));
        assert_eq!(act.last_command(), cmd);

        // The right side is inverted, so its motors see the negated output
        assert_eq!(sim.left()[0].output(), 1.0);
        assert_eq!(sim.right()[0].output(), 1.0);
    }

    #[test]
    fn test_followers_replicate_leader() {
        let (sim, mut act) = SimDrive::new(&test_params());

        act.set_open_loop(0.4, 0.25);
        for m in sim.left() {
            assert_eq!(m.output(), 0.4);
        }
        for m in sim.right() {
            assert_eq!(m.output(), -0.25);
        }
    }

    #[test]
    fn test_feedback_and_reset() {
        let (sim, mut act) = SimDrive::new(&test_params());

        sim.set_side_position(Side::Left, 12.0);
        sim.set_side_position(Side::Right, 10.0);

        // Nothing changes until the feedback is sampled
        assert_eq!(act.get_position(Side::Left).revs, 0.0);

        let fb = act.refresh_feedback();
        assert_eq!(fb.left, PositionReading { revs: 12.0, stale: false });
        assert_eq!(fb.right, PositionReading { revs: 10.0, stale: false });
        assert_eq!(fb.mean_revs(), 11.0);
        assert_eq!(fb.differential_revs(), 1.0);

        act.reset_encoders();
        assert_eq!(act.feedback(), ActuatorFeedback::default());
        act.refresh_feedback();
        assert_eq!(act.get_position(Side::Left).revs, 0.0);
        assert_eq!(act.get_position(Side::Right).revs, 0.0);
    }

    #[test]
    fn test_stale_feedback() {
        let (sim, mut act) = SimDrive::new(&test_params());

        sim.set_side_position(Side::Left, 5.0);
        act.refresh_feedback();

        sim.left()[0].set_read_fault(true);
        sim.set_side_position(Side::Left, 7.0);

        let fb = act.refresh_feedback();
        assert_eq!(fb.left, PositionReading { revs: 5.0, stale: true });
        assert!(!fb.right.stale);
        assert!(fb.is_stale());
        assert_eq!(act.num_hw_faults(), 1);

        sim.left()[0].set_read_fault(false);
        let fb = act.refresh_feedback();
        assert_eq!(fb.left, PositionReading { revs: 7.0, stale: false });
    }

    #[test]
    fn test_write_fault_is_not_fatal() {
        let (sim, mut act) = SimDrive::new(&test_params());

        sim.left()[1].set_write_fault(true);
        let cmd = act.set_open_loop(0.5, 0.5);

        assert_eq!(cmd, DriveCommand::new(0.5, 0.5));
        assert_eq!(sim.left()[0].output(), 0.5);
        assert_eq!(act.num_hw_faults(), 1);
    }

    #[test]
    fn test_failed_reset_marks_stale() {
        let (sim, mut act) = SimDrive::new(&test_params());

        sim.right()[0].set_write_fault(true);
        act.reset_encoders();

        assert!(act.get_position(Side::Right).stale);
        assert!(!act.get_position(Side::Left).stale);
    }

    #[test]
    fn test_failed_reset_stays_stale_until_retried() {
        let (sim, mut act) = SimDrive::new(&test_params());

        sim.set_side_position(Side::Left, 60.0);
        sim.set_side_position(Side::Right, 60.0);
        act.refresh_feedback();

        sim.right()[0].set_write_fault(true);
        act.reset_encoders();

        // The right encoder still reads 60, which must never be reported as
        // a fresh position relative to the reset
        for _ in 0..3 {
            let fb = act.refresh_feedback();
            assert_eq!(fb.left, PositionReading { revs: 0.0, stale: false });
            assert!(fb.right.stale);
        }

        // Once the controller responds the reset goes through
        sim.right()[0].set_write_fault(false);
        let fb = act.refresh_feedback();
        assert_eq!(fb.right, PositionReading { revs: 0.0, stale: false });
        assert_eq!(sim.right()[0].position(), 0.0);

        // And is not repeated
        sim.set_side_position(Side::Right, 5.0);
        assert_eq!(act.refresh_feedback().right.revs, 5.0);
    }
}
