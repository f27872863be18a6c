//! Drive straight to a distance

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{info, trace};

use drive_if::{eqpt::drive::DriveCommand, task::TaskId};

use super::{closed_loop::ClosedLoop, ControlTask, Setpoint, TaskContext};
use crate::drive_act::PositionReading;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Drives both sides with the same output until the mean position of the
/// sides is within the margin of the target.
///
/// The setpoint is fixed at construction. Gains are read from the dashboard
/// snapshot on every cycle.
#[derive(Debug, Clone)]
pub struct DriveToDistance {
    setpoint: Setpoint,
    ctrl: ClosedLoop,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveToDistance {
    pub fn new(setpoint: Setpoint, stale_window_cycles: u32) -> Self {
        Self {
            setpoint,
            ctrl: ClosedLoop::new(stale_window_cycles),
        }
    }
}

impl ControlTask for DriveToDistance {
    fn id(&self) -> TaskId {
        TaskId::DriveToDistance
    }

    fn initialize(&mut self, ctx: &mut TaskContext<'_>) {
        ctx.actuator.reset_encoders();
        self.ctrl.reset();

        info!(
            "DriveToDistance to {:.3} rev (+/- {:.3} rev)",
            self.setpoint.target_revs, self.setpoint.margin_revs
        );
    }

    fn execute(&mut self, ctx: &mut TaskContext<'_>) {
        let measured = straight_position(ctx);
        let out = self.ctrl.step(
            measured,
            &self.setpoint,
            &ctx.tunables.gains,
            ctx.cycle_period_s,
        );

        trace!("DriveToDistance at {:.3} rev, output {:.4}", measured.revs, out);
        ctx.actuator.set_command(DriveCommand::straight(out));
    }

    fn is_finished(&self, ctx: &TaskContext<'_>) -> bool {
        self.ctrl.is_finished(straight_position(ctx), &self.setpoint)
    }

    fn end(&mut self, interrupted: bool, ctx: &mut TaskContext<'_>) {
        ctx.actuator.stop();
        info!(
            "DriveToDistance ended at {:.3} rev (interrupted: {})",
            straight_position(ctx).revs,
            interrupted
        );
    }

    fn aborted(&self) -> bool {
        self.ctrl.aborted()
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Distance travelled straight ahead, the mean of both sides.
pub(crate) fn straight_position(ctx: &TaskContext<'_>) -> PositionReading {
    let fb = ctx.actuator.feedback();

    PositionReading {
        revs: fb.mean_revs(),
        stale: fb.is_stale(),
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        ctrl_task::test_tunables,
        drive_act::{sim::SimDrive, test_params},
        input_bind::TankInputs,
    };
    use drive_if::eqpt::drive::Side;

    #[test]
    fn test_drive_to_distance() {
        let (sim, mut act) = SimDrive::new(&test_params());
        let tunables = test_tunables();

        let mut task = DriveToDistance::new(Setpoint::new(60.0, 2.0).unwrap(), 5);

        // Some leftover position from an earlier task, cleared by initialize
        sim.set_side_position(Side::Left, 12.0);
        sim.set_side_position(Side::Right, 12.0);
        act.refresh_feedback();

        let mut ctx = TaskContext {
            actuator: &mut act,
            tunables: &tunables,
            tank: TankInputs::default(),
            cycle_period_s: 0.02,
        };
        task.initialize(&mut ctx);
        assert_eq!(ctx.actuator.feedback().mean_revs(), 0.0);

        // Monotone feedback, finished exactly when the mean first enters
        // [58, 62]
        let mut finished_at = None;
        for i in 0..=70 {
            let avg = i as f64;
            sim.set_side_position(Side::Left, avg - 0.5);
            sim.set_side_position(Side::Right, avg + 0.5);
            ctx.actuator.refresh_feedback();

            task.execute(&mut ctx);

            let expected = (0.015 * (60.0 - avg)).max(-1.0).min(1.0);
            let cmd = ctx.actuator.last_command();
            assert!((cmd.left - expected).abs() < 1e-12);
            assert_eq!(cmd.left, cmd.right);

            if task.is_finished(&ctx) {
                finished_at = Some(avg);
                break;
            }
        }
        assert_eq!(finished_at, Some(58.0));

        task.end(false, &mut ctx);
        assert_eq!(ctx.actuator.last_command(), DriveCommand::STOP);
    }

    #[test]
    fn test_gains_read_every_cycle() {
        let (sim, mut act) = SimDrive::new(&test_params());
        let mut tunables = test_tunables();
        let mut task = DriveToDistance::new(Setpoint::new(60.0, 2.0).unwrap(), 5);

        {
            let mut ctx = TaskContext {
                actuator: &mut act,
                tunables: &tunables,
                tank: TankInputs::default(),
                cycle_period_s: 0.02,
            };
            task.initialize(&mut ctx);
            task.execute(&mut ctx);
            assert!((ctx.actuator.last_command().left - 0.9).abs() < 1e-12);
        }

        tunables.gains.k_p = 0.01;
        sim.set_side_position(Side::Left, 10.0);
        sim.set_side_position(Side::Right, 10.0);

        let mut ctx = TaskContext {
            actuator: &mut act,
            tunables: &tunables,
            tank: TankInputs::default(),
            cycle_period_s: 0.02,
        };
        ctx.actuator.refresh_feedback();
        task.execute(&mut ctx);
        assert!((ctx.actuator.last_command().left - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_interrupted() {
        let (_sim, mut act) = SimDrive::new(&test_params());
        let tunables = test_tunables();
        let mut task = DriveToDistance::new(Setpoint::new(60.0, 2.0).unwrap(), 5);

        let mut ctx = TaskContext {
            actuator: &mut act,
            tunables: &tunables,
            tank: TankInputs::default(),
            cycle_period_s: 0.02,
        };
        task.initialize(&mut ctx);
        task.execute(&mut ctx);
        assert!(ctx.actuator.last_command().left > 0.0);

        task.end(true, &mut ctx);
        assert_eq!(ctx.actuator.last_command(), DriveCommand::STOP);
    }

    #[test]
    fn test_failed_encoder_reset_never_finishes() {
        let (sim, mut act) = SimDrive::new(&test_params());
        let tunables = test_tunables();

        // The robot has already travelled 60 rev, and the right encoder
        // cannot be reset
        sim.set_side_position(Side::Left, 60.0);
        sim.set_side_position(Side::Right, 60.0);
        sim.right()[0].set_write_fault(true);

        let mut task = DriveToDistance::new(Setpoint::new(30.0, 2.0).unwrap(), 3);
        let mut ctx = TaskContext {
            actuator: &mut act,
            tunables: &tunables,
            tank: TankInputs::default(),
            cycle_period_s: 0.02,
        };
        task.initialize(&mut ctx);

        // Left at 0 and right at 60 average to the target, but the right
        // side is not relative to the start so the task holds still
        for _ in 0..3 {
            ctx.actuator.refresh_feedback();
            task.execute(&mut ctx);
            assert!(!task.is_finished(&ctx));
            assert_eq!(ctx.actuator.last_command(), DriveCommand::STOP);
        }

        // Then gives up
        ctx.actuator.refresh_feedback();
        task.execute(&mut ctx);
        assert!(task.is_finished(&ctx));
        assert!(task.aborted());
        assert_eq!(ctx.actuator.last_command(), DriveCommand::STOP);
    }

    #[test]
    fn test_zero_gain_never_finishes() {
        let (_sim, mut act) = SimDrive::new(&test_params());
        let mut tunables = test_tunables();
        tunables.gains.k_p = 0.0;
        let mut task = DriveToDistance::new(Setpoint::new(60.0, 2.0).unwrap(), 5);

        let mut ctx = TaskContext {
            actuator: &mut act,
            tunables: &tunables,
            tank: TankInputs::default(),
            cycle_period_s: 0.02,
        };
        task.initialize(&mut ctx);
        for _ in 0..100 {
            ctx.actuator.refresh_feedback();
            task.execute(&mut ctx);
            assert!(!task.is_finished(&ctx));
        }
        assert_eq!(ctx.actuator.last_command(), DriveCommand::STOP);
    }
}
